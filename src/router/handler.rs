//! Handler and middleware function types.

use std::sync::Arc;

use crate::router::Context;

/// A route handler. Everything it produces goes through the [`Context`].
pub type HandlerFn = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// A pre- or post-middleware step. Same shape as a handler.
pub type MiddlewareFn = Arc<dyn Fn(&mut Context) + Send + Sync>;
