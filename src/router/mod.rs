//! Request routing.
//!
//! A [`Router`] maps `(method, path)` to a handler, supports a single named
//! parameter in the `/segment/:name` shape, and wraps every request in
//! pre- and post-middleware:
//!
//! ```
//! use hashgate::parser::parse_request;
//! use hashgate::router::{Context, Router};
//! use hashgate::server::StatusCode;
//!
//! let mut router = Router::new();
//! router.get("/users/:id", |ctx: &mut Context| {
//!     let id = ctx.param("id").to_string();
//!     ctx.text(StatusCode::Ok, id);
//! });
//!
//! let request = parse_request(b"GET /users/42 HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//! let response = router.dispatch(request);
//! assert_eq!(response.body, b"42");
//! ```

mod context;
mod extensions;
mod handler;
mod middleware;
mod route;
#[allow(clippy::module_inception)]
mod router;
mod sink;
mod table;
mod tests;

pub use context::Context;
pub use extensions::Extensions;
pub use handler::{HandlerFn, MiddlewareFn};
pub use middleware::{MiddlewareChain, MiddlewareEntry};
pub use route::{Matcher, Route, RouteKey};
pub use router::Router;
pub use sink::ResponseSink;
pub use table::{RouteMatch, RouteTable};
