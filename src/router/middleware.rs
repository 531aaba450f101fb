//! Pre- and post-route middleware lists.

use crate::router::handler::MiddlewareFn;

/// One registered middleware step.
#[derive(Clone)]
pub struct MiddlewareEntry {
    /// Registration sequence number within its list.
    pub order: usize,
    pub handler: MiddlewareFn,
}

/// Middleware run around every request, whichever route matched.
///
/// Entries run in registration order. Nothing short-circuits: a pre step
/// that writes a response does not stop later steps or the handler.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    pre: Vec<MiddlewareEntry>,
    post: Vec<MiddlewareEntry>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pre(&mut self, handler: MiddlewareFn) {
        let order = self.pre.len();
        self.pre.push(MiddlewareEntry { order, handler });
    }

    pub fn push_post(&mut self, handler: MiddlewareFn) {
        let order = self.post.len();
        self.post.push(MiddlewareEntry { order, handler });
    }

    pub fn pre(&self) -> &[MiddlewareEntry] {
        &self.pre
    }

    pub fn post(&self) -> &[MiddlewareEntry] {
        &self.post
    }
}
