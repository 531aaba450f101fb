//! Shared in-memory state.
//!
//! These are the only values mutated by more than one request at a time,
//! so each one owns its synchronization and exposes a narrow API.

mod deferred;
mod request_log;

pub use deferred::DeferredStore;
pub use request_log::{RequestLog, Summary};
