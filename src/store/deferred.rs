//! Respond-now, persist-later storage.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use log::{debug, error};
use tokio::runtime::Handle;

use crate::hasher::{Error, Hasher};

/// A token → value map filled by background tasks.
///
/// [`submit`](DeferredStore::submit) hands back a fresh token straight away
/// and schedules the value to appear once `delay` has elapsed and the
/// compute step has run. [`get`](DeferredStore::get) may be called at any
/// time and sees the value only after the background write lands.
///
/// Entries are never evicted, so the map grows with every submission.
#[derive(Clone)]
pub struct DeferredStore {
    entries: Arc<DashMap<String, String>>,
    tokens: Arc<dyn Hasher>,
    token_length: usize,
    runtime: Handle,
}

impl DeferredStore {
    /// Create an empty store.
    ///
    /// Background writes are spawned on `runtime`, so the store can be used
    /// from threads that are not themselves inside the runtime.
    pub fn new(runtime: Handle, tokens: Arc<dyn Hasher>, token_length: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            tokens,
            token_length,
            runtime,
        }
    }

    /// Schedule `compute` to run after `delay` and store its result under a new token.
    ///
    /// Returns the token without waiting for `compute`. Fails only when no
    /// token could be generated, in which case nothing is scheduled.
    pub fn submit<F>(&self, compute: F, delay: Duration) -> Result<String, Error>
    where
        F: FnOnce() -> String + Send + 'static,
    {
        let token = self.tokens.random_token(self.token_length)?;

        let entries = Arc::clone(&self.entries);
        let key = token.clone();
        let write = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let value = compute();
            entries.insert(key.clone(), value);
            debug!("Deferred value for {key} is now visible");
        });

        // Detached: the request that submitted must not wait, but a panic in
        // `compute` should still show up in the logs.
        self.runtime.spawn(async move {
            if let Err(e) = write.await {
                error!("Deferred write failed: {e}");
            }
        });

        Ok(token)
    }

    /// Look up a completed value.
    pub fn get(&self, token: &str) -> Option<String> {
        self.entries.get(token).map(|entry| entry.value().clone())
    }
}
