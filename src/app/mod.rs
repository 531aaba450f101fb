//! The password hashing service.
//!
//! [`build_router`] wires the endpoints and the statistics middleware onto a
//! [`Router`]:
//!
//! | Method     | Path         | Handler                      |
//! |------------|--------------|------------------------------|
//! | GET        | `/health`    | liveness probe               |
//! | POST       | `/hash`      | schedule a hash, return token |
//! | GET        | `/hash/:id`  | fetch a finished hash        |
//! | GET        | `/stats`     | hash request timings         |
//! | GET, POST  | `/shutdown`  | stop the server              |

mod hash;
mod health;
mod shutdown;
mod stats;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::hasher::Hasher;
use crate::router::{Context, Router};
use crate::server::Shutdown;
use crate::store::{DeferredStore, RequestLog};

/// Tuning for `POST /hash`.
#[derive(Debug, Clone)]
pub struct HashConfig {
    /// How long after the request the digest becomes visible.
    pub delay: Duration,
    /// Length of the random salt appended to each password.
    pub salt_length: usize,
    /// Length of the token handed back to the client.
    pub token_length: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            salt_length: 32,
            token_length: 8,
        }
    }
}

/// Everything the handlers share.
pub struct AppState {
    pub store: DeferredStore,
    pub hasher: Arc<dyn Hasher>,
    pub requests: RequestLog,
    pub shutdown: Shutdown,
    pub config: HashConfig,
}

impl AppState {
    /// Build the state. Deferred writes are spawned on `runtime`.
    pub fn new(runtime: Handle, hasher: Arc<dyn Hasher>, config: HashConfig, shutdown: Shutdown) -> Self {
        let store = DeferredStore::new(runtime, Arc::clone(&hasher), config.token_length);
        Self {
            store,
            hasher,
            requests: RequestLog::new(),
            shutdown,
            config,
        }
    }
}

/// Register the service's routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    router
        .before(stats::start_timer)
        .after(with_state(&state, stats::record_duration));

    router
        .any("/shutdown", with_state(&state, shutdown::shutdown))
        .post("/hash", with_state(&state, hash::create))
        .get("/hash/:id", with_state(&state, hash::lookup))
        .get("/health", health::health)
        .get("/stats", with_state(&state, stats::summary));

    router
}

fn with_state(
    state: &Arc<AppState>,
    handler: fn(&AppState, &mut Context),
) -> impl Fn(&mut Context) + Send + Sync + 'static {
    let state = Arc::clone(state);
    move |ctx: &mut Context| handler(&state, ctx)
}
