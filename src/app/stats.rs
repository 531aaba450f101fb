//! Timing of hash requests.

use std::time::Instant;

use crate::app::AppState;
use crate::router::Context;
use crate::server::StatusCode;

/// When the request entered the middleware chain.
struct RequestStart(Instant);

/// Pre-middleware: stamp the request.
pub(super) fn start_timer(ctx: &mut Context) {
    ctx.extensions_mut().insert(RequestStart(Instant::now()));
}

/// Post-middleware: record how long a hash request took.
pub(super) fn record_duration(state: &AppState, ctx: &mut Context) {
    if !ctx.request().route_path().contains("hash") {
        return;
    }
    if let Some(RequestStart(started)) = ctx.extensions().get::<RequestStart>() {
        state.requests.record(started.elapsed());
    }
}

/// `GET /stats`.
pub(super) fn summary(state: &AppState, ctx: &mut Context) {
    ctx.json(StatusCode::Ok, &state.requests.summary());
}
