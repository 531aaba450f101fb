use crate::router::Context;
use crate::server::StatusCode;

/// `GET /health`. Touches no shared state.
pub(super) fn health(ctx: &mut Context) {
    ctx.text(StatusCode::Ok, "Server is responding");
}
