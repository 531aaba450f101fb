use log::info;

use crate::app::AppState;
use crate::router::Context;
use crate::server::StatusCode;

/// `GET|POST /shutdown`. The server finishes in-flight requests, this one included.
pub(super) fn shutdown(state: &AppState, ctx: &mut Context) {
    info!("Shutdown requested over HTTP");
    state.shutdown.trigger();
    ctx.text(StatusCode::Ok, "Shutting Down.");
}
