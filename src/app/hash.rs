//! `POST /hash` and `GET /hash/:id`.

use std::sync::Arc;

use log::{debug, error};

use crate::app::AppState;
use crate::router::Context;
use crate::server::StatusCode;

/// Accept a password and answer with a token right away.
///
/// The salted digest is computed and stored in the background once the
/// configured delay has passed.
pub(super) fn create(state: &AppState, ctx: &mut Context) {
    let password = ctx.request().form_value("password").unwrap_or_default();
    if password.is_empty() {
        ctx.text(StatusCode::BadRequest, "Bad Request");
        return;
    }

    let salt = match state.hasher.random_token(state.config.salt_length) {
        Ok(salt) => salt,
        Err(e) => {
            error!("Could not generate salt: {e}");
            ctx.text(StatusCode::InternalServerError, "Internal Server Error");
            return;
        }
    };

    let hasher = Arc::clone(&state.hasher);
    let submitted = state
        .store
        .submit(move || hasher.digest(&password, &salt), state.config.delay);

    match submitted {
        Ok(token) => {
            debug!("Accepted password as {token}");
            ctx.text(StatusCode::Created, token);
        }
        Err(e) => {
            error!("Could not generate token: {e}");
            ctx.text(StatusCode::InternalServerError, "Internal Server Error");
        }
    }
}

/// Return a stored digest, or 404 until its background write has landed.
pub(super) fn lookup(state: &AppState, ctx: &mut Context) {
    match state.store.get(ctx.param("id")) {
        Some(digest) => ctx.text(StatusCode::Ok, digest),
        None => ctx.text(StatusCode::NotFound, "Password Not Found"),
    }
}
