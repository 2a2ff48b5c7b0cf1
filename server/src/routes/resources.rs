//! Resource proxies: activities, my-* collections, users.
//!
//! Activities are readable without a session and writable only with one; the
//! `my-*` collections and `users/me` always need one.
//!
//! These handlers add nothing but auth: the path below `/api`, the method,
//! the body and the query string all go upstream as they came in.

use axum::extract::State;
use axum::response::Response;

use super::authed::{AuthedRequest, ProxyRequest, authenticated, respond};
use crate::error::BffError;
use crate::services::proxy;
use crate::state::AppState;

/// Public reads such as `GET /api/activities[/*]`.
///
/// The bearer token still rides along when the cookie is present, so the
/// upstream can personalize its answer.
pub async fn public_read(State(state): State<AppState>, req: ProxyRequest) -> Response {
    let result = proxy::forward(&state.upstream, req.endpoint(), req.proxy_options(), req.access_token.as_deref())
        .await
        .map_err(BffError::from);
    respond(result)
}

/// Session-only resources: `/api/my-*`, `/api/users/me[/*]`.
pub async fn private(State(state): State<AppState>, req: AuthedRequest) -> Response {
    authenticated(req, |req| async move {
        let result = proxy::forward(&state.upstream, req.endpoint(), req.proxy_options(), Some(&req.access_token)).await;
        if let Err(err) = &result {
            tracing::debug!(endpoint = req.endpoint(), error = %err, "private proxy call failed");
        }
        result.map_err(BffError::from)
    })
    .await
}

/// Public, token-less writes such as `POST /api/users` (sign-up).
pub async fn public(State(state): State<AppState>, req: ProxyRequest) -> Response {
    let result = proxy::forward(&state.upstream, req.endpoint(), req.proxy_options(), None)
        .await
        .map_err(BffError::from);
    respond(result)
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
