//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/api/*` is the BFF surface the browser calls; everything else falls
//! through to the static site, behind the page guard.

pub mod auth;
pub mod authed;
pub mod guard;
pub mod oauth;
pub mod resources;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    let private = || {
        get(resources::private)
            .post(resources::private)
            .patch(resources::private)
            .put(resources::private)
            .delete(resources::private)
    };
    let activities = || {
        get(resources::public_read)
            .post(resources::private)
            .patch(resources::private)
            .put(resources::private)
            .delete(resources::private)
    };

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/tokens", post(auth::refresh_tokens))
        .route("/api/oauth/kakao/authorize", get(oauth::kakao_authorize))
        .route("/api/oauth/sign-in/kakao", post(oauth::kakao_sign_in))
        .route("/api/oauth/sign-up/kakao", post(oauth::kakao_sign_up))
        .route("/api/activities", activities())
        .route("/api/activities/{*rest}", activities())
        .route("/api/my-activities", private())
        .route("/api/my-activities/{*rest}", private())
        .route("/api/my-reservations", private())
        .route("/api/my-reservations/{*rest}", private())
        .route("/api/my-notifications", private())
        .route("/api/my-notifications/{*rest}", private())
        .route("/api/users", post(resources::public))
        .route("/api/users/me", private())
        .route("/api/users/me/{*rest}", private())
        .route("/healthz", get(healthz))
}

/// Full application: API routes, static fallback, page guard, tracing.
pub fn app(state: AppState) -> Router {
    let static_site = ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);

    api_routes()
        .fallback_service(static_site)
        .layer(middleware::from_fn(guard::require_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
