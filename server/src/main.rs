mod config;
mod error;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");
    let port = config.port;
    if config.kakao.is_none() {
        tracing::warn!("KAKAO_REST_API_KEY not set; Kakao sign-in disabled");
    }
    tracing::info!(api_url = %config.api_url, static_dir = %config.static_dir.display(), "configuration loaded");

    let state = state::AppState::new(config).expect("upstream client init failed");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "nomad-bff listening");
    axum::serve(listener, app).await.expect("server failed");
}
