mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::PortalConfig::from_env().expect("invalid portal configuration");
    if config.dev_mode {
        tracing::info!(auth_type = config.auth_type.as_str(), users = config.users.len(), "mock captive portal enabled");
    } else {
        tracing::warn!("not in development mode; captive-portal endpoints answer 404");
    }

    let port = config.port;
    let state = state::AppState::new(config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "captive portal listening");
    axum::serve(listener, app).await.expect("server failed");
}
