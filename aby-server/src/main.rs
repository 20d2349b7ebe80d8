//! aby-server: ABY HR / Rwanda Data Monitor backend
//!
//! Long-running service that:
//! - Serves the admin dashboard REST API (OTP login, cookie sessions)
//! - Serves public job listings, applications and national figures
//! - Relays live resource changes over websocket

use std::net::SocketAddr;

use aby_server::{AppState, Config, build_app, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    let _log_guard = logger::init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!("Starting aby-server (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    let app = build_app(state.clone(), &config);

    // Periodic cleanup (every 5 minutes): rate limiter windows, expired in-process TTL keys
    let rate_limiter = state.rate_limiter.clone();
    let kv = state.kv.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
            kv.purge_expired();
        }
    });

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("aby-server HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("aby-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
