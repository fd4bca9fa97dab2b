mod bootstrap;
mod config;

use tower_http::trace::TraceLayer;
use tracing::info;

use diary_api::AppStateInner;
use diary_api::token::TokenService;
use diary_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diary_server=debug,diary_api=debug,diary_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database, retrying while it comes up
    let db = bootstrap::connect_with_retry(config.connect_attempts, config.connect_delay, || {
        Database::open(&config.db_path)
    })
    .await?;

    let tokens = TokenService::new(
        &config.secret_key,
        chrono::Duration::hours(config.token_ttl_hours),
    );
    let state = AppStateInner::new(db, tokens);

    let app = diary_api::router(state).layer(TraceLayer::new_for_http());

    let listener = bootstrap::bind(&config.host, config.port).await?;
    info!("Diary server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Diary server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
