use anyhow::Context;

use moodarc_api::config::Config;
use moodarc_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodarc_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    tracing::info!(
        trend_window_days = config.trend_window_days,
        streak_scan_limit_days = config.streak_scan_limit_days,
        max_entries_per_snapshot = config.max_entries_per_snapshot,
        "Configuration loaded"
    );

    let addr = config.listen_addr();
    let app = build_router(AppState::new(config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
