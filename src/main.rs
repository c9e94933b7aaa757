//! streak-watch: binary entrypoint.
//! Boots the Axum HTTP server and the daily streak scheduler.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use streak_watch::config::{self, load_settings_default, reddit_credentials_from_env};
use streak_watch::metrics::Metrics;
use streak_watch::scheduler::spawn_daily_scheduler;
use streak_watch::{reddit_evaluator, router, AppState};

/// Compact logs by default; `LOG_FORMAT=json` for structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("streak_watch=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = load_settings_default()?;
    let creds = reddit_credentials_from_env()?;
    let port = config::listen_port()?;

    let evaluator = reddit_evaluator(creds, &settings)?;
    let metrics = Metrics::init()?;

    // Background daily check; shares the feed client with the HTTP handlers.
    let _scheduler = spawn_daily_scheduler(evaluator.clone());

    let app = router(AppState::new(evaluator)).merge(metrics.router());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
