//! Runs the end-of-day check once against the live account and prints the
//! report as JSON. Useful for verifying credentials without waiting for 23:50.

use streak_watch::config::{load_settings_default, reddit_credentials_from_env};
use streak_watch::{reddit_evaluator, run_daily_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let settings = load_settings_default()?;
    let evaluator = reddit_evaluator(reddit_credentials_from_env()?, &settings)?;
    let (result, report) = run_daily_check(&evaluator).await;

    let out = serde_json::json!({ "evaluation": result, "report": report });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
