// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod feed;
pub mod metrics;
pub mod scheduler;
pub mod status;
pub mod streak;

// End-of-day reporting
pub mod notify;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::feed::reddit::{RedditCredentials, RedditFeed};
use crate::streak::StreakEvaluator;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::feed::{FeedEntry, FeedSource};
pub use crate::notify::{report, run_daily_check, Report, ReportStatus};
pub use crate::status::{status, StatusSnapshot};

/// Wire the production evaluator: one Reddit client, shared by the daily
/// scheduler and every request handler.
pub fn reddit_evaluator(creds: RedditCredentials, settings: &Settings) -> Result<StreakEvaluator> {
    let feed: Arc<dyn FeedSource> = Arc::new(RedditFeed::new(creds, settings)?);
    tracing::info!(
        subreddit = %settings.subreddit,
        user_agent = %settings.user_agent,
        "reddit feed configured"
    );
    Ok(StreakEvaluator::new(feed, settings.subreddit.clone()))
}
