// src/status.rs
//! On-demand status snapshot for the dashboard. No caching: every call goes
//! back to the feed source.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::streak::StreakEvaluator;

pub const LABEL_SECURED: &str = "🟢 SECURED";
pub const LABEL_ACTION_REQUIRED: &str = "🔴 ACTION REQUIRED";
pub const UNKNOWN_USER: &str = "unknown";

const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub user: String,
    pub subreddit: String,
    pub utc_time: String,
    pub streak_secured: bool,
    pub status: String,
}

impl StatusSnapshot {
    pub fn new(user: String, subreddit: String, now: DateTime<Utc>, secured: bool) -> Self {
        Self {
            user,
            subreddit,
            utc_time: format_utc(now),
            streak_secured: secured,
            status: status_label(secured).to_string(),
        }
    }
}

pub fn status_label(secured: bool) -> &'static str {
    if secured {
        LABEL_SECURED
    } else {
        LABEL_ACTION_REQUIRED
    }
}

pub fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format(UTC_FORMAT).to_string()
}

/// Build a snapshot for the authenticated account. Never fails: an identity
/// lookup error yields user `"unknown"` and `streak_secured: false`.
pub async fn status(evaluator: &StreakEvaluator) -> StatusSnapshot {
    let user = match evaluator.source().current_identity().await {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::error!(error = ?e, "could not resolve current identity for status");
            counter!("streak_feed_errors_total").increment(1);
            None
        }
    };

    let secured = match &user {
        Some(name) => evaluator.evaluate(name).await.streak_secured,
        None => false,
    };

    StatusSnapshot::new(
        user.unwrap_or_else(|| UNKNOWN_USER.to_string()),
        evaluator.forum().to_string(),
        Utc::now(),
        secured,
    )
}
