// src/streak.rs
//! Streak evaluation: did the identity post in the forum within the window?

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use metrics::{counter, gauge};

use crate::feed::{FeedEntry, FeedSource, SCAN_LIMIT};
use crate::status::UNKNOWN_USER;

/// Trailing window a post must fall into to count as "today".
pub const STREAK_WINDOW_SECS: i64 = 86_400;

#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct EvaluationResult {
    pub streak_secured: bool,
    pub identity: String,
    pub forum: String,
    pub evaluated_at: DateTime<Utc>,
}

/// Pure decision over already-fetched entries.
///
/// Only the first `SCAN_LIMIT` entries are considered, and the cutoff is
/// exclusive: a post created exactly `window_secs` ago does not count.
pub fn streak_secured_at(
    entries: &[FeedEntry],
    identity: &str,
    now: DateTime<Utc>,
    window_secs: i64,
) -> bool {
    let cutoff = now - ChronoDuration::seconds(window_secs);
    entries
        .iter()
        .take(SCAN_LIMIT)
        .any(|e| e.author.eq_ignore_ascii_case(identity) && e.created_at > cutoff)
}

#[derive(Clone)]
pub struct StreakEvaluator {
    source: Arc<dyn FeedSource>,
    forum: String,
    window_secs: i64,
}

impl StreakEvaluator {
    pub fn new(source: Arc<dyn FeedSource>, forum: impl Into<String>) -> Self {
        Self {
            source,
            forum: forum.into(),
            window_secs: STREAK_WINDOW_SECS,
        }
    }

    /// Non-positive windows fall back to the default 24h.
    pub fn with_window_secs(mut self, secs: i64) -> Self {
        self.window_secs = if secs > 0 { secs } else { STREAK_WINDOW_SECS };
        self
    }

    pub fn forum(&self) -> &str {
        &self.forum
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
    }

    pub fn source(&self) -> &Arc<dyn FeedSource> {
        &self.source
    }

    /// Check `identity` against the newest entries of the forum.
    /// Retrieval failures are logged and reported as "not secured".
    pub async fn evaluate(&self, identity: &str) -> EvaluationResult {
        let now = Utc::now();
        let secured = match self.source.latest_entries(&self.forum, SCAN_LIMIT).await {
            Ok(entries) => streak_secured_at(&entries, identity, now, self.window_secs),
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    source = self.source.name(),
                    forum = %self.forum,
                    "feed check failed; treating streak as not secured"
                );
                counter!("streak_feed_errors_total").increment(1);
                false
            }
        };
        self.finish(secured, identity.to_string(), now)
    }

    /// Same as [`evaluate`](Self::evaluate), for the account the feed source
    /// is authenticated as.
    pub async fn evaluate_current(&self) -> EvaluationResult {
        match self.source.current_identity().await {
            Ok(identity) => self.evaluate(&identity).await,
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    source = self.source.name(),
                    "identity lookup failed; treating streak as not secured"
                );
                counter!("streak_feed_errors_total").increment(1);
                self.finish(false, UNKNOWN_USER.to_string(), Utc::now())
            }
        }
    }

    fn finish(&self, secured: bool, identity: String, now: DateTime<Utc>) -> EvaluationResult {
        let outcome = if secured { "secured" } else { "missing" };
        counter!("streak_checks_total", "outcome" => outcome).increment(1);
        gauge!("streak_last_check_ts").set(now.timestamp() as f64);
        tracing::debug!(identity = %identity, forum = %self.forum, outcome, "streak evaluated");

        EvaluationResult {
            streak_secured: secured,
            identity,
            forum: self.forum.clone(),
            evaluated_at: now,
        }
    }
}
