// src/feed/mod.rs
pub mod reddit;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// Number of newest entries a single evaluation looks at.
pub const SCAN_LIMIT: usize = 30;

/// One post in the monitored forum.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl FeedEntry {
    pub fn new(author: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            created_at,
        }
    }
}

/// Read-only access to the forum and to the account the service runs as.
///
/// Implementations must tolerate concurrent calls from the daily timer and
/// from request handlers.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Display name of the authenticated account.
    async fn current_identity(&self) -> Result<String>;

    /// Newest-first entries of `forum`, at most `limit` of them.
    async fn latest_entries(&self, forum: &str, limit: usize) -> Result<Vec<FeedEntry>>;

    fn name(&self) -> &'static str;
}

/// In-memory feed, handy for tests and local dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    pub identity: Option<String>,
    pub entries: Vec<FeedEntry>,
    pub fail_entries: bool,
}

impl StaticFeed {
    pub fn new(identity: impl Into<String>, entries: Vec<FeedEntry>) -> Self {
        Self {
            identity: Some(identity.into()),
            entries,
            fail_entries: false,
        }
    }

    /// A feed whose every call fails, as if the upstream were unreachable.
    pub fn unreachable() -> Self {
        Self {
            identity: None,
            entries: Vec::new(),
            fail_entries: true,
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for StaticFeed {
    async fn current_identity(&self) -> Result<String> {
        self.identity
            .clone()
            .ok_or_else(|| anyhow::anyhow!("identity lookup failed"))
    }

    async fn latest_entries(&self, _forum: &str, limit: usize) -> Result<Vec<FeedEntry>> {
        if self.fail_entries {
            anyhow::bail!("feed unreachable");
        }
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
