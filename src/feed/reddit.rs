// src/feed/reddit.rs
//! Reddit-backed feed: OAuth2 password grant + `/r/{sub}/new` listing.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::feed::{FeedEntry, FeedSource};

/// Refresh the bearer token this long before Reddit says it expires.
const TOKEN_SLACK_SECS: i64 = 60;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const MAX_TOKEN_TTL_SECS: i64 = 7 * 86_400;

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(TOKEN_SLACK_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResp {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResp {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}
#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}
#[derive(Debug, Deserialize)]
struct Child {
    data: Submission,
}
#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(default)]
    author: String,
    created_utc: f64,
}

/// Token lifetime in seconds, kept within `0..=MAX_TOKEN_TTL_SECS`.
fn token_ttl_secs(expires_in: Option<f64>) -> i64 {
    expires_in
        .filter(|s| s.is_finite())
        .map(|s| s as i64)
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
        .clamp(0, MAX_TOKEN_TTL_SECS)
}

/// `base` plus percent-encoded path segments.
fn api_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid reddit api base {base:?}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("reddit api base cannot carry a path: {base:?}"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn unix_f64_to_utc(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis((ts * 1_000.0).round() as i64)
}

pub struct RedditFeed {
    http: Client,
    creds: RedditCredentials,
    auth_base: String,
    api_base: String,
    // Serializes token acquisition between the timer task and request handlers.
    token: Mutex<Option<CachedToken>>,
}

impl RedditFeed {
    pub fn new(creds: RedditCredentials, settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("building reddit http client")?;
        Ok(Self {
            http,
            creds,
            auth_base: settings.auth_base_url.trim_end_matches('/').to_string(),
            api_base: settings.api_base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Returns a valid bearer token, fetching a new one when the cached one is
    /// missing or about to expire.
    async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let now = Utc::now();
        if let Some(tok) = guard.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(tok.access_token.clone());
        }

        let url = format!("{}/api/v1/access_token", self.auth_base);
        let params = [
            ("grant_type", "password"),
            ("username", self.creds.username.as_str()),
            ("password", self.creds.password.as_str()),
        ];
        let resp: TokenResp = self
            .http
            .post(&url)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&params)
            .send()
            .await
            .context("reddit token request")?
            .error_for_status()
            .context("reddit token non-2xx")?
            .json()
            .await
            .context("decoding reddit token response")?;

        if let Some(err) = resp.error {
            return Err(anyhow!("reddit oauth error: {err}"));
        }
        let access_token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("reddit oauth response without access_token"))?;
        let expires_at = now + chrono::Duration::seconds(token_ttl_secs(resp.expires_in));

        tracing::debug!(target: "reddit", %expires_at, "obtained reddit access token");
        *guard = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });
        Ok(access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        what: &'static str,
    ) -> Result<T> {
        let token = self.bearer().await?;
        let rsp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("reddit {what} request"))?;
        if rsp.status() == StatusCode::UNAUTHORIZED {
            // Revoked or rotated credentials; the next call logs in again.
            *self.token.lock().await = None;
            tracing::warn!(target: "reddit", what, "bearer token rejected; cached token dropped");
        }
        let rsp = rsp
            .error_for_status()
            .with_context(|| format!("reddit {what} non-2xx"))?;
        rsp.json::<T>()
            .await
            .with_context(|| format!("decoding reddit {what}"))
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    async fn current_identity(&self) -> Result<String> {
        let url = api_url(&self.api_base, &["api", "v1", "me"])?;
        let me: MeResp = self.get_json(url, "identity").await?;
        Ok(me.name)
    }

    async fn latest_entries(&self, forum: &str, limit: usize) -> Result<Vec<FeedEntry>> {
        let mut url = api_url(&self.api_base, &["r", forum, "new"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("raw_json", "1");
        let listing: Listing = self.get_json(url, "listing").await?;

        let mut out = Vec::with_capacity(listing.data.children.len());
        for child in listing.data.children.into_iter().take(limit) {
            let Some(created_at) = unix_f64_to_utc(child.data.created_utc) else {
                tracing::warn!(
                    target: "reddit",
                    author = %child.data.author,
                    "skipping submission with unusable created_utc"
                );
                continue;
            };
            out.push(FeedEntry::new(child.data.author, created_at));
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}
