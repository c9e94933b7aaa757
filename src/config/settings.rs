// src/config/settings.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::feed::reddit::RedditCredentials;

pub const ENV_CONFIG_PATH: &str = "STREAK_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/streak.toml";
const DEFAULT_PORT: u16 = 8080;

fn default_subreddit() -> String {
    "toyhouse".to_string()
}
fn default_user_agent() -> String {
    concat!("streak-watch/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_auth_base() -> String {
    "https://www.reddit.com".to_string()
}
fn default_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}

/// Non-secret knobs. Everything has a default, so the file is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_auth_base")]
    pub auth_base_url: String,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subreddit: default_subreddit(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout_secs(),
            auth_base_url: default_auth_base(),
            api_base_url: default_api_base(),
        }
    }
}

fn is_valid_subreddit(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Settings {
    fn sanitize(mut self) -> Result<Self> {
        self.subreddit = self
            .subreddit
            .trim()
            .trim_start_matches("r/")
            .trim_matches('/')
            .to_string();
        if self.subreddit.is_empty() {
            self.subreddit = default_subreddit();
        }
        if !is_valid_subreddit(&self.subreddit) {
            return Err(anyhow!(
                "subreddit {:?} may only contain letters, digits and '_'",
                self.subreddit
            ));
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_timeout_secs();
        }
        Ok(self)
    }
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let s: Settings = toml::from_str(&content)
        .with_context(|| format!("parsing settings in {}", path.display()))?;
    s.sanitize()
        .with_context(|| format!("validating settings in {}", path.display()))
}

/// Load settings using env var + fallbacks:
/// 1) $STREAK_CONFIG_PATH (must exist when set)
/// 2) config/streak.toml
/// 3) built-in defaults
pub fn load_settings_default() -> Result<Settings> {
    if let Ok(p) = env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_settings_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
    if fallback.exists() {
        return load_settings_from(&fallback);
    }
    Ok(Settings::default())
}

fn required_var(key: &str) -> Result<String> {
    let v = env::var(key).map_err(|_| anyhow!("Missing {key} env var"))?;
    if v.trim().is_empty() {
        return Err(anyhow!("{key} is set but empty"));
    }
    Ok(v)
}

pub fn reddit_credentials_from_env() -> Result<RedditCredentials> {
    Ok(RedditCredentials {
        client_id: required_var("REDDIT_CLIENT_ID")?,
        client_secret: required_var("REDDIT_CLIENT_SECRET")?,
        username: required_var("REDDIT_USERNAME")?,
        password: required_var("REDDIT_PASSWORD")?,
    })
}

/// `$PORT`, defaulting to 8080 when unset.
pub fn listen_port() -> Result<u16> {
    match env::var("PORT") {
        Ok(p) if !p.trim().is_empty() => p
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT is not a valid port: {p:?}")),
        _ => Ok(DEFAULT_PORT),
    }
}
