use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_NOTIFY_MS: u64 = 5_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the portal client.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_url: String,
    pub api_prefix: String,
    pub csrf_cookie: String,
    pub poll_interval: Duration,
    pub notification_duration: Duration,
    pub request_timeout: Duration,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            username: None,
            password: None,
        }
    }
}

impl Config {
    /// Build the config from `PORTAL_*` environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let text = |key: &str, default: String| match lookup(key) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => default,
        };

        let site_url = text("PORTAL_URL", defaults.site_url)
            .trim_end_matches('/')
            .to_string();
        let api_prefix = normalize_prefix(&text("PORTAL_API_PREFIX", defaults.api_prefix));
        let csrf_cookie = text("PORTAL_CSRF_COOKIE", defaults.csrf_cookie);

        let poll_ms = parse_or(&lookup, "PORTAL_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let poll_ms = if poll_ms == 0 {
            log::warn!("PORTAL_POLL_INTERVAL_MS must be positive, using {DEFAULT_POLL_INTERVAL_MS}");
            DEFAULT_POLL_INTERVAL_MS
        } else {
            poll_ms
        };
        let notify_ms = parse_or(&lookup, "PORTAL_NOTIFY_MS", DEFAULT_NOTIFY_MS);
        let timeout_secs = parse_or(&lookup, "PORTAL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        Config {
            site_url,
            api_prefix,
            csrf_cookie,
            poll_interval: Duration::from_millis(poll_ms),
            notification_duration: Duration::from_millis(notify_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            username: lookup("PORTAL_USERNAME").filter(|v| !v.is_empty()),
            password: lookup("PORTAL_PASSWORD").filter(|v| !v.is_empty()),
        }
    }

    pub fn api_root(&self) -> String {
        format!("{}{}", self.site_url, self.api_prefix)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Invalid {key} value '{raw}', using {default}");
                default
            }
        },
        None => default,
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
