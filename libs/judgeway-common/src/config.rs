// Runtime configuration
// Read once from environment variables at process start, with defaults.

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SANDBOX_URL: &str = "https://judge0-ce.p.rapidapi.com";
pub const DEFAULT_SANDBOX_HOST: &str = "judge0-ce.p.rapidapi.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// How to reach the sandbox and how patiently to poll it
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub api_host: String,
    pub base64_encoded: bool,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub http_timeout: Duration,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SANDBOX_URL.to_string(),
            api_key: None,
            api_host: DEFAULT_SANDBOX_HOST.to_string(),
            base64_encoded: false,
            poll_interval: Duration::from_millis(1000),
            max_poll_attempts: 30,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl SandboxConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` uses the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("JUDGE0_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        let api_key = lookup("JUDGE0_API_KEY").filter(|key| !key.is_empty());
        let api_host = lookup("JUDGE0_API_HOST").unwrap_or(defaults.api_host);
        let base64_encoded = parse_or(&lookup, "JUDGE0_BASE64", defaults.base64_encoded)?;
        let poll_interval_ms = parse_or(
            &lookup,
            "JUDGE0_POLL_INTERVAL_MS",
            defaults.poll_interval.as_millis() as u64,
        )?;
        let max_poll_attempts =
            parse_or(&lookup, "JUDGE0_MAX_POLL_ATTEMPTS", defaults.max_poll_attempts)?.max(1);
        let http_timeout_secs = parse_or(
            &lookup,
            "JUDGE0_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?;

        Ok(Self {
            api_url,
            api_key,
            api_host,
            base64_encoded,
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_poll_attempts,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

/// Settings for the HTTP service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub redis_url: String,
    pub submission_ttl_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            submission_ttl_seconds: 86400,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            submission_ttl_seconds: parse_or(
                &lookup,
                "SUBMISSION_TTL_SECONDS",
                defaults.submission_ttl_seconds,
            )?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
