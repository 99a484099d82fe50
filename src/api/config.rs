use std::time::Duration;

use crate::errors::{ApiError, ApiResult};

/// Backend address used when `API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
/// Request timeout used when `API_TIMEOUT` is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BASE_URL_VAR: &str = "API_BASE_URL";
const TIMEOUT_VAR: &str = "API_TIMEOUT";

/// Connection settings of an [`ApiClient`](super::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `API_BASE_URL` and `API_TIMEOUT` (a humantime string such as `"10s"`).
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            config.timeout = humantime::parse_duration(timeout.trim()).map_err(|error| {
                ApiError::Config(format!("invalid {TIMEOUT_VAR} `{timeout}`: {error}"))
            })?;
        }
        Ok(config)
    }

    /// Absolute URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.url("ar/scenes"), "http://localhost:8000/api/v1/ar/scenes");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ApiConfig::from_lookup(|name| match name {
            "API_BASE_URL" => Some("https://api.example.com/v2/".to_string()),
            "API_TIMEOUT" => Some("1m 30s".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.url("/feedback"), "https://api.example.com/v2/feedback");
    }

    #[test]
    fn rejects_bad_timeout() {
        let error = ApiConfig::from_lookup(|name| {
            (name == "API_TIMEOUT").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(error, ApiError::Config(message) if message.contains("API_TIMEOUT")));
    }
}
