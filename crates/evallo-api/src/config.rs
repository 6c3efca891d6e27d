//! API client configuration.

use std::time::Duration;

/// Base URL of the backend when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5002/api";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("evallo/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Builder: set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the full URL for an endpoint path such as `/get/events`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Returns the URL that starts the OAuth login flow.
    pub fn login_url(&self) -> String {
        self.endpoint("/auth/google")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5002/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("evallo/"));
    }

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let config = ApiConfig::new("https://cal.example.com/api/");
        assert_eq!(
            config.endpoint("/get/events"),
            "https://cal.example.com/api/get/events"
        );
        assert_eq!(config.login_url(), "https://cal.example.com/api/auth/google");
    }

    #[test]
    fn builders() {
        let config = ApiConfig::new("http://x")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
    }
}
