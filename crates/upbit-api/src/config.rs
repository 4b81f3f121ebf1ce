//! Configuration for the Upbit API client.

use std::time::Duration;

/// Configuration for the Upbit API client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the REST API (default: https://api.upbit.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Enable rate limiting.
    pub rate_limiting: bool,
    /// Rate limit configuration.
    pub rate_limit_config: RateLimitConfig,
    /// User agent string.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: crate::BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            rate_limiting: true,
            rate_limit_config: RateLimitConfig::default(),
            user_agent: format!("upbit-api-rust/{}", crate::VERSION),
        }
    }
}

impl Config {
    /// Create a configuration for public endpoints.
    pub fn public() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable rate limiting.
    pub fn with_rate_limiting(mut self, enabled: bool) -> Self {
        self.rate_limiting = enabled;
        self
    }

    /// Set the rate limit configuration.
    pub fn with_rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Rate limit configuration.
///
/// Upbit allows 10 quotation requests per second per IP; the defaults stay
/// under that.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub limit: u32,
    /// Window duration.
    pub window: Duration,
    /// Burst allowance (extra requests allowed in burst).
    pub burst_allowance: u32,
    /// Minimum delay between requests when rate limited.
    pub min_delay: Duration,
    /// Whether to automatically retry on rate limit errors.
    pub auto_retry: bool,
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Backoff multiplier for retries.
    pub backoff_multiplier: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 8,
            window: Duration::from_secs(1),
            burst_allowance: 2,
            min_delay: Duration::from_millis(20),
            auto_retry: true,
            max_retries: 3,
            backoff_multiplier: 2.0,
        }
    }
}

impl RateLimitConfig {
    /// Create a conservative rate limit configuration.
    pub fn conservative() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(1),
            burst_allowance: 0,
            min_delay: Duration::from_millis(50),
            auto_retry: true,
            max_retries: 5,
            backoff_multiplier: 2.0,
        }
    }

    /// Disable rate limiting (not recommended).
    pub fn disabled() -> Self {
        Self {
            limit: u32::MAX,
            window: Duration::from_secs(1),
            burst_allowance: 0,
            min_delay: Duration::ZERO,
            auto_retry: false,
            max_retries: 0,
            backoff_multiplier: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.upbit.com");
        assert!(config.rate_limiting);
        assert!(config.rate_limit_config.limit <= 10);
    }

    #[test]
    fn test_builder() {
        let config = Config::public()
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5))
            .with_rate_limiting(false);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.rate_limiting);
    }
}
