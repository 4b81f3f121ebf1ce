//! HTTP client for the Upbit API.

use reqwest::{Client, Method, RequestBuilder, Response};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, Error, Result};
use crate::rate_limit::RateLimiter;

/// HTTP client for making requests to the Upbit API.
#[derive(Debug, Clone)]
pub struct UpbitClient {
    config: Arc<Config>,
    http: Client,
    rate_limiter: RateLimiter,
}

impl UpbitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = RateLimiter::new(config.rate_limit_config.clone());

        Ok(Self {
            config: Arc::new(config),
            http,
            rate_limiter,
        })
    }

    /// Create a client with the default public configuration.
    pub fn public() -> Result<Self> {
        Self::new(Config::public())
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Make a request to a quotation endpoint.
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<HashMap<String, String>>,
        weight: u32,
    ) -> Result<T> {
        // Apply rate limiting
        if self.config.rate_limiting {
            self.rate_limiter.acquire(weight).await;
        }

        let url = format!("{}/v1{}", self.config.base_url, endpoint);

        let mut request = self
            .http
            .request(method, &url)
            .header("accept", "application/json");

        if let Some(params) = params {
            request = request.query(&params);
        }

        self.execute_request(request).await
    }

    /// Execute a request, retrying on rate limit responses.
    async fn execute_request<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let mut retries = 0;
        let max_retries = if self.config.rate_limiting {
            self.config.rate_limit_config.max_retries
        } else {
            0
        };

        loop {
            let request_clone = request
                .try_clone()
                .ok_or_else(|| Error::InvalidParameter("Failed to clone request".to_string()))?;

            let response = request_clone.send().await?;

            match self.handle_response(response).await {
                Ok(value) => return Ok(value),
                Err(Error::RateLimited { retry_after_ms }) => {
                    if retries >= max_retries || !self.config.rate_limit_config.auto_retry {
                        return Err(Error::RateLimited { retry_after_ms });
                    }

                    // Record rate limit and wait
                    self.rate_limiter.record_rate_limit(retry_after_ms).await;

                    let wait_ms = retry_after_ms.unwrap_or(1000);
                    let backoff = (self.config.rate_limit_config.backoff_multiplier as u64)
                        .pow(retries as u32);
                    let total_wait = wait_ms * backoff;

                    tracing::warn!(
                        "Rate limited, waiting {}ms before retry {}/{}",
                        total_wait,
                        retries + 1,
                        max_retries
                    );

                    tokio::time::sleep(std::time::Duration::from_millis(total_wait)).await;
                    self.rate_limiter.clear_rate_limit().await;

                    retries += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Handle the API response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T> {
        let status = response.status();

        // Check for rate limit
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .map(|s: u64| s * 1000); // Convert seconds to milliseconds

            return Err(Error::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(Error::Api(ApiError::new(
                    status.as_u16(),
                    stringify_name(&envelope.error.name),
                    envelope.error.message,
                )));
            }

            return Err(Error::Api(ApiError::new(
                status.as_u16(),
                "http_error",
                format!("HTTP {}: {}", status, body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", body);
            Error::Json(e)
        })
    }

    /// Make a GET request to a quotation endpoint.
    pub async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<HashMap<String, String>>,
        weight: u32,
    ) -> Result<T> {
        self.request(Method::GET, endpoint, params, weight).await
    }
}

/// Error response from the API.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    // String for quotation endpoints, numeric for exchange endpoints.
    name: serde_json::Value,
    message: String,
}

fn stringify_name(name: &serde_json::Value) -> String {
    match name {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_client() {
        let client = UpbitClient::public().unwrap();
        assert_eq!(client.config().base_url, "https://api.upbit.com");
    }

    #[test]
    fn test_error_envelope_string_name() {
        let body = r#"{"error":{"name":"invalid_query_payload","message":"Invalid parameter"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(stringify_name(&envelope.error.name), "invalid_query_payload");
    }

    #[test]
    fn test_error_envelope_numeric_name() {
        let body = r#"{"error":{"name":400,"message":"Type mismatch"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(stringify_name(&envelope.error.name), "400");
    }
}
