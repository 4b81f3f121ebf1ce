//! Rate limiting implementation for the Upbit API client.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

/// Sliding-window book-keeping shared by client clones.
#[derive(Debug, Default)]
struct LimiterState {
    /// Timestamps of requests admitted within the current window.
    recent: VecDeque<Instant>,
    /// Set when the server answered 429; no request goes out before this.
    blocked_until: Option<Instant>,
}

impl LimiterState {
    /// Drop timestamps that have aged out of the window.
    fn prune(&mut self, now: Instant, window: Duration) {
        let cutoff = now - window;
        while self.recent.front().is_some_and(|t| *t < cutoff) {
            self.recent.pop_front();
        }
    }
}

/// Rate limiter for API requests.
///
/// Upbit throttles quotation endpoints per IP with a one-second window;
/// this tracks request timestamps in a sliding window and sleeps before a
/// request would exceed the configured limit.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Arc<Mutex<LimiterState>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(LimiterState::default())),
        }
    }

    /// Wait until a request of `weight` may go out, then record it.
    ///
    /// Returns the weight that was consumed.
    pub async fn acquire(&self, weight: u32) -> u32 {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();

                match state.blocked_until {
                    Some(until) if now < until => Some(until - now),
                    _ => {
                        state.blocked_until = None;
                        self.try_admit(&mut state, now, weight)
                    }
                }
            };

            match wait {
                None => return weight,
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }

    /// Admit the request into the window, or say how long to wait.
    fn try_admit(
        &self,
        state: &mut LimiterState,
        now: Instant,
        weight: u32,
    ) -> Option<Duration> {
        state.prune(now, self.config.window);

        let budget = self.config.limit + self.config.burst_allowance;
        if state.recent.len() as u32 + weight > budget {
            if let Some(&oldest) = state.recent.front() {
                let reopens = oldest + self.config.window;
                if reopens > now {
                    return Some((reopens - now).max(self.config.min_delay));
                }
            }
        }

        state
            .recent
            .extend(std::iter::repeat(now).take(weight as usize));
        None
    }

    /// Record that we received a rate limit response.
    pub async fn record_rate_limit(&self, retry_after_ms: Option<u64>) {
        let hold = retry_after_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        self.state.lock().await.blocked_until = Some(Instant::now() + hold);
    }

    /// Clear the rate limited state.
    pub async fn clear_rate_limit(&self) {
        self.state.lock().await.blocked_until = None;
    }

    /// Get the current request count in the window.
    pub async fn request_count(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune(Instant::now(), self.config.window);
        state.recent.len()
    }

    /// Get the remaining capacity in the window.
    pub async fn remaining(&self) -> u32 {
        let used = self.request_count().await as u32;
        self.config.limit.saturating_sub(used)
    }

    /// Check if rate limiting is currently active.
    pub async fn is_rate_limited(&self) -> bool {
        self.state
            .lock()
            .await
            .blocked_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Weight values for the quotation endpoints.
///
/// Upbit counts every quotation request as one against the per-second
/// window, so the weights are uniform; they exist so a future endpoint
/// group can diverge without touching call sites.
#[derive(Debug, Clone, Copy)]
pub struct EndpointWeight;

impl EndpointWeight {
    /// Market catalog endpoint weight.
    pub const MARKET_ALL: u32 = 1;
    /// Candle endpoints weight.
    pub const CANDLES: u32 = 1;
}
