// Request pacing and retry for the HTTP collectors.
//
// Each collector owns a `RateLimiter` that enforces a minimum interval
// between requests (SearxNG and Reddit both throttle aggressively), and
// wraps every request in `with_retry`, which retries failures with capped
// exponential backoff.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::warn;

/// HTTP request timeout from a config value in seconds, floored at 100ms.
/// Infinite, NaN or out-of-range values are an error naming `label`.
pub fn request_timeout(label: &str, timeout_s: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(timeout_s.max(0.1))
        .with_context(|| format!("Invalid timeout_s for {label}: {timeout_s}"))
}

/// Enforces a minimum interval between requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// At most one request every `min_interval_s` seconds. Zero or negative
    /// disables pacing.
    pub fn new(min_interval_s: f64) -> Self {
        let interval = if min_interval_s.is_finite() && min_interval_s > 0.0 {
            Duration::from_secs_f64(min_interval_s)
        } else {
            Duration::ZERO
        };
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(last) = inner.last_request {
            let elapsed = last.elapsed();
            if elapsed < inner.interval {
                let sleep_time = inner.interval - elapsed;
                // Drop the lock before sleeping so other tasks aren't blocked
                drop(inner);
                tokio::time::sleep(sleep_time).await;
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            cap: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based): base * 2^(attempt-1),
    /// capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base.saturating_mul(1u32 << exponent).min(self.cap)
    }
}

/// Run `operation` until it succeeds or the policy's attempts run out.
///
/// The rate limiter is acquired before every attempt. The last error is
/// returned unchanged so callers can downcast it.
pub async fn with_retry<F, Fut, T>(
    rate_limiter: &RateLimiter,
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        rate_limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(err);
                }

                let backoff = policy.backoff(attempt);
                warn!(
                    target_name = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    backoff_secs = backoff.as_secs_f64(),
                    error = %err,
                    "Request failed, retrying in {:.1}s",
                    backoff.as_secs_f64(),
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
