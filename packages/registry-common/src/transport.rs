//! Retrying HTTP transport shared by every client.
//!
//! Wraps a pooled `reqwest::Client` with a fixed timeout and a retry policy:
//! transient statuses and connection/timeout failures are retried with
//! exponential backoff. When the retry budget runs out the last response is
//! handed back as-is so the caller can turn it into a `Remote` error with the
//! real body.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

/// Statuses worth retrying.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// How many times, and how patiently, a request is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,

    /// Base delay; retry `n` waits `backoff_factor * 2^(n-1)`.
    pub backoff_factor: Duration,

    /// Response statuses that trigger a retry.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_millis(400),
            retry_statuses: TRANSIENT_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_factor(mut self, backoff_factor: Duration) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_factor.saturating_mul(1 << exponent)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

/// Pooled HTTP client with timeout and retry policy.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    policy: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport with the default retry policy.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send the request produced by `build`, retrying transient failures.
    ///
    /// `build` is called once per attempt. Any status is returned as a
    /// response; only transport failures become errors.
    pub async fn send<F>(&self, service: &'static str, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let start = Instant::now();
        let mut retry = 0;

        loop {
            let attempt = build(&self.client).send().await;
            let retries_left = retry < self.policy.max_retries;

            match attempt {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if retries_left && self.policy.is_retryable_status(status) {
                        retry += 1;
                        let delay = self.policy.backoff(retry);
                        warn!(
                            service,
                            status,
                            retry,
                            max_retries = self.policy.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Transient status, retrying..."
                        );
                        sleep(delay).await;
                        continue;
                    }

                    debug!(
                        service,
                        status,
                        attempts = retry + 1,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "HTTP request finished"
                    );
                    return Ok(response);
                }
                Err(e) if retries_left && RetryPolicy::is_retryable_error(&e) => {
                    retry += 1;
                    let delay = self.policy.backoff(retry);
                    warn!(
                        service,
                        error = %e,
                        retry,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying..."
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    warn!(service, error = %e, attempts = retry + 1, "Request failed");
                    return Err(ApiError::Transport { service, source: e });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable_status(status));
        }
        assert!(!policy.is_retryable_status(404));
        assert!(!policy.is_retryable_status(501));
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(400));
        assert_eq!(policy.backoff(2), Duration::from_millis(800));
        assert_eq!(policy.backoff(3), Duration::from_millis(1600));
    }

    #[test]
    fn test_none_policy() {
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
