//! Quota tracking from GitHub's `X-RateLimit-*` response headers.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::HeaderMap;
use thiserror::Error;
use tracing::{debug, info};

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// When to stop and wait for the quota window to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Wait once the remaining quota drops below this value.
    pub threshold: u64,
    /// Added on top of the time left until the reset timestamp.
    pub buffer: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            threshold: 5,
            buffer: Duration::from_secs(10),
        }
    }
}

/// Quota state read from a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub remaining: u64,
    /// Unix epoch seconds at which the window resets.
    pub reset_at: i64,
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("MissingHeader: {name}")]
    MissingHeader { name: &'static str },

    #[error("InvalidHeader: {name}={value}")]
    InvalidHeader { name: &'static str, value: String },
}

impl RateLimitSnapshot {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, RateLimitError> {
        Ok(Self {
            remaining: parse_header(headers, REMAINING_HEADER)?,
            reset_at: parse_header(headers, RESET_HEADER)?,
        })
    }
}

fn parse_header<T: std::str::FromStr>(
    headers: &HeaderMap,
    name: &'static str,
) -> Result<T, RateLimitError> {
    let raw = headers
        .get(name)
        .ok_or(RateLimitError::MissingHeader { name })?;

    let text = raw.to_str().map_err(|_| RateLimitError::InvalidHeader {
        name,
        value: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
    })?;

    text.trim()
        .parse()
        .map_err(|_| RateLimitError::InvalidHeader {
            name,
            value: text.to_string(),
        })
}

impl RateLimitPolicy {
    /// How long to wait given `snapshot` at unix time `now`.
    ///
    /// `None` when the quota is above the threshold, or when the reset is far
    /// enough in the past that the buffered wait is not positive.
    pub fn wait_for(&self, snapshot: &RateLimitSnapshot, now: i64) -> Option<Duration> {
        if snapshot.remaining >= self.threshold {
            return None;
        }

        let buffer = i64::try_from(self.buffer.as_secs()).unwrap_or(i64::MAX);
        let seconds = snapshot.reset_at.saturating_sub(now).saturating_add(buffer);
        if seconds <= 0 {
            return None;
        }

        Some(Duration::from_secs(seconds as u64))
    }
}

/// Inspects every response and suspends the caller while the quota is exhausted.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { policy }
    }

    /// Reads the quota headers and waits for the reset if needed.
    ///
    /// Returns how long it waited. Missing or malformed headers are an error:
    /// every call must be protected.
    pub async fn observe(&self, headers: &HeaderMap) -> Result<Option<Duration>, RateLimitError> {
        let snapshot = RateLimitSnapshot::from_headers(headers)?;
        let now = Utc::now().timestamp();

        debug!(
            remaining = snapshot.remaining,
            reset_in = snapshot.reset_at.saturating_sub(now),
            "Rate limit status"
        );

        let Some(wait) = self.policy.wait_for(&snapshot, now) else {
            return Ok(None);
        };

        info!(
            "Rate limit almost reached. Waiting for reset in {} seconds...",
            wait.as_secs()
        );
        tokio::time::sleep(wait).await;
        info!("Resuming");

        Ok(Some(wait))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(remaining: &str, reset: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(REMAINING_HEADER, HeaderValue::from_str(remaining).unwrap());
        map.insert(RESET_HEADER, HeaderValue::from_str(reset).unwrap());
        map
    }

    #[test]
    fn no_wait_at_threshold() {
        let policy = RateLimitPolicy::default();
        let snapshot = RateLimitSnapshot { remaining: 5, reset_at: 1_000 };
        assert_eq!(policy.wait_for(&snapshot, 900), None);
    }

    #[test]
    fn waits_until_reset_plus_buffer_below_threshold() {
        let policy = RateLimitPolicy::default();
        let snapshot = RateLimitSnapshot { remaining: 4, reset_at: 1_000 };
        assert_eq!(policy.wait_for(&snapshot, 900), Some(Duration::from_secs(110)));

        let exhausted = RateLimitSnapshot { remaining: 0, reset_at: 1_000 };
        assert_eq!(policy.wait_for(&exhausted, 1_000), Some(Duration::from_secs(10)));
    }

    #[test]
    fn stale_reset_never_yields_negative_wait() {
        let policy = RateLimitPolicy::default();
        let snapshot = RateLimitSnapshot { remaining: 0, reset_at: 1_000 };
        assert_eq!(policy.wait_for(&snapshot, 1_010), None);
        assert_eq!(policy.wait_for(&snapshot, 5_000), None);
        assert_eq!(policy.wait_for(&snapshot, 1_009), Some(Duration::from_secs(1)));
    }

    #[test]
    fn parses_snapshot_from_headers() {
        let snapshot = RateLimitSnapshot::from_headers(&headers("4999", "1700000000")).unwrap();
        assert_eq!(
            snapshot,
            RateLimitSnapshot { remaining: 4999, reset_at: 1_700_000_000 }
        );
    }

    #[test]
    fn missing_header_is_an_error() {
        let mut map = HeaderMap::new();
        map.insert(RESET_HEADER, HeaderValue::from_static("1700000000"));
        let err = RateLimitSnapshot::from_headers(&map).unwrap_err();
        assert!(matches!(err, RateLimitError::MissingHeader { name } if name == REMAINING_HEADER));
    }

    #[test]
    fn malformed_header_is_an_error() {
        let err = RateLimitSnapshot::from_headers(&headers("lots", "1700000000")).unwrap_err();
        assert!(matches!(err, RateLimitError::InvalidHeader { value, .. } if value == "lots"));
    }

    #[tokio::test]
    async fn observe_returns_without_waiting_when_quota_is_healthy() {
        let limiter = RateLimiter::default();
        let waited = limiter.observe(&headers("60", "0")).await.unwrap();
        assert_eq!(waited, None);
    }

    #[tokio::test]
    async fn observe_skips_wait_when_reset_already_passed() {
        let limiter = RateLimiter::default();
        let long_ago = (Utc::now().timestamp() - 3_600).to_string();
        let waited = limiter.observe(&headers("0", &long_ago)).await.unwrap();
        assert_eq!(waited, None);
    }

    #[tokio::test]
    async fn observe_tolerates_extreme_reset_values() {
        let limiter = RateLimiter::default();
        let waited = limiter
            .observe(&headers("60", &i64::MIN.to_string()))
            .await
            .unwrap();
        assert_eq!(waited, None);
    }
}
