// src/forge/rate_limit.rs
//! Interprets GitHub rate-limit headers and blocks until the quota resets.

use reqwest::header::HeaderMap;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota information carried by one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests left in the current window.
    pub remaining: u64,
    /// When the window resets, in seconds since the Unix epoch.
    pub reset_epoch_seconds: u64,
}

impl RateLimitState {
    /// Reads `X-RateLimit-Remaining` and `X-RateLimit-Reset`.
    ///
    /// A missing remaining count reads as `0`. Returns `None` when the reset
    /// is missing or either header is not an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_harvester::forge::RateLimitState;
    /// use reqwest::header::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-ratelimit-remaining", "0".parse().unwrap());
    /// headers.insert("x-ratelimit-reset", "1700000000".parse().unwrap());
    ///
    /// let state = RateLimitState::from_headers(&headers).unwrap();
    /// assert_eq!(state.remaining, 0);
    /// assert_eq!(state.reset_epoch_seconds, 1_700_000_000);
    /// assert_eq!(RateLimitState::from_headers(&HeaderMap::new()), None);
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = match headers.get(REMAINING_HEADER) {
            Some(_) => header_u64(headers, REMAINING_HEADER)?,
            None => 0,
        };
        Some(Self {
            remaining,
            reset_epoch_seconds: header_u64(headers, RESET_HEADER)?,
        })
    }

    /// The reset timestamp, if it is usable for a wait (non-zero).
    pub fn reset_at(&self) -> Option<u64> {
        (self.reset_epoch_seconds > 0).then_some(self.reset_epoch_seconds)
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// How long to block for a given reset timestamp and current time.
///
/// One extra second is added so the retried request lands strictly after the
/// quota renews.
pub(crate) fn wait_duration(reset_epoch_seconds: u64, now_epoch_seconds: u64) -> Duration {
    match reset_epoch_seconds.checked_sub(now_epoch_seconds) {
        Some(wait) if wait > 0 => Duration::from_secs(wait + 1),
        _ => Duration::ZERO,
    }
}

/// Blocks the calling thread until `reset_epoch_seconds` has passed.
///
/// Returns immediately if the timestamp is not in the future. Returns the
/// time actually slept.
pub fn wait_for_reset(reset_epoch_seconds: u64) -> Duration {
    let wait = wait_duration(reset_epoch_seconds, now_epoch_seconds());
    if !wait.is_zero() {
        log::warn!(
            "Rate limit reached, sleeping {} seconds until reset",
            wait.as_secs()
        );
        thread::sleep(wait);
    }
    wait
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, v.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_malformed_headers_yield_none() {
        let h = headers(&[(REMAINING_HEADER, "lots"), (RESET_HEADER, "1700000000")]);
        assert_eq!(RateLimitState::from_headers(&h), None);
        let h = headers(&[(REMAINING_HEADER, "10")]);
        assert_eq!(RateLimitState::from_headers(&h), None);
        let h = headers(&[(REMAINING_HEADER, "-1"), (RESET_HEADER, "5")]);
        assert_eq!(RateLimitState::from_headers(&h), None);
    }

    #[test]
    fn test_missing_remaining_reads_as_zero() {
        let h = headers(&[(RESET_HEADER, "1700000000")]);
        let state = RateLimitState::from_headers(&h).unwrap();
        assert_eq!(state.remaining, 0);
        assert_eq!(state.reset_at(), Some(1_700_000_000));
    }

    #[test]
    fn test_zero_reset_is_not_usable() {
        let h = headers(&[(REMAINING_HEADER, "0"), (RESET_HEADER, "0")]);
        let state = RateLimitState::from_headers(&h).unwrap();
        assert_eq!(state.reset_at(), None);
    }

    #[test]
    fn test_wait_duration() {
        assert_eq!(wait_duration(1_000, 998), Duration::from_secs(3));
        assert_eq!(wait_duration(1_000, 1_000), Duration::ZERO);
        assert_eq!(wait_duration(1_000, 2_000), Duration::ZERO);
    }

    #[test]
    fn test_wait_for_past_reset_returns_immediately() {
        let started = std::time::Instant::now();
        assert_eq!(wait_for_reset(1), Duration::ZERO);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
