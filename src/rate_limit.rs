//! Per-key request admission over a trailing time window

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use dashmap::DashMap;
use tracing::debug;

/// Default number of admitted requests per window
pub const RATE_LIMIT: usize = 30;

/// Default window length
pub const RATE_PERIOD: Duration = Duration::from_secs(60);

/// Time source for the limiter
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.base + offset
    }
}

/// Sliding-eviction window limiter keyed by caller (usually the client IP).
///
/// Each key keeps the timestamps of its admitted requests. Timestamps older
/// than the period are dropped from the front on every check, so a bucket
/// only ever holds the trailing window. Rejected attempts are not recorded.
///
/// Keys are never removed; memory grows with the number of distinct callers.
pub struct RateLimiter {
    limit: usize,
    period: Duration,
    buckets: DashMap<String, VecDeque<Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self::with_clock(limit, period, Arc::new(SystemClock))
    }

    pub fn with_clock(limit: usize, period: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            period,
            buckets: DashMap::new(),
            clock,
        }
    }

    pub fn from_config(config: &crate::config::RateLimitConfig) -> Self {
        Self::new(config.limit, Duration::from_secs(config.period_secs))
    }

    /// Check `key` and record the attempt if admitted.
    ///
    /// Returns `true` when the caller is over the limit.
    pub fn is_rate_limited(&self, key: &str) -> bool {
        let now = self.clock.now();
        // The entry guard holds the shard lock, so concurrent callers for the
        // same key see a consistent, ordered bucket
        let mut bucket = self.buckets.entry(key.to_string()).or_default();

        while let Some(&oldest) = bucket.front() {
            if now.saturating_duration_since(oldest) > self.period {
                bucket.pop_front();
            } else {
                break;
            }
        }

        if bucket.len() >= self.limit {
            debug!("Rate limited '{}': {} requests in window", key, bucket.len());
            return true;
        }

        bucket.push_back(now);
        false
    }

    /// Number of distinct keys being tracked
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT, RATE_PERIOD)
    }
}
