//! Per-client token buckets for the public forms (contact, feedback,
//! comments).

use std::time::{Duration, Instant};

use configs::ThrottleConfig;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Above this many tracked clients, full buckets are dropped on insert.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    tokens: u32,
    refill_every: Duration,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_every: Duration, now: Instant) -> Self {
        Self { capacity, tokens: capacity, refill_every, last_refill: now }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Whole tokens only; the partial interval carries over.
    fn refill(&mut self, now: Instant) {
        if self.refill_every.is_zero() {
            self.tokens = self.capacity;
            return;
        }
        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = (elapsed.as_nanos() / self.refill_every.as_nanos()) as u64;
        if earned > 0 {
            self.tokens = (self.tokens as u64 + earned).min(self.capacity as u64) as u32;
            self.last_refill += self.refill_every * earned.min(u32::MAX as u64) as u32;
            debug!(tokens = self.tokens, "throttle bucket refilled");
        }
    }

    fn is_full(&mut self, now: Instant) -> bool {
        self.refill(now);
        self.tokens >= self.capacity
    }
}

pub struct SubmissionThrottle {
    buckets: DashMap<String, TokenBucket>,
    capacity: u32,
    refill_every: Duration,
    enabled: bool,
}

impl SubmissionThrottle {
    pub fn new(capacity: u32, refill_every: Duration, enabled: bool) -> Self {
        Self { buckets: DashMap::new(), capacity, refill_every, enabled }
    }

    pub fn from_config(cfg: &ThrottleConfig) -> Self {
        Self::new(cfg.burst, Duration::from_secs(cfg.refill_every_secs), cfg.enabled)
    }

    pub fn disabled() -> Self {
        Self::new(u32::MAX, Duration::ZERO, false)
    }

    /// Take one submission token for `client`.
    pub fn check(&self, client: &str) -> Result<(), ServiceError> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> Result<(), ServiceError> {
        if !self.enabled {
            return Ok(());
        }
        if self.buckets.len() > PRUNE_THRESHOLD {
            self.buckets.retain(|_, b| !b.is_full(now));
        }
        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_every, now));
        if bucket.try_acquire(now) {
            Ok(())
        } else {
            warn!(client, "submission throttled");
            Err(ServiceError::Throttled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_then_throttle_then_refill() {
        let t0 = Instant::now();
        let throttle = SubmissionThrottle::new(2, Duration::from_secs(60), true);
        assert!(throttle.check_at("1.2.3.4", t0).is_ok());
        assert!(throttle.check_at("1.2.3.4", t0).is_ok());
        assert!(matches!(throttle.check_at("1.2.3.4", t0), Err(ServiceError::Throttled)));

        // other clients have their own bucket
        assert!(throttle.check_at("5.6.7.8", t0).is_ok());

        // one interval later exactly one more token is available
        let later = t0 + Duration::from_secs(61);
        assert!(throttle.check_at("1.2.3.4", later).is_ok());
        assert!(throttle.check_at("1.2.3.4", later).is_err());
    }

    #[test]
    fn refill_never_exceeds_capacity() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new(3, Duration::from_secs(1), t0);
        assert!(bucket.try_acquire(t0));
        let much_later = t0 + Duration::from_secs(3600);
        for _ in 0..3 {
            assert!(bucket.try_acquire(much_later));
        }
        assert!(!bucket.try_acquire(much_later));
    }

    #[test]
    fn disabled_throttle_always_allows() {
        let throttle = SubmissionThrottle::disabled();
        for _ in 0..100 {
            assert!(throttle.check("same").is_ok());
        }
    }
}
