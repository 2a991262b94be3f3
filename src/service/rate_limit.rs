//! Per-user rate limiting for emoji imports.
//!
//! The in-memory `SlidingWindowRateLimiter` is the only implementation shipped. The
//! `RateLimiter` trait is async so a shared backend can be plugged in for deployments
//! running several instances.

use chrono::{DateTime, Duration, Utc};
use serenity::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Result of asking the limiter for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request was recorded and may proceed.
    Allowed,
    /// The user is at the ceiling; `retry_after` is when the oldest request expires.
    Limited { retry_after: std::time::Duration },
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records a request for `user_id` at `now` if the user is under the ceiling.
    async fn try_acquire(&self, user_id: u64, now: DateTime<Utc>) -> RateDecision;

    /// Drops users whose every recorded request has left the window.
    ///
    /// # Returns
    /// - Number of users removed
    async fn prune_idle(&self, now: DateTime<Utc>) -> usize;
}

/// Allows at most `max_requests` per user in any trailing window of `window`.
pub struct SlidingWindowRateLimiter {
    windows: Mutex<HashMap<u64, VecDeque<DateTime<Utc>>>>,
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowRateLimiter {
    /// Creates a limiter.
    ///
    /// # Arguments
    /// - `max_requests` - Requests allowed per window
    /// - `window` - Length of the trailing window
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    fn acquire(&self, user_id: u64, now: DateTime<Utc>) -> RateDecision {
        let cutoff = now - self.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = windows.entry(user_id).or_default();

        while entries.front().is_some_and(|t| *t <= cutoff) {
            entries.pop_front();
        }

        if entries.len() >= self.max_requests {
            let expires_at = entries.front().map_or(now + self.window, |t| *t + self.window);
            let retry_after = (expires_at - now).to_std().unwrap_or_default();
            return RateDecision::Limited { retry_after };
        }

        entries.push_back(now);
        RateDecision::Allowed
    }

    fn prune(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, entries| entries.back().is_some_and(|t| *t > cutoff));
        before - windows.len()
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn try_acquire(&self, user_id: u64, now: DateTime<Utc>) -> RateDecision {
        self.acquire(user_id, now)
    }

    async fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let removed = self.prune(now);
        if removed > 0 {
            tracing::debug!("Pruned {} idle rate limit windows", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_allows_up_to_ceiling() {
        let limiter = SlidingWindowRateLimiter::new(3, Duration::seconds(60));
        for _ in 0..3 {
            assert_eq!(limiter.try_acquire(1, t0()).await, RateDecision::Allowed);
        }
        // 4th should be denied
        assert!(matches!(
            limiter.try_acquire(1, t0()).await,
            RateDecision::Limited { .. }
        ));
    }

    #[tokio::test]
    async fn test_retry_after_is_time_until_oldest_expires() {
        let limiter = SlidingWindowRateLimiter::new(2, Duration::seconds(60));
        limiter.try_acquire(1, t0()).await;
        limiter.try_acquire(1, t0() + Duration::seconds(20)).await;

        let decision = limiter.try_acquire(1, t0() + Duration::seconds(45)).await;
        assert_eq!(
            decision,
            RateDecision::Limited {
                retry_after: std::time::Duration::from_secs(15)
            }
        );
    }

    #[tokio::test]
    async fn test_window_slides() {
        let limiter = SlidingWindowRateLimiter::new(2, Duration::seconds(60));
        assert_eq!(limiter.try_acquire(1, t0()).await, RateDecision::Allowed);
        assert_eq!(
            limiter.try_acquire(1, t0() + Duration::seconds(30)).await,
            RateDecision::Allowed
        );
        assert_ne!(
            limiter.try_acquire(1, t0() + Duration::seconds(59)).await,
            RateDecision::Allowed
        );

        // First request leaves the window exactly 60s later
        assert_eq!(
            limiter.try_acquire(1, t0() + Duration::seconds(60)).await,
            RateDecision::Allowed
        );
        assert_ne!(
            limiter.try_acquire(1, t0() + Duration::seconds(61)).await,
            RateDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_denied_requests_are_not_recorded() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::seconds(10));
        limiter.try_acquire(1, t0()).await;
        for s in 1..10 {
            limiter.try_acquire(1, t0() + Duration::seconds(s)).await;
        }
        assert_eq!(
            limiter.try_acquire(1, t0() + Duration::seconds(10)).await,
            RateDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_different_users_independent() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::seconds(60));
        assert_eq!(limiter.try_acquire(1, t0()).await, RateDecision::Allowed);
        assert_ne!(limiter.try_acquire(1, t0()).await, RateDecision::Allowed);
        assert_eq!(limiter.try_acquire(2, t0()).await, RateDecision::Allowed);
    }

    #[tokio::test]
    async fn test_window_never_exceeds_ceiling() {
        let limiter = SlidingWindowRateLimiter::new(5, Duration::seconds(60));
        for s in 0..100 {
            limiter.try_acquire(1, t0() + Duration::seconds(s)).await;
        }
        let windows = limiter.windows.lock().unwrap();
        assert!(windows[&1].len() <= 5);
    }

    #[tokio::test]
    async fn test_zero_ceiling_denies_everything() {
        let limiter = SlidingWindowRateLimiter::new(0, Duration::seconds(60));
        assert_eq!(
            limiter.try_acquire(1, t0()).await,
            RateDecision::Limited {
                retry_after: std::time::Duration::from_secs(60)
            }
        );
    }

    #[tokio::test]
    async fn test_prune_removes_only_idle_users() {
        let limiter = SlidingWindowRateLimiter::new(5, Duration::seconds(60));
        limiter.try_acquire(1, t0()).await;
        limiter.try_acquire(2, t0() + Duration::seconds(50)).await;

        assert_eq!(limiter.prune_idle(t0() + Duration::seconds(70)).await, 1);

        let windows = limiter.windows.lock().unwrap();
        assert!(!windows.contains_key(&1));
        assert!(windows.contains_key(&2));
    }

    #[tokio::test]
    async fn test_prune_on_empty_limiter() {
        let limiter = SlidingWindowRateLimiter::new(5, Duration::seconds(60));
        assert_eq!(limiter.prune_idle(t0()).await, 0);
    }
}
