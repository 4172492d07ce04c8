use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Admission control for calls to the ledger API. Clones share one quota.
#[derive(Clone)]
pub enum Throttle {
    Limited(Arc<DefaultDirectRateLimiter>),
    Unlimited,
}

impl Throttle {
    /// At most `max_calls` admissions in any `window`. Admissions are spaced
    /// `window / max_calls` apart with no burst, which keeps every sliding
    /// window within the budget.
    pub fn per_window(max_calls: u32, window: Duration) -> Self {
        let calls = NonZeroU32::new(max_calls).unwrap_or(NonZeroU32::MIN);

        match Quota::with_period(window / calls.get()) {
            Some(quota) => Throttle::Limited(Arc::new(RateLimiter::direct(quota))),
            None => Throttle::Unlimited,
        }
    }

    /// Waits until the quota admits one more call.
    pub async fn acquire(&self) {
        if let Throttle::Limited(limiter) = self {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn blocks_callers_past_the_budget() {
        let throttle = Throttle::per_window(5, Duration::from_millis(500));
        let started = Instant::now();

        for _ in 0..6 {
            throttle.acquire().await;
        }

        // the sixth call has to wait for the window to move on
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn clones_share_the_quota() {
        let throttle = Throttle::per_window(2, Duration::from_millis(400));
        let other = throttle.clone();
        let started = Instant::now();

        throttle.acquire().await;
        other.acquire().await;
        throttle.acquire().await;

        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn unlimited_never_waits() {
        let throttle = Throttle::Unlimited;
        let started = Instant::now();

        for _ in 0..1000 {
            throttle.acquire().await;
        }

        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
