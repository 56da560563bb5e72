//! Token-bucket rate limiter
//!
//! The budget refills at `requests_per_minute / 60` tokens per second up to a
//! capacity of `max(1, rate)`. Time is counted in whole seconds since the
//! limiter was created, so a burst within the same second never sees a refill.
//! Every refill-then-consume step runs under one lock.

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::backoff::backoff_delay;

/// Snapshot of the bucket.
///
/// Invariant: `0 <= available <= capacity` and `capacity = max(1, rate_per_second)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateBudget {
    pub rate_per_second: f64,
    pub capacity: f64,
    pub available: f64,
    pub last_refill_secs: u64,
}

impl RateBudget {
    /// A full bucket for `requests_per_minute`, stamped at `now_secs`.
    pub fn new(requests_per_minute: u32, now_secs: u64) -> Self {
        let rate_per_second = f64::from(requests_per_minute) / 60.0;
        let capacity = rate_per_second.max(1.0);
        Self {
            rate_per_second,
            capacity,
            available: capacity,
            last_refill_secs: now_secs,
        }
    }

    /// Refill for the seconds elapsed since the last call, then take one
    /// token if a whole one is available.
    pub fn try_consume(&mut self, now_secs: u64) -> bool {
        let elapsed = now_secs.saturating_sub(self.last_refill_secs);
        self.last_refill_secs = now_secs;
        self.available = (self.available + elapsed as f64 * self.rate_per_second).min(self.capacity);

        if self.available < 1.0 {
            return false;
        }
        self.available -= 1.0;
        true
    }
}

struct LimiterState {
    budget: RateBudget,
    /// Set on the first refusal, cleared by the next success
    exhausted: bool,
}

/// Per-client request budget.
pub struct RateLimiter {
    state: Mutex<LimiterState>,
    origin: Instant,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(LimiterState {
                budget: RateBudget::new(requests_per_minute, 0),
                exhausted: false,
            }),
            origin: Instant::now(),
        }
    }

    fn now_secs(&self) -> u64 {
        self.origin.elapsed().as_secs()
    }

    /// Take one token if available; never waits.
    pub async fn try_acquire(&self) -> bool {
        let now = self.now_secs();
        let mut state = self.state.lock().await;
        let granted = state.budget.try_consume(now);

        if granted {
            state.exhausted = false;
        } else if !state.exhausted {
            state.exhausted = true;
            warn!(
                requests_per_minute = state.budget.rate_per_second * 60.0,
                "rate limit budget exhausted, backing off"
            );
        }
        granted
    }

    /// Wait until a token is granted, sleeping with backoff between attempts.
    pub async fn acquire(&self) {
        let mut attempt = 0;
        while !self.try_acquire().await {
            metrics::counter!("osu_api_rate_limited_total").increment(1);
            let delay = backoff_delay(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "waiting for rate budget");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Replace the whole budget with a full bucket at the new rate.
    pub async fn set_rate_limit(&self, requests_per_minute: u32) {
        let now = self.now_secs();
        let mut state = self.state.lock().await;
        state.budget = RateBudget::new(requests_per_minute, now);
        state.exhausted = false;
        debug!(requests_per_minute, "rate limit reconfigured");
    }

    pub async fn budget(&self) -> RateBudget {
        self.state.lock().await.budget.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    async fn drain(limiter: &RateLimiter) -> usize {
        let mut granted = 0;
        while limiter.try_acquire().await {
            granted += 1;
        }
        granted
    }

    #[test]
    fn capacity_is_at_least_one() {
        let slow = RateBudget::new(20, 0);
        assert_eq!(slow.capacity, 1.0);
        assert_eq!(slow.available, 1.0);

        let fast = RateBudget::new(1200, 0);
        assert_eq!(fast.rate_per_second, 20.0);
        assert_eq!(fast.capacity, 20.0);
    }

    #[test]
    fn refused_consume_only_refills() {
        let mut budget = RateBudget::new(20, 0);
        assert!(budget.try_consume(0));
        assert!(!budget.try_consume(1));
        assert_eq!(budget.last_refill_secs, 1);
        assert!((budget.available - 1.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn thousand_per_minute_allows_sixteen_per_second() {
        let limiter = RateLimiter::new(1000);

        assert_eq!(drain(&limiter).await, 16);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(drain(&limiter).await, 16);
    }

    #[tokio::test(start_paused = true)]
    async fn twenty_per_minute_refills_every_three_seconds() {
        let limiter = RateLimiter::new(20);

        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!limiter.try_acquire().await);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!limiter.try_acquire().await);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeping_one_period_after_exhaustion_grants_a_token() {
        let limiter = RateLimiter::new(90);
        drain(&limiter).await;

        // 1.5 tokens/s: one period is under a second, round up to whole seconds
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_elapsed_does_not_refill() {
        let limiter = RateLimiter::new(600);
        assert_eq!(drain(&limiter).await, 10);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_overdraw() {
        let limiter = Arc::new(RateLimiter::new(1000));
        let granted = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let limiter = Arc::clone(&limiter);
            let granted = Arc::clone(&granted);
            handles.push(tokio::spawn(async move {
                for _ in 0..4 {
                    if limiter.try_acquire().await {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let budget = limiter.budget().await;
        assert_eq!(granted.load(Ordering::SeqCst), budget.capacity.floor() as usize);
        assert!(budget.available >= 0.0 && budget.available <= budget.capacity);
    }

    #[tokio::test(start_paused = true)]
    async fn set_rate_limit_restores_full_bucket() {
        let limiter = RateLimiter::new(120);
        assert_eq!(drain(&limiter).await, 2);

        limiter.set_rate_limit(300).await;
        let budget = limiter.budget().await;
        assert_eq!(budget.capacity, 5.0);
        assert_eq!(budget.available, 5.0);
        assert_eq!(drain(&limiter).await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_waits_out_the_backoff() {
        let limiter = RateLimiter::new(60);
        assert!(limiter.try_acquire().await);

        let started = Instant::now();
        limiter.acquire().await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    /// Counts WARN events seen by the thread's default subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_warns_once_per_episode() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));
        let _guard = tracing::subscriber::set_default(subscriber);

        let limiter = RateLimiter::new(20);
        assert_eq!(drain(&limiter).await, 1);
        for _ in 0..5 {
            assert!(!limiter.try_acquire().await);
        }
        assert_eq!(warnings.load(Ordering::SeqCst), 1);

        // a grant ends the episode, the next refusal starts a new one
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(drain(&limiter).await, 1);
        assert!(!limiter.try_acquire().await);
        assert_eq!(warnings.load(Ordering::SeqCst), 2);

        // a reconfigured bucket starts a fresh episode
        limiter.set_rate_limit(20).await;
        assert_eq!(drain(&limiter).await, 1);
        assert_eq!(warnings.load(Ordering::SeqCst), 3);
    }
}
