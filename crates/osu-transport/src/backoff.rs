//! Backoff between rate-limited attempts

use std::time::Duration;

use rand::RngExt;

/// Longest whole-second wait before jitter.
pub const MAX_BACKOFF_SECS: u64 = 32;

/// Delay before retry number `attempt` (starting at 0).
///
/// `min(2^attempt, 32)` seconds plus up to one second of random jitter, so
/// callers that were refused together do not retry in lockstep.
pub fn backoff_delay(attempt: u32) -> Duration {
    let base = 2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECS);
    let jitter: f64 = rand::rng().random_range(0.0..1.0);
    Duration::from_secs_f64(base as f64 + jitter)
}
