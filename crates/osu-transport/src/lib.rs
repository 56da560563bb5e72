//! Request gating and HTTP transport for the osu! API client
//!
//! Two pieces sit between a caller and the network:
//! 1. `RateLimiter`: a token bucket refilled in whole seconds; callers loop
//!    on `try_acquire` with capped exponential backoff (`backoff_delay`)
//! 2. `TransportPool`: hands out a `reqwest::Client` per call (ad-hoc) or a
//!    shared one for the lifetime of a session (pinned), replacing a pinned
//!    client once it has been marked dead

pub mod backoff;
pub mod error;
pub mod limiter;
pub mod pool;
pub mod settings;

pub use backoff::backoff_delay;
pub use error::{Error, Result};
pub use limiter::{RateBudget, RateLimiter};
pub use pool::{TransportHandle, TransportPool};
pub use settings::TransportSettings;
