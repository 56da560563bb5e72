//! Typed client for the osu! API v2
//!
//! Every operation builds one `RequestSpec` and hands it to the `Dispatcher`,
//! which for each call:
//! 1. Waits for rate budget (token bucket with backoff)
//! 2. Makes sure the credential holds a valid token
//! 3. Checks out an HTTP client from the transport pool and sends the request
//! 4. Turns non-2xx responses into `Error::Http`
//! 5. Merges the request's context fields into the JSON according to its
//!    `Shape`, then decodes the typed record
//!
//! `OsuClient` is the async entry point, `BlockingClient` wraps it for
//! synchronous callers on any number of threads.

pub mod blocking;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod external;
pub mod models;
pub mod ops;
pub mod request;
pub mod shape;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use blocking::BlockingClient;
pub use client::OsuClient;
pub use config::ClientConfig;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use external::ExternalApi;
pub use ops::{BeatmapLookup, Call};
pub use request::{Method, RequestSpec};
pub use shape::Shape;
pub use task::RequestHandle;
