//! Error types for transport operations

/// Errors from building HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;
