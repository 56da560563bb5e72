//! Error types for OAuth credential operations

/// Errors from token acquisition, claims decoding and token persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("invalid token claims: {0}")]
    Claims(String),

    #[error("invalid token file format: expected {expected} line(s), found {found}")]
    TokenFileFormat { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("scope not found in token claims: '{0}'")]
    Scope(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
