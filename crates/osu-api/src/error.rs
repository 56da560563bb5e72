//! Error types for API calls

/// Errors surfaced to callers of the API client.
///
/// Rate-limit exhaustion and a dead pinned transport are handled inside the
/// dispatcher and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Upstream answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("scope not found in token claims: '{0}'")]
    Scope(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    Auth(osu_auth::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<osu_auth::Error> for Error {
    fn from(err: osu_auth::Error) -> Self {
        match err {
            osu_auth::Error::Scope(scope) => Error::Scope(scope),
            osu_auth::Error::Config(msg) => Error::Config(msg),
            other => Error::Auth(other),
        }
    }
}

impl From<osu_transport::Error> for Error {
    fn from(err: osu_transport::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, Error>;
