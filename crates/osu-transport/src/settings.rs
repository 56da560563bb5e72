//! Transport configuration

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://osu.ppy.sh/api/v2";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(240);

/// Where requests go and how long they may take.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSettings {
    /// API root every request path is appended to
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl TransportSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Join `path` onto the base URL with exactly one `/` between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
