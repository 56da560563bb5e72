//! Per-client configuration

use osu_transport::TransportSettings;

/// Default request budget; osu! asks clients to stay under this.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub requests_per_minute: u32,
    pub transport: TransportSettings,
    /// Start with a pinned (session-wide) transport instead of ad-hoc clients
    pub pinned: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            transport: TransportSettings::default(),
            pinned: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.transport.base_url = base_url.into();
        self
    }

    pub fn with_requests_per_minute(mut self, requests_per_minute: u32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}
