//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from OSU_CLIENT_SECRET or client_secret_file,
//! never stored in the TOML directly.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use common::Secret;
use osu_api::ClientConfig;
use osu_api::config::DEFAULT_REQUESTS_PER_MINUTE;
use osu_auth::{DEFAULT_HOST, OAuthSettings, REDIRECT_URI, Scope};
use serde::Deserialize;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub client: ClientSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Guest,
    User,
}

/// OAuth application settings
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    pub kind: CredentialKind,
    pub client_id: u64,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to OSU_CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Tokens are loaded from and saved to this file when set
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    #[serde(default = "default_callback_addr")]
    pub callback_addr: SocketAddr,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<Scope>,
}

/// API client settings
#[derive(Debug, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            base_url: None,
            pinned: false,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_redirect_uri() -> String {
    REDIRECT_URI.to_string()
}

fn default_callback_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 80))
}

fn default_scopes() -> Vec<Scope> {
    vec![Scope::Public, Scope::Identify]
}

fn default_requests_per_minute() -> u32 {
    DEFAULT_REQUESTS_PER_MINUTE
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. OSU_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if !config.oauth.host.starts_with("http://") && !config.oauth.host.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "host must start with http:// or https://, got: {}",
                config.oauth.host
            )));
        }

        if config.client.requests_per_minute == 0 {
            return Err(common::Error::Config(
                "requests_per_minute must be greater than 0".into(),
            ));
        }

        if let Some(base_url) = &config.client.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {base_url}"
            )));
        }

        if let Ok(secret) = std::env::var("OSU_CLIENT_SECRET") {
            config.oauth.client_secret = Secret::from_trimmed(&secret);
        } else if let Some(ref secret_file) = config.oauth.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Secret(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            config.oauth.client_secret = Secret::from_trimmed(&secret);
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or OSU_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("OSU_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("osu-cli.toml")
    }

    pub fn oauth_settings(&self) -> OAuthSettings {
        OAuthSettings {
            client_id: Some(self.oauth.client_id),
            client_secret: self.oauth.client_secret.clone(),
            host: self.oauth.host.clone(),
            redirect_uri: self.oauth.redirect_uri.clone(),
            callback_addr: self.oauth.callback_addr,
            scopes: self.oauth.scopes.clone(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_requests_per_minute(self.client.requests_per_minute)
            .pinned(self.client.pinned);
        if let Some(base_url) = &self.client.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }
}
