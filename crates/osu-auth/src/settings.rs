//! Per-instance OAuth configuration

use std::net::SocketAddr;

use common::Secret;

use crate::constants::{AUTHORIZE_PATH, DEFAULT_HOST, REDIRECT_URI, TOKEN_PATH};
use crate::error::{Error, Result};
use crate::scope::Scope;

/// OAuth application settings shared by both credential holders.
///
/// `host` is the web host (no trailing `/api/v2`); the token and authorization
/// endpoints are derived from it so a test server can stand in for osu!.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: Option<u64>,
    pub client_secret: Option<Secret<String>>,
    pub host: String,
    pub redirect_uri: String,
    /// Local address the authorization-code redirect is captured on
    pub callback_addr: SocketAddr,
    /// Scopes requested during interactive authorization
    pub scopes: Vec<Scope>,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            host: DEFAULT_HOST.to_string(),
            redirect_uri: REDIRECT_URI.to_string(),
            callback_addr: SocketAddr::from(([127, 0, 0, 1], 80)),
            scopes: vec![Scope::Public, Scope::Identify],
        }
    }
}

impl OAuthSettings {
    pub fn new(client_id: u64, client_secret: impl Into<Secret<String>>) -> Self {
        Self {
            client_id: Some(client_id),
            client_secret: Some(client_secret.into()),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_callback_addr(mut self, addr: SocketAddr) -> Self {
        self.callback_addr = addr;
        self
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), TOKEN_PATH)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), AUTHORIZE_PATH)
    }

    /// Client id and secret, or a `Config` error naming the missing one.
    pub(crate) fn client(&self) -> Result<(u64, &str)> {
        let id = self
            .client_id
            .ok_or_else(|| Error::Config("client id is missing".into()))?;
        let secret = self
            .client_secret
            .as_ref()
            .ok_or_else(|| Error::Config("client secret is missing".into()))?;
        Ok((id, secret.expose().as_str()))
    }
}
