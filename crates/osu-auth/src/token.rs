//! Token endpoint interactions
//!
//! All three grant types POST a form to `OAuthSettings::token_url()`:
//! 1. `client_credentials` for guest (app-only) tokens
//! 2. `authorization_code` to finish the interactive user flow
//! 3. `refresh_token` to renew a delegated token before it expires

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::OAuthSettings;

/// Scope requested for guest tokens; osu! grants nothing else to
/// `client_credentials`.
const GUEST_SCOPE: &str = "public";

/// Response from the token endpoint.
///
/// `refresh_token` is only issued to delegated (user) grants.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Request an app-only token with the client credentials grant.
pub async fn request_client_token(
    client: &reqwest::Client,
    settings: &OAuthSettings,
) -> Result<TokenResponse> {
    let (client_id, client_secret) = settings.client()?;
    let client_id = client_id.to_string();
    post_token_form(
        client,
        &settings.token_url(),
        "client_credentials",
        &[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
            ("scope", GUEST_SCOPE),
        ],
    )
    .await
}

/// Exchange an authorization code captured from the redirect for tokens.
pub async fn exchange_code(
    client: &reqwest::Client,
    settings: &OAuthSettings,
    code: &str,
) -> Result<TokenResponse> {
    let (client_id, client_secret) = settings.client()?;
    let client_id = client_id.to_string();
    post_token_form(
        client,
        &settings.token_url(),
        "authorization_code",
        &[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchange a refresh token for a new access/refresh pair.
pub async fn refresh_token(
    client: &reqwest::Client,
    settings: &OAuthSettings,
    refresh: &str,
) -> Result<TokenResponse> {
    let (client_id, client_secret) = settings.client()?;
    let client_id = client_id.to_string();
    post_token_form(
        client,
        &settings.token_url(),
        "refresh_token",
        &[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret),
            ("refresh_token", refresh),
            ("grant_type", "refresh_token"),
        ],
    )
    .await
}

async fn post_token_form(
    client: &reqwest::Client,
    url: &str,
    grant: &'static str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    debug!(grant, url, "requesting token");
    metrics::counter!("osu_auth_token_requests_total", "grant" => grant).increment(1);

    let response = client
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("{grant} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        // 401/403 means the client or refresh token was rejected outright
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(format!(
                "{grant} rejected ({status}): {body}"
            )));
        }

        return Err(Error::TokenExchange(format!(
            "{grant} returned {status}: {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid {grant} response: {e}")))
}
