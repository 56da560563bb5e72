//! Authorization-code capture for the interactive user flow
//!
//! The user opens the authorization URL in a browser; osu! redirects to
//! `REDIRECT_URI` with `?code=...`. A one-shot listener on the callback
//! address accepts that single redirect, pulls the code out of the request
//! line and answers with a small confirmation page.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::settings::OAuthSettings;

const SUCCESS_PAGE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/html\r\n\
Connection: close\r\n\r\n\
<html><body><h1>Authorization code received !</h1></body></html>\n";

const FAILURE_PAGE: &[u8] = b"HTTP/1.1 400 Bad Request\r\n\
Content-Type: text/html\r\n\
Connection: close\r\n\r\n\
<html><body><h1>No authorization code in redirect</h1></body></html>\n";

/// Build the URL the user opens to grant the application access.
pub fn build_authorization_url(settings: &OAuthSettings, client_id: u64) -> String {
    let scopes = settings
        .scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
        settings.authorize_url(),
        client_id,
        urlencoded(&settings.redirect_uri),
        urlencoded(&scopes),
    )
}

/// Bind the callback listener.
pub async fn listen(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Io(format!("binding callback listener on {addr}: {e}")))
}

/// Accept one redirect on `listener` and return its authorization code.
pub async fn capture_code(listener: TcpListener) -> Result<String> {
    let (mut stream, peer) = listener
        .accept()
        .await
        .map_err(|e| Error::Io(format!("accepting redirect: {e}")))?;
    debug!(%peer, "redirect connection accepted");

    let mut buf = vec![0u8; 8192];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(|e| Error::Io(format!("reading redirect: {e}")))?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let code = parse_code(&request);
    let page = if code.is_some() { SUCCESS_PAGE } else { FAILURE_PAGE };
    if let Err(e) = stream.write_all(page).await {
        warn!(error = %e, "failed to answer redirect");
    }
    let _ = stream.shutdown().await;

    code.ok_or_else(|| Error::TokenExchange("redirect did not carry an authorization code".into()))
}

/// Extract `code` from the request line, e.g. `GET /api?code=XYZ HTTP/1.1`.
pub fn parse_code(request: &str) -> Option<String> {
    let target = request.split_whitespace().nth(1)?;
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("code="))
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
}

/// Minimal URL encoding for parameter values.
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25")
        .replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('&', "%26")
}
