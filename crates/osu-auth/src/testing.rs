//! Test helpers: JWT fabrication and a local token endpoint

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub(crate) const CLIENT_ID: u64 = 1;
pub(crate) const CLIENT_SECRET: &str = "secret";
pub(crate) const AUTH_CODE: &str = "abc";

pub(crate) fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

/// Unsigned JWT carrying `payload`.
pub(crate) fn jwt(payload: &serde_json::Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"RS256"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string()),
    )
}

pub(crate) fn fake_jwt(exp: f64, scopes: &[&str], sub: Option<&str>) -> String {
    let mut payload = serde_json::json!({
        "aud": "1",
        "jti": "test",
        "iat": exp - 86_400.0,
        "nbf": exp - 86_400.0,
        "exp": exp,
        "scopes": scopes,
    });
    if let Some(sub) = sub {
        payload["sub"] = serde_json::json!(sub);
    }
    jwt(&payload)
}

/// A token that stays valid well past the refresh margin.
pub(crate) fn valid_jwt(scopes: &[&str]) -> String {
    fake_jwt(now_secs() + 86_400.0, scopes, Some("2"))
}

/// A token already inside the refresh margin.
pub(crate) fn expiring_jwt(scopes: &[&str]) -> String {
    fake_jwt(now_secs() + 60.0, scopes, Some("2"))
}

#[derive(Clone, Default)]
pub(crate) struct TokenServerState {
    pub hits: Arc<AtomicUsize>,
    pub grants: Arc<Mutex<Vec<String>>>,
}

pub(crate) struct TokenServer {
    pub host: String,
    pub state: TokenServerState,
}

impl TokenServer {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

/// Start a token endpoint on an ephemeral port.
///
/// Every response is delayed 50ms so concurrent callers overlap with the
/// in-flight request. Each issued access token carries a distinct `jti`.
pub(crate) async fn start_token_server() -> TokenServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = TokenServerState::default();

    let app = Router::new()
        .route("/oauth/token", post(token_handler))
        .with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TokenServer {
        host: format!("http://{addr}"),
        state,
    }
}

async fn token_handler(
    State(state): State<TokenServerState>,
    Form(form): Form<HashMap<String, String>>,
) -> axum::response::Response {
    let n = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    let grant = form.get("grant_type").cloned().unwrap_or_default();
    state.grants.lock().await.push(grant.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client_ok = form.get("client_id").map(String::as_str) == Some("1")
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET);
    if !client_ok {
        return (StatusCode::UNAUTHORIZED, "invalid_client").into_response();
    }

    let access = |scopes: &[&str], sub: &str| {
        jwt(&serde_json::json!({
            "jti": format!("issued-{n}"),
            "exp": now_secs() + 86_400.0,
            "scopes": scopes,
            "sub": sub,
        }))
    };

    match grant.as_str() {
        "client_credentials" => Json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 86_400,
            "access_token": access(&["public"], ""),
        }))
        .into_response(),
        "refresh_token" => {
            let refresh = form.get("refresh_token").cloned().unwrap_or_default();
            if !refresh.starts_with("rt_") {
                return (StatusCode::UNAUTHORIZED, "invalid_grant").into_response();
            }
            Json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 86_400,
                "access_token": access(&["public", "identify"], "2"),
                "refresh_token": format!("rt_{n}"),
            }))
            .into_response()
        }
        "authorization_code" => {
            if form.get("code").map(String::as_str) != Some(AUTH_CODE) {
                return (StatusCode::BAD_REQUEST, "invalid_grant").into_response();
            }
            Json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 86_400,
                "access_token": access(&["public", "identify"], "2"),
                "refresh_token": "rt_code",
            }))
            .into_response()
        }
        _ => (StatusCode::BAD_REQUEST, "unsupported_grant_type").into_response(),
    }
}
