//! Test helpers: response fixtures, a fixed credential and a local upstream

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use osu_auth::{BoxFuture, CredentialHolder, CredentialKind, TokenClaims};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::models::Ruleset;

pub(crate) fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

pub(crate) fn beatmap_json(id: u64) -> Value {
    let cover = |name: &str| format!("https://assets.ppy.sh/beatmaps/1/covers/{name}.jpg");
    json!({
        "beatmapset_id": 1,
        "difficulty_rating": 4.87,
        "id": id,
        "mode": "osu",
        "status": "ranked",
        "total_length": 142,
        "user_id": 2,
        "version": "Insane",
        "checksum": "a5b99395a42bd55bc5eb1d2411cbdf8b",
        "max_combo": 314,
        "beatmapset": {
            "artist": "Kenji Ninuma",
            "artist_unicode": "Kenji Ninuma",
            "covers": {
                "cover": cover("cover"),
                "cover@2x": cover("cover@2x"),
                "card": cover("card"),
                "card@2x": cover("card@2x"),
                "list": cover("list"),
                "list@2x": cover("list@2x"),
                "slimcover": cover("slimcover"),
                "slimcover@2x": cover("slimcover@2x"),
            },
            "creator": "peppy",
            "favourite_count": 1000,
            "id": 1,
            "nsfw": false,
            "play_count": 500000,
            "preview_url": "//b.ppy.sh/preview/1.mp3",
            "source": "",
            "status": "ranked",
            "title": "DISCOPRINCE",
            "title_unicode": "DISCOPRINCE",
            "user_id": 2,
            "video": false,
            "offset": 0,
            "spotlight": false,
        },
        "accuracy": 6.0,
        "ar": 6.0,
        "convert": false,
        "count_circles": 160,
        "count_sliders": 30,
        "count_spinners": 1,
        "cs": 4.0,
        "drain": 6.0,
        "hit_length": 109,
        "is_scoreable": true,
        "last_updated": "2014-05-18T17:16:32Z",
        "mode_int": 0,
        "passcount": 12345,
        "playcount": 67890,
        "ranked": 1,
        "url": format!("https://osu.ppy.sh/beatmaps/{id}"),
        "bpm": 119.999,
        "deleted_at": null,
    })
}

/// A score as the upstream sends it: no `beatmap_id`.
pub(crate) fn score_json(id: u64, user_id: u64) -> Value {
    json!({
        "id": id,
        "best_id": id,
        "user_id": user_id,
        "accuracy": 0.9876,
        "mods": ["HD"],
        "score": 1234567,
        "max_combo": 300,
        "perfect": false,
        "statistics": {
            "count_50": 0,
            "count_100": 5,
            "count_300": 200,
            "count_geki": 40,
            "count_katu": 3,
            "count_miss": 1,
        },
        "passed": true,
        "rank": "S",
        "created_at": "2024-01-01T00:00:00Z",
        "mode": "osu",
        "mode_int": 0,
        "replay": false,
        "pp": 123.4,
    })
}

pub(crate) fn me_json(mode: Ruleset) -> Value {
    json!({
        "avatar_url": "https://a.ppy.sh/2",
        "country_code": "AU",
        "id": 2,
        "is_active": true,
        "is_bot": false,
        "is_deleted": false,
        "is_online": false,
        "is_supporter": true,
        "pm_friends_only": false,
        "username": "peppy",
        "default_group": "default",
        "country": {"code": "AU", "name": "Australia"},
        "cover": {"url": "https://assets.ppy.sh/user-profile-covers/2/cover.jpg", "custom_url": null, "id": "1"},
        "statistics": {
            "count_300": 1,
            "count_100": 2,
            "count_50": 3,
            "count_miss": 4,
            "level": {"current": 62, "progress": 5},
            "pp": 0.0,
            "ranked_score": 1,
            "hit_accuracy": 97.5,
            "play_count": 10,
            "play_time": 100,
            "total_score": 2,
            "total_hits": 3,
            "maximum_combo": 400,
            "replays_watched_by_others": 0,
            "is_ranked": false,
            "grade_counts": {"a": 1, "s": 2, "sh": 3, "ss": 4, "ssh": 5},
            "global_rank": null,
            "country_rank": null,
        },
        "has_supported": true,
        "join_date": "2007-08-28T03:09:12+00:00",
        "kudosu": {"available": 0, "total": 0},
        "max_blocks": 100,
        "max_friends": 500,
        "playmode": mode.as_str(),
        "playstyle": ["mouse", "keyboard"],
        "post_count": 100,
        "profile_order": ["me", "recent_activity"],
    })
}

/// Credential with a fixed token and scopes; never touches the network.
pub(crate) struct StaticCredential {
    claims: TokenClaims,
    pub ensure_calls: AtomicUsize,
}

impl StaticCredential {
    pub fn new(scopes: &[&str]) -> Self {
        Self {
            claims: TokenClaims {
                exp: now_secs() + 86_400.0,
                iat: None,
                jti: Some("static".into()),
                scopes: scopes.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
                sub: Some(2),
            },
            ensure_calls: AtomicUsize::new(0),
        }
    }
}

impl CredentialHolder for StaticCredential {
    fn kind(&self) -> CredentialKind {
        CredentialKind::User
    }

    fn ensure_valid(&self, _force_refresh: bool) -> BoxFuture<'_, osu_auth::Result<bool>> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(true) })
    }

    fn claims(&self) -> BoxFuture<'_, Option<TokenClaims>> {
        Box::pin(async move { Some(self.claims.clone()) })
    }

    fn access_token(&self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async { Some("static-token".to_string()) })
    }
}

/// What the upstream saw for the most recent API request.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub path: String,
    /// Query pairs with `%5B%5D` decoded back to `[]`
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub(crate) struct ApiState {
    pub hits: Arc<AtomicUsize>,
    pub token_hits: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<SeenRequest>>>,
}

pub(crate) struct ApiServer {
    /// `http://127.0.0.1:<port>`: token endpoint host
    pub host: String,
    /// `<host>/api/v2`
    pub base_url: String,
    /// `<host>/lea/beatmaps`
    pub ids_url: String,
    pub state: ApiState,
}

impl ApiServer {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

/// Start a fake osu! on an ephemeral port.
///
/// Fixture behaviour by beatmap id: `404` is not found, `13` returns a body
/// that is not a beatmap; leaderboards of beatmap `1` carry an own entry,
/// beatmap `2` has `user_score: null` and any other omits the key.
pub(crate) async fn start_api_server() -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = ApiState::default();

    let app = Router::new()
        .route("/oauth/token", post(token_handler))
        .fallback(api_handler)
        .with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let host = format!("http://{addr}");
    ApiServer {
        base_url: format!("{host}/api/v2"),
        ids_url: format!("{host}/lea/beatmaps"),
        host,
        state,
    }
}

async fn token_handler(State(state): State<ApiState>) -> Json<Value> {
    let n = state.token_hits.fetch_add(1, Ordering::SeqCst) + 1;
    let payload = json!({
        "jti": format!("guest-{n}"),
        "exp": now_secs() + 86_400.0,
        "scopes": ["public"],
        "sub": "",
    });
    let token = format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string()),
    );
    Json(json!({"token_type": "Bearer", "expires_in": 86_400, "access_token": token}))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (k.replace("%5B", "[").replace("%5D", "]"), v.to_string())
        })
        .collect()
}

async fn api_handler(
    State(state): State<ApiState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = parse_query(uri.query());
    let seen = SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: query.clone(),
        authorization: header(&headers, "authorization"),
        accept: header(&headers, "accept"),
        content_type: header(&headers, "content-type"),
        body: serde_json::from_slice(&body).ok(),
    };
    *state.last_request.lock().await = Some(seen);

    let path = uri.path().trim_end_matches('/');
    if path == "/lea/beatmaps" {
        return Json(json!({
            "ranked": {"beatmaps": [75, 3, 129]},
            "loved": {"beatmaps": [500, 3, 1]},
        }))
        .into_response();
    }

    state.hits.fetch_add(1, Ordering::SeqCst);
    let Some(path) = path.strip_prefix("/api/v2/") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let segments: Vec<&str> = path.split('/').collect();
    let id = |i: usize| segments.get(i).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
    let param = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Specified beatmap couldn't be found."})),
        )
            .into_response()
    };

    match segments.as_slice() {
        ["beatmaps"] => {
            let beatmaps: Vec<Value> = query
                .iter()
                .filter(|(k, _)| k == "ids[]")
                .filter_map(|(_, v)| v.parse().ok())
                .map(beatmap_json)
                .collect();
            Json(json!({"beatmaps": beatmaps})).into_response()
        }
        ["beatmaps", "lookup"] => {
            let id = param("id").and_then(|v| v.parse().ok()).unwrap_or(1);
            Json(beatmap_json(id)).into_response()
        }
        ["beatmaps", _] => match id(1) {
            404 => not_found(),
            13 => Json(json!({"id": "thirteen"})).into_response(),
            n => Json(beatmap_json(n)).into_response(),
        },
        ["beatmaps", _, "scores"] => {
            let mut board = json!({"scores": [score_json(1, 10), score_json(2, 11)]});
            match id(1) {
                1 => board["user_score"] = json!({"position": 42, "score": score_json(3, 2)}),
                2 => board["user_score"] = Value::Null,
                _ => {}
            }
            Json(board).into_response()
        }
        ["beatmaps", _, "scores", "users", _] => {
            Json(json!({"position": 7, "score": score_json(50, id(4))})).into_response()
        }
        ["beatmaps", _, "scores", "users", _, "all"] => {
            Json(json!({"scores": [score_json(51, id(4)), score_json(52, id(4))]})).into_response()
        }
        ["beatmaps", _, "attributes"] if method == Method::POST => Json(json!({
            "attributes": {"max_combo": 500, "star_rating": 5.5, "aim_difficulty": 2.7}
        }))
        .into_response(),
        ["scores", _, _] => Json(score_json(id(2), 2)).into_response(),
        ["me"] => Json(me_json(Ruleset::Osu)).into_response(),
        ["me", mode] => match mode.parse::<Ruleset>() {
            Ok(mode) => Json(me_json(mode)).into_response(),
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        },
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
