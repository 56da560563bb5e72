//! osu! OAuth constants

/// Public osu! web host. The API lives under `/api/v2`, OAuth under `/oauth`.
pub const DEFAULT_HOST: &str = "https://osu.ppy.sh";

/// Token endpoint path for every grant type
pub const TOKEN_PATH: &str = "/oauth/token";

/// Authorization page the user opens for the authorization-code flow
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Redirect URI registered for the application. The local callback listener
/// receives the browser redirect carrying `?code=`.
pub const REDIRECT_URI: &str = "http://127.0.0.1/api";

/// Tokens are refreshed once they are within this many seconds of expiry.
pub const REFRESH_MARGIN_SECS: f64 = 3600.0;
