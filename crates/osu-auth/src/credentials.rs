//! Credential holders
//!
//! A holder owns the current access token (plus refresh token for delegated
//! credentials) and the claims decoded from it. All mutation happens inside
//! `ensure_valid` while the holder's lock is held, so concurrent callers never
//! issue more than one token request: the first caller refreshes, the rest
//! wait on the lock and then see the new token.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::authorize;
use crate::claims::TokenClaims;
use crate::constants::REFRESH_MARGIN_SECS;
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::settings::OAuthSettings;
use crate::token;
use crate::token_file;

/// Boxed future returned by `CredentialHolder` methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Guest,
    User,
}

/// Source of bearer tokens for the dispatcher.
///
/// Uses boxed futures so holders can live behind `Arc<dyn CredentialHolder>`.
pub trait CredentialHolder: Send + Sync {
    fn kind(&self) -> CredentialKind;

    /// Make sure a usable access token is held, refreshing it if it is
    /// missing, inside the refresh margin, or `force_refresh` is set.
    ///
    /// Returns `true` when the existing token was kept unchanged.
    fn ensure_valid(&self, force_refresh: bool) -> BoxFuture<'_, Result<bool>>;

    fn claims(&self) -> BoxFuture<'_, Option<TokenClaims>>;

    fn access_token(&self) -> BoxFuture<'_, Option<String>>;

    /// Whether the current token grants `scope`.
    ///
    /// Acquires a token first when none has been decoded yet. With `raise`
    /// set, a missing scope is an `Error::Scope` instead of `Ok(false)`.
    fn has_scope(&self, scope: Scope, raise: bool) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move {
            if self.claims().await.is_none() {
                self.ensure_valid(false).await?;
            }
            let granted = self
                .claims()
                .await
                .is_some_and(|claims| claims.has_scope(scope));
            if !granted && raise {
                return Err(Error::Scope(scope.to_string()));
            }
            Ok(granted)
        })
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Mutable token state guarded by each holder's lock.
#[derive(Debug, Default)]
struct TokenState {
    access: Option<String>,
    refresh: Option<String>,
    claims: Option<TokenClaims>,
    /// Rewritten after every change when set
    token_file: Option<PathBuf>,
}

impl TokenState {
    /// Replace the access token and its claims together.
    fn install(&mut self, access: String, refresh: Option<String>) -> Result<()> {
        let claims = TokenClaims::decode(&access)?;
        self.access = Some(access);
        self.claims = Some(claims);
        if refresh.is_some() {
            self.refresh = refresh;
        }
        Ok(())
    }

    fn is_fresh(&self) -> bool {
        self.access.is_some()
            && self
                .claims
                .as_ref()
                .is_some_and(|c| !c.expires_within(REFRESH_MARGIN_SECS, now_secs()))
    }

    fn lines(&self, kind: CredentialKind) -> Option<Vec<&str>> {
        let access = self.access.as_deref()?;
        match kind {
            CredentialKind::Guest => Some(vec![access]),
            CredentialKind::User => Some(vec![access, self.refresh.as_deref()?]),
        }
    }

    async fn persist(&self, kind: CredentialKind) -> Result<()> {
        let Some(path) = &self.token_file else {
            return Ok(());
        };
        match self.lines(kind) {
            Some(lines) => token_file::write_tokens(path, &lines).await,
            None => Ok(()),
        }
    }

    async fn load(&mut self, path: &Path, kind: CredentialKind) -> Result<()> {
        let expected = match kind {
            CredentialKind::Guest => 1,
            CredentialKind::User => 2,
        };
        let mut lines = token_file::read_tokens(path, expected).await?.into_iter();
        let access = lines.next().unwrap_or_default();
        let refresh = lines.next();
        self.install(access, refresh)?;
        debug!(path = %path.display(), ?kind, "loaded tokens from file");
        Ok(())
    }

    async fn export(&mut self, path: &Path, kind: CredentialKind, auto_update: bool) -> Result<()> {
        let lines = self
            .lines(kind)
            .ok_or_else(|| Error::NotFound("no token to export".into()))?;
        token_file::write_tokens(path, &lines).await?;
        if auto_update {
            self.token_file = Some(path.to_path_buf());
        }
        Ok(())
    }
}

/// App-only credential using the client credentials grant.
///
/// Tokens carry only the `public` scope and no refresh token; renewal simply
/// requests a new token.
pub struct GuestCredential {
    settings: OAuthSettings,
    http: reqwest::Client,
    state: Mutex<TokenState>,
}

impl GuestCredential {
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            state: Mutex::new(TokenState::default()),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Start from an existing access token.
    pub fn with_access_token(mut self, access: impl Into<String>) -> Result<Self> {
        self.state.get_mut().install(access.into(), None)?;
        Ok(self)
    }

    /// Build a holder backed by `path`, keeping the file updated.
    ///
    /// A missing or malformed file is not an error: the holder starts without
    /// a token and writes the file after its first acquisition.
    pub async fn from_file(settings: OAuthSettings, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let holder = Self::new(settings);
        {
            let mut state = holder.state.lock().await;
            if let Err(e) = state.load(&path, CredentialKind::Guest).await {
                warn!(path = %path.display(), error = %e, "no usable guest token in file, starting without one");
            }
            state.token_file = Some(path);
        }
        holder
    }

    /// Replace the held token with the one stored at `path`.
    pub async fn load_from_file(&self, path: impl AsRef<Path>, auto_update: bool) -> Result<()> {
        let path = path.as_ref();
        let mut state = self.state.lock().await;
        state.load(path, CredentialKind::Guest).await?;
        if auto_update {
            state.token_file = Some(path.to_path_buf());
        }
        Ok(())
    }

    /// Write the held token to `path`; with `auto_update`, keep it in sync.
    pub async fn export_to_file(&self, path: impl AsRef<Path>, auto_update: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .export(path.as_ref(), CredentialKind::Guest, auto_update)
            .await
    }

    async fn ensure_valid_inner(&self, force_refresh: bool) -> Result<bool> {
        let mut state = self.state.lock().await;
        if !force_refresh && state.is_fresh() {
            return Ok(true);
        }

        let response = token::request_client_token(&self.http, &self.settings).await?;
        state.install(response.access_token, None)?;
        state.persist(CredentialKind::Guest).await?;
        info!(forced = force_refresh, "guest token acquired");
        Ok(false)
    }
}

impl CredentialHolder for GuestCredential {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Guest
    }

    fn ensure_valid(&self, force_refresh: bool) -> BoxFuture<'_, Result<bool>> {
        Box::pin(self.ensure_valid_inner(force_refresh))
    }

    fn claims(&self) -> BoxFuture<'_, Option<TokenClaims>> {
        Box::pin(async move { self.state.lock().await.claims.clone() })
    }

    fn access_token(&self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move { self.state.lock().await.access.clone() })
    }
}

/// Delegated credential acting on behalf of a user.
///
/// Holds a refresh token. When no usable token pair exists the holder falls
/// back to the interactive authorization-code flow: it prints the
/// authorization URL and waits for the browser redirect on
/// `OAuthSettings::callback_addr`.
pub struct UserCredential {
    settings: OAuthSettings,
    http: reqwest::Client,
    state: Mutex<TokenState>,
}

impl UserCredential {
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            state: Mutex::new(TokenState::default()),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Start from an existing access/refresh pair.
    pub fn with_tokens(
        mut self,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<Self> {
        self.state
            .get_mut()
            .install(access.into(), Some(refresh.into()))?;
        Ok(self)
    }

    /// Build a holder backed by `path`, keeping the file updated.
    ///
    /// A missing or malformed file leaves the holder empty, so the first
    /// `ensure_valid` runs the authorization-code flow.
    pub async fn from_file(settings: OAuthSettings, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let holder = Self::new(settings);
        {
            let mut state = holder.state.lock().await;
            if let Err(e) = state.load(&path, CredentialKind::User).await {
                warn!(path = %path.display(), error = %e, "no usable user tokens in file, starting without them");
            }
            state.token_file = Some(path);
        }
        holder
    }

    pub async fn load_from_file(&self, path: impl AsRef<Path>, auto_update: bool) -> Result<()> {
        let path = path.as_ref();
        let mut state = self.state.lock().await;
        state.load(path, CredentialKind::User).await?;
        if auto_update {
            state.token_file = Some(path.to_path_buf());
        }
        Ok(())
    }

    pub async fn export_to_file(&self, path: impl AsRef<Path>, auto_update: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .export(path.as_ref(), CredentialKind::User, auto_update)
            .await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.lock().await.refresh.clone()
    }

    /// `ensure_valid` with an extra switch to force the interactive flow.
    pub async fn ensure_valid_with(&self, force_renew: bool, force_refresh: bool) -> Result<bool> {
        let mut state = self.state.lock().await;

        let must_renew = force_renew
            || state.access.is_none()
            || state.refresh.is_none()
            || state.claims.is_none();
        if must_renew {
            self.renew(&mut state).await?;
            return Ok(false);
        }

        if force_refresh || !state.is_fresh() {
            let refresh = state.refresh.clone().unwrap_or_default();
            let response = token::refresh_token(&self.http, &self.settings, &refresh).await?;
            state.install(response.access_token, response.refresh_token)?;
            state.persist(CredentialKind::User).await?;
            info!(
                user_id = state.claims.as_ref().and_then(|c| c.sub),
                forced = force_refresh,
                "user token refreshed"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Run the authorization-code flow and install the resulting pair.
    async fn renew(&self, state: &mut TokenState) -> Result<()> {
        let (client_id, _) = self.settings.client()?;

        let url = authorize::build_authorization_url(&self.settings, client_id);
        println!("Open this URL in a browser to authorize the application:\n{url}");

        let listener = authorize::listen(self.settings.callback_addr).await?;
        info!(addr = %self.settings.callback_addr, "waiting for authorization redirect");
        let code = authorize::capture_code(listener).await?;

        let response = token::exchange_code(&self.http, &self.settings, &code).await?;
        let refresh = response.refresh_token.ok_or_else(|| {
            Error::TokenExchange("authorization_code response carried no refresh token".into())
        })?;
        state.install(response.access_token, Some(refresh))?;
        state.persist(CredentialKind::User).await?;
        info!(
            user_id = state.claims.as_ref().and_then(|c| c.sub),
            "user token obtained through authorization code"
        );
        Ok(())
    }
}

impl CredentialHolder for UserCredential {
    fn kind(&self) -> CredentialKind {
        CredentialKind::User
    }

    fn ensure_valid(&self, force_refresh: bool) -> BoxFuture<'_, Result<bool>> {
        Box::pin(self.ensure_valid_with(false, force_refresh))
    }

    fn claims(&self) -> BoxFuture<'_, Option<TokenClaims>> {
        Box::pin(async move { self.state.lock().await.claims.clone() })
    }

    fn access_token(&self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move { self.state.lock().await.access.clone() })
    }
}
