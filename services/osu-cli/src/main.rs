//! osu! API command-line client
//!
//! Loads OAuth and client settings from TOML, builds a guest or user
//! credential (optionally backed by a token file), then runs one command and
//! prints the decoded record as JSON on stdout.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use osu_api::models::ScoreScope;
use osu_api::{ExternalApi, OsuClient};
use osu_auth::{CredentialHolder, GuestCredential, OAuthSettings, UserCredential};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, LogFormat};
use crate::config::{Config, CredentialKind};

/// The configured credential, kept concrete for the `token` command.
enum Credential {
    Guest(Arc<GuestCredential>),
    User(Arc<UserCredential>),
}

impl Credential {
    async fn build(config: &Config, settings: OAuthSettings) -> Self {
        let token_file = config.oauth.token_file.clone();
        match (config.oauth.kind, token_file) {
            (CredentialKind::Guest, Some(path)) => {
                Credential::Guest(Arc::new(GuestCredential::from_file(settings, path).await))
            }
            (CredentialKind::Guest, None) => {
                Credential::Guest(Arc::new(GuestCredential::new(settings)))
            }
            (CredentialKind::User, Some(path)) => {
                Credential::User(Arc::new(UserCredential::from_file(settings, path).await))
            }
            (CredentialKind::User, None) => {
                Credential::User(Arc::new(UserCredential::new(settings)))
            }
        }
    }

    fn holder(&self) -> Arc<dyn CredentialHolder> {
        match self {
            Credential::Guest(guest) => guest.clone(),
            Credential::User(user) => user.clone(),
        }
    }

    async fn ensure_valid(&self, force: bool) -> osu_auth::Result<bool> {
        match self {
            Credential::Guest(guest) => guest.ensure_valid(force).await,
            Credential::User(user) => user.ensure_valid_with(false, force).await,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = Cli::parse(&args)?;
    init_tracing(cli.log_format);

    // ranked-ids needs no credential or config
    if cli.command == Command::RankedIds {
        let ids = ExternalApi::new().ranked_and_loved_ids().await?;
        return print_json(&ids);
    }

    let config_path = Config::resolve_path(cli.config.as_deref());
    info!(path = %config_path.display(), "loading configuration");
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        kind = ?config.oauth.kind,
        host = %config.oauth.host,
        requests_per_minute = config.client.requests_per_minute,
        pinned = config.client.pinned,
        "configuration loaded"
    );

    let credential = Credential::build(&config, config.oauth_settings()).await;

    if let Command::Token { force } = cli.command {
        let refreshed = credential
            .ensure_valid(force)
            .await
            .context("failed to obtain a token")?;
        info!(refreshed, "token ready");
        let claims = credential.holder().claims().await;
        let summary = claims.map(|c| {
            serde_json::json!({
                "exp": c.exp,
                "jti": c.jti,
                "scopes": c.scopes,
                "sub": c.sub,
            })
        });
        return print_json(&summary);
    }

    let client = OsuClient::new(credential.holder(), config.client_config())?;

    match cli.command {
        Command::Beatmap { id } => print_json(&client.beatmap(id).await?),
        Command::Lookup(lookup) => print_json(&client.beatmap_lookup(&lookup).await?),
        Command::Attributes { id, ruleset } => {
            print_json(&client.beatmap_attributes(id, &[], ruleset, None).await?)
        }
        Command::Leaderboard { id } => print_json(
            &client
                .beatmap_scores(id, None, &[], ScoreScope::Global)
                .await?,
        ),
        Command::UserScore {
            beatmap_id,
            user_id,
        } => print_json(
            &client
                .user_beatmap_score(beatmap_id, user_id, None, &[])
                .await?,
        ),
        Command::UserScores {
            beatmap_id,
            user_id,
        } => print_json(&client.user_beatmap_scores(beatmap_id, user_id, None).await?),
        Command::Score { mode, id } => print_json(&client.score(mode, id).await?),
        Command::Me { mode } => print_json(&client.me(mode).await?),
        Command::Token { .. } | Command::RankedIds => Ok(()),
    }
}
