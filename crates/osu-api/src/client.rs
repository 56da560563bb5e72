//! Async API client

use std::sync::Arc;

use osu_auth::{CredentialHolder, GuestCredential, OAuthSettings};
use osu_transport::{RateLimiter, TransportPool};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::models::{
    BeatmapAttributes, BeatmapExtended, BeatmapScores, BeatmapUserScore, BeatmapUserScores,
    Beatmaps, Mod, Ruleset, Score, ScoreScope, UserExtended,
};
use crate::ops::{self, BeatmapLookup, Call};
use crate::task::RequestHandle;

/// osu! API v2 client.
///
/// Cheap to clone; clones share one limiter, credential and transport pool.
#[derive(Clone)]
pub struct OsuClient {
    dispatcher: Arc<Dispatcher>,
}

impl OsuClient {
    /// Build a client. A zero request budget is rejected, since it would
    /// never refill.
    pub fn new(credential: Arc<dyn CredentialHolder>, config: ClientConfig) -> Result<Self> {
        if config.requests_per_minute == 0 {
            return Err(Error::Config(
                "requests_per_minute must be greater than 0".into(),
            ));
        }
        let pool = if config.pinned {
            TransportPool::pinned(config.transport)?
        } else {
            TransportPool::new(config.transport)
        };
        let limiter = RateLimiter::new(config.requests_per_minute);
        info!(
            kind = ?credential.kind(),
            requests_per_minute = config.requests_per_minute,
            pinned = config.pinned,
            "osu! API client created"
        );
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(limiter, credential, pool)),
        })
    }

    /// Client authenticated with an app-only guest token.
    pub fn guest(settings: OAuthSettings, config: ClientConfig) -> Result<Self> {
        Self::new(Arc::new(GuestCredential::new(settings)), config)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn credential(&self) -> &Arc<dyn CredentialHolder> {
        self.dispatcher.credential()
    }

    /// Keep one HTTP client for all calls until `stop_pool`.
    pub async fn start_pool(&self) -> Result<()> {
        self.dispatcher.pool().start().await?;
        Ok(())
    }

    pub async fn stop_pool(&self) {
        self.dispatcher.pool().stop().await;
    }

    pub async fn set_rate_limit(&self, requests_per_minute: u32) {
        self.dispatcher
            .limiter()
            .set_rate_limit(requests_per_minute)
            .await;
    }

    /// Check the call's scope, then dispatch it.
    ///
    /// A missing scope fails with `Error::Scope` before any request is sent.
    pub async fn call<T: DeserializeOwned>(&self, call: Call<T>) -> Result<T> {
        self.dispatcher
            .credential()
            .has_scope(call.scope(), true)
            .await?;
        self.dispatcher.dispatch(call.spec()).await
    }

    /// Run `call` on the tokio runtime and return a handle to its result.
    ///
    /// Must be called from within a runtime.
    pub fn spawn<T>(&self, call: Call<T>) -> RequestHandle<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let args = call.spec().clone();
        let client = self.clone();
        let handle = tokio::spawn(async move { client.call(call).await });
        RequestHandle::new(args, handle)
    }

    pub async fn beatmap_lookup(&self, lookup: &BeatmapLookup) -> Result<BeatmapExtended> {
        self.call(ops::beatmap_lookup(lookup)).await
    }

    pub async fn beatmap(&self, beatmap_id: u64) -> Result<BeatmapExtended> {
        self.call(ops::beatmap(beatmap_id)).await
    }

    pub async fn user_beatmap_score(
        &self,
        beatmap_id: u64,
        user_id: u64,
        mode: Option<Ruleset>,
        mods: &[Mod],
    ) -> Result<BeatmapUserScore> {
        self.call(ops::user_beatmap_score(beatmap_id, user_id, mode, mods))
            .await
    }

    pub async fn user_beatmap_scores(
        &self,
        beatmap_id: u64,
        user_id: u64,
        mode: Option<Ruleset>,
    ) -> Result<BeatmapUserScores> {
        self.call(ops::user_beatmap_scores(beatmap_id, user_id, mode))
            .await
    }

    pub async fn beatmap_scores(
        &self,
        beatmap_id: u64,
        mode: Option<Ruleset>,
        mods: &[Mod],
        scope: ScoreScope,
    ) -> Result<BeatmapScores> {
        self.call(ops::beatmap_scores(beatmap_id, mode, mods, scope))
            .await
    }

    pub async fn beatmaps(&self, ids: &[u64]) -> Result<Beatmaps> {
        self.call(ops::beatmaps(ids)).await
    }

    pub async fn beatmap_attributes(
        &self,
        beatmap_id: u64,
        mods: &[Mod],
        ruleset: Option<Ruleset>,
        ruleset_id: Option<u8>,
    ) -> Result<BeatmapAttributes> {
        self.call(ops::beatmap_attributes(beatmap_id, mods, ruleset, ruleset_id))
            .await
    }

    pub async fn score(&self, mode: Ruleset, score_id: u64) -> Result<Score> {
        self.call(ops::score(mode, score_id)).await
    }

    pub async fn me(&self, mode: Option<Ruleset>) -> Result<UserExtended> {
        self.call(ops::me(mode)).await
    }
}
