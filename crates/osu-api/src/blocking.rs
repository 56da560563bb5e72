//! Synchronous facade over `OsuClient`
//!
//! Owns a multi-threaded tokio runtime. `block_on` may be called from many
//! threads at once, so one `BlockingClient` (behind an `Arc`) can serve a
//! whole thread pool with the same limiter, credential and transport.
//! Must not be created or dropped from inside an async context.

use std::sync::Arc;

use osu_auth::CredentialHolder;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use crate::client::OsuClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{
    BeatmapAttributes, BeatmapExtended, BeatmapScores, BeatmapUserScore, BeatmapUserScores,
    Beatmaps, Mod, Ruleset, Score, ScoreScope, UserExtended,
};
use crate::ops::{self, BeatmapLookup, Call};

pub struct BlockingClient {
    runtime: Runtime,
    client: OsuClient,
}

impl BlockingClient {
    pub fn new(credential: Arc<dyn CredentialHolder>, config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("osu-api")
            .build()
            .map_err(|e| Error::Io(format!("building runtime: {e}")))?;
        let client = {
            let _guard = runtime.enter();
            OsuClient::new(credential, config)?
        };
        Ok(Self { runtime, client })
    }

    pub fn client(&self) -> &OsuClient {
        &self.client
    }

    pub fn call<T: DeserializeOwned>(&self, call: Call<T>) -> Result<T> {
        self.runtime.block_on(self.client.call(call))
    }

    pub fn start_pool(&self) -> Result<()> {
        self.runtime.block_on(self.client.start_pool())
    }

    pub fn stop_pool(&self) {
        self.runtime.block_on(self.client.stop_pool())
    }

    pub fn set_rate_limit(&self, requests_per_minute: u32) {
        self.runtime
            .block_on(self.client.set_rate_limit(requests_per_minute))
    }

    pub fn beatmap_lookup(&self, lookup: &BeatmapLookup) -> Result<BeatmapExtended> {
        self.call(ops::beatmap_lookup(lookup))
    }

    pub fn beatmap(&self, beatmap_id: u64) -> Result<BeatmapExtended> {
        self.call(ops::beatmap(beatmap_id))
    }

    pub fn user_beatmap_score(
        &self,
        beatmap_id: u64,
        user_id: u64,
        mode: Option<Ruleset>,
        mods: &[Mod],
    ) -> Result<BeatmapUserScore> {
        self.call(ops::user_beatmap_score(beatmap_id, user_id, mode, mods))
    }

    pub fn user_beatmap_scores(
        &self,
        beatmap_id: u64,
        user_id: u64,
        mode: Option<Ruleset>,
    ) -> Result<BeatmapUserScores> {
        self.call(ops::user_beatmap_scores(beatmap_id, user_id, mode))
    }

    pub fn beatmap_scores(
        &self,
        beatmap_id: u64,
        mode: Option<Ruleset>,
        mods: &[Mod],
        scope: ScoreScope,
    ) -> Result<BeatmapScores> {
        self.call(ops::beatmap_scores(beatmap_id, mode, mods, scope))
    }

    pub fn beatmaps(&self, ids: &[u64]) -> Result<Beatmaps> {
        self.call(ops::beatmaps(ids))
    }

    pub fn beatmap_attributes(
        &self,
        beatmap_id: u64,
        mods: &[Mod],
        ruleset: Option<Ruleset>,
        ruleset_id: Option<u8>,
    ) -> Result<BeatmapAttributes> {
        self.call(ops::beatmap_attributes(beatmap_id, mods, ruleset, ruleset_id))
    }

    pub fn score(&self, mode: Ruleset, score_id: u64) -> Result<Score> {
        self.call(ops::score(mode, score_id))
    }

    pub fn me(&self, mode: Option<Ruleset>) -> Result<UserExtended> {
        self.call(ops::me(mode))
    }
}
