//! Ranked and loved beatmap id lists from osu.lea.moe
//!
//! A plain fetch-and-sort helper: no credential, no rate limiting, no retry.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_IDS_URL: &str = "https://osu.lea.moe/beatmaps";

#[derive(Debug, Deserialize)]
struct IdList {
    beatmaps: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct BeatmapIds {
    ranked: IdList,
    loved: IdList,
}

pub struct ExternalApi {
    http: reqwest::Client,
    url: String,
}

impl Default for ExternalApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalApi {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            url: DEFAULT_IDS_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn fetch(&self) -> Result<BeatmapIds> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        let ids: BeatmapIds = serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("beatmap id lists: {e}")))?;
        debug!(
            ranked = ids.ranked.beatmaps.len(),
            loved = ids.loved.beatmaps.len(),
            "fetched beatmap id lists"
        );
        Ok(ids)
    }

    /// Ranked beatmap ids, ascending.
    pub async fn ranked_ids(&self) -> Result<Vec<u64>> {
        let mut ids = self.fetch().await?.ranked.beatmaps;
        ids.sort_unstable();
        Ok(ids)
    }

    /// Loved beatmap ids, ascending.
    pub async fn loved_ids(&self) -> Result<Vec<u64>> {
        let mut ids = self.fetch().await?.loved.beatmaps;
        ids.sort_unstable();
        Ok(ids)
    }

    /// Union of ranked and loved ids, ascending and without duplicates.
    pub async fn ranked_and_loved_ids(&self) -> Result<Vec<u64>> {
        let ids = self.fetch().await?;
        let union: BTreeSet<u64> = ids
            .ranked
            .beatmaps
            .into_iter()
            .chain(ids.loved.beatmaps)
            .collect();
        Ok(union.into_iter().collect())
    }
}
