//! Operation builders
//!
//! Each function describes one osu! API endpoint as a `Call<T>`: the request,
//! the scope the token must carry, and the record type it decodes into.
//! Request inputs the upstream leaves out of its response are attached as
//! context fields.

use std::marker::PhantomData;

use osu_auth::Scope;
use serde_json::{Map, Value};

use crate::models::{
    BeatmapAttributes, BeatmapExtended, BeatmapScores, BeatmapUserScore, BeatmapUserScores,
    Beatmaps, Mod, Ruleset, Score, ScoreScope, UserExtended,
};
use crate::request::RequestSpec;
use crate::shape::Shape;

/// A request plus its required scope and decode target.
#[derive(Debug, Clone)]
pub struct Call<T> {
    spec: RequestSpec,
    scope: Scope,
    _decode: PhantomData<fn() -> T>,
}

impl<T> Call<T> {
    pub fn new(spec: RequestSpec, scope: Scope) -> Self {
        Self {
            spec,
            scope,
            _decode: PhantomData,
        }
    }

    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn into_spec(self) -> RequestSpec {
        self.spec
    }
}

/// Beatmap lookup keys; any combination may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatmapLookup {
    pub checksum: Option<String>,
    pub filename: Option<String>,
    pub id: Option<u64>,
}

impl BeatmapLookup {
    pub fn checksum(checksum: impl Into<String>) -> Self {
        Self {
            checksum: Some(checksum.into()),
            ..Self::default()
        }
    }

    pub fn filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

fn mods_value(mods: &[Mod]) -> Value {
    Value::from(mods.iter().map(|m| m.as_str()).collect::<Vec<_>>())
}

fn mod_names(mods: &[Mod]) -> Vec<&'static str> {
    mods.iter().map(|m| m.as_str()).collect()
}

/// `GET /beatmaps/lookup`
pub fn beatmap_lookup(lookup: &BeatmapLookup) -> Call<BeatmapExtended> {
    let mut spec = RequestSpec::get("beatmaps/lookup");
    if let Some(checksum) = &lookup.checksum {
        spec = spec.query("checksum", checksum);
    }
    if let Some(filename) = &lookup.filename {
        spec = spec.query("filename", filename);
    }
    if let Some(id) = lookup.id {
        spec = spec.query("id", id);
    }
    Call::new(spec, Scope::Public)
}

/// `GET /beatmaps/{beatmap}`
pub fn beatmap(beatmap_id: u64) -> Call<BeatmapExtended> {
    Call::new(RequestSpec::get(format!("beatmaps/{beatmap_id}")), Scope::Public)
}

/// `GET /beatmaps/{beatmap}/scores/users/{user}`
pub fn user_beatmap_score(
    beatmap_id: u64,
    user_id: u64,
    mode: Option<Ruleset>,
    mods: &[Mod],
) -> Call<BeatmapUserScore> {
    let mut spec = RequestSpec::get(format!("beatmaps/{beatmap_id}/scores/users/{user_id}"))
        .shape(Shape::UserScore)
        .context("beatmap_id", beatmap_id)
        .context("user_id", user_id);
    if let Some(mode) = mode {
        spec = spec.query("mode", mode).context("mode", mode.as_str());
    }
    if !mods.is_empty() {
        spec = spec
            .query_list("mods", mod_names(mods))
            .context("mods", mods_value(mods));
    }
    Call::new(spec, Scope::Public)
}

/// `GET /beatmaps/{beatmap}/scores/users/{user}/all`
pub fn user_beatmap_scores(
    beatmap_id: u64,
    user_id: u64,
    mode: Option<Ruleset>,
) -> Call<BeatmapUserScores> {
    let mut spec = RequestSpec::get(format!(
        "beatmaps/{beatmap_id}/scores/users/{user_id}/all"
    ))
    .shape(Shape::ScoreList)
    .context("beatmap_id", beatmap_id)
    .context("user_id", user_id);
    if let Some(mode) = mode {
        spec = spec.query("mode", mode).context("mode", mode.as_str());
    }
    Call::new(spec, Scope::Public)
}

/// `GET /beatmaps/{beatmap}/scores`
pub fn beatmap_scores(
    beatmap_id: u64,
    mode: Option<Ruleset>,
    mods: &[Mod],
    scope: ScoreScope,
) -> Call<BeatmapScores> {
    let mut spec = RequestSpec::get(format!("beatmaps/{beatmap_id}/scores"))
        .shape(Shape::Leaderboard)
        .context("beatmap_id", beatmap_id);
    if let Some(mode) = mode {
        spec = spec.query("mode", mode).context("mode", mode.as_str());
    }
    if !mods.is_empty() {
        spec = spec
            .query_list("mods", mod_names(mods))
            .context("mods", mods_value(mods));
    }
    spec = spec
        .query("type", scope.as_str())
        .context("type", scope.as_str());
    Call::new(spec, Scope::Public)
}

/// `GET /beatmaps?ids[]=...`
pub fn beatmaps(ids: &[u64]) -> Call<Beatmaps> {
    let spec = RequestSpec::get("beatmaps")
        .query_list("ids", ids.iter().copied())
        .shape(Shape::Record)
        .context("ids", ids.to_vec());
    Call::new(spec, Scope::Public)
}

/// `POST /beatmaps/{beatmap}/attributes`
pub fn beatmap_attributes(
    beatmap_id: u64,
    mods: &[Mod],
    ruleset: Option<Ruleset>,
    ruleset_id: Option<u8>,
) -> Call<BeatmapAttributes> {
    let mut body = Map::new();
    if !mods.is_empty() {
        body.insert("mods".into(), mods_value(mods));
    }
    if let Some(ruleset) = ruleset {
        body.insert("ruleset".into(), ruleset.as_str().into());
    }
    if let Some(ruleset_id) = ruleset_id {
        body.insert("ruleset_id".into(), ruleset_id.into());
    }

    let mut spec = RequestSpec::post(format!("beatmaps/{beatmap_id}/attributes"))
        .shape(Shape::Record)
        .context("beatmap_id", beatmap_id);
    for (key, value) in &body {
        spec = spec.context(key, value.clone());
    }
    Call::new(spec.json(Value::Object(body)), Scope::Public)
}

/// `GET /scores/{mode}/{score}`
pub fn score(mode: Ruleset, score_id: u64) -> Call<Score> {
    Call::new(
        RequestSpec::get(format!("scores/{mode}/{score_id}")),
        Scope::Public,
    )
}

/// `GET /me/{mode?}`; needs a delegated token with `identify`.
pub fn me(mode: Option<Ruleset>) -> Call<UserExtended> {
    let path = match mode {
        Some(mode) => format!("me/{mode}"),
        None => "me".to_string(),
    };
    Call::new(RequestSpec::get(path), Scope::Identify)
}
