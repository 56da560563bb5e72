//! Typed response records
//!
//! Extended records embed their compact counterpart with `#[serde(flatten)]`.
//! Decoding is non-strict: unknown fields are ignored, missing optional
//! fields become `None`. Timestamps are kept as the ISO 8601 strings osu!
//! sends.

mod beatmap;
mod enums;
mod score;
mod user;

pub use beatmap::{
    Availability, BeatmapAttributes, BeatmapDifficultyAttributes, Beatmap, BeatmapExtended,
    Beatmaps, Beatmapset, Covers, Failtimes, Nominations,
};
pub use enums::{Grade, Mod, RankStatus, Ruleset, ScoreScope};
pub use score::{BeatmapScores, BeatmapUserScore, BeatmapUserScores, Score, ScoreStatistics};
pub use user::{
    Country, User, UserCover, UserExtended, UserGradeCounts, UserKudosu, UserLevel,
    UserStatistics,
};
