use serde::{Deserialize, Serialize};

use super::beatmap::BeatmapExtended;
use super::enums::{Grade, Mod, Ruleset, ScoreScope};
use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub count_50: u32,
    pub count_100: u32,
    pub count_300: u32,
    pub count_miss: u32,
    pub count_geki: Option<u32>,
    pub count_katu: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: u64,
    pub user_id: u64,
    pub accuracy: f64,
    pub mods: Vec<Mod>,
    pub score: u64,
    pub max_combo: u32,
    pub perfect: bool,
    pub statistics: ScoreStatistics,
    pub passed: bool,
    pub rank: Grade,
    pub created_at: String,
    pub mode: Ruleset,
    pub mode_int: u8,
    pub replay: bool,

    pub best_id: Option<u64>,
    /// Filled from the request when the endpoint omits it
    pub beatmap_id: Option<u64>,
    pub pp: Option<f64>,
    pub user: Option<User>,
    pub beatmap: Option<BeatmapExtended>,
    pub rank_global: Option<u64>,
}

/// A user's best score on a beatmap with its leaderboard position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapUserScore {
    pub position: u32,
    pub score: Score,
    pub beatmap_id: u64,
    /// Echoed from the request; absent for the own entry of a leaderboard
    pub user_id: Option<u64>,
    pub mode: Option<Ruleset>,
}

/// All of a user's scores on a beatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapUserScores {
    pub scores: Vec<Score>,
    pub beatmap_id: u64,
    pub user_id: u64,
    pub mode: Option<Ruleset>,
}

/// Beatmap leaderboard, plus the caller's own entry when it has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapScores {
    pub scores: Vec<Score>,
    pub user_score: Option<BeatmapUserScore>,
    pub beatmap_id: u64,
    #[serde(rename = "type")]
    pub scope: ScoreScope,
    pub mode: Option<Ruleset>,
    pub mods: Option<Vec<Mod>>,
}
