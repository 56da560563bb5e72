use serde::{Deserialize, Serialize};

use super::enums::{Mod, RankStatus, Ruleset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Covers {
    pub cover: String,
    #[serde(rename = "cover@2x")]
    pub cover_2x: String,
    pub card: String,
    #[serde(rename = "card@2x")]
    pub card_2x: String,
    pub list: String,
    #[serde(rename = "list@2x")]
    pub list_2x: String,
    pub slimcover: String,
    #[serde(rename = "slimcover@2x")]
    pub slimcover_2x: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub download_disabled: bool,
    pub more_information: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nominations {
    pub current: u32,
    pub required: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failtimes {
    pub exit: Option<Vec<u32>>,
    pub fail: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmapset {
    pub artist: String,
    pub artist_unicode: String,
    pub covers: Covers,
    pub creator: String,
    pub favourite_count: u64,
    pub id: u64,
    pub nsfw: bool,
    pub play_count: u64,
    pub preview_url: String,
    pub source: String,
    pub status: RankStatus,
    pub title: String,
    pub title_unicode: String,
    pub user_id: u64,
    pub video: bool,

    pub offset: Option<i32>,
    pub spotlight: Option<bool>,
    pub availability: Option<Availability>,
    pub bpm: Option<f64>,
    pub nominations_summary: Option<Nominations>,
    pub ranked_date: Option<String>,
    pub submitted_date: Option<String>,
    pub tags: Option<String>,
    pub track_id: Option<u64>,
}

/// Compact beatmap (a single difficulty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    pub beatmapset_id: u64,
    pub difficulty_rating: f64,
    pub id: u64,
    pub mode: Ruleset,
    pub status: RankStatus,
    pub total_length: u32,
    pub user_id: u64,
    pub version: String,

    pub beatmapset: Option<Beatmapset>,
    pub max_combo: Option<u32>,
    pub checksum: Option<String>,
    pub failtimes: Option<Failtimes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapExtended {
    #[serde(flatten)]
    pub beatmap: Beatmap,

    pub accuracy: f64,
    pub ar: f64,
    pub convert: bool,
    pub count_circles: u32,
    pub count_sliders: u32,
    pub count_spinners: u32,
    pub cs: f64,
    pub drain: f64,
    pub hit_length: u32,
    pub is_scoreable: bool,
    pub last_updated: String,
    pub mode_int: u8,
    pub passcount: u64,
    pub playcount: u64,
    /// Numeric rank status, see `RankStatus::from_id`
    pub ranked: i8,
    pub url: String,

    pub deleted_at: Option<String>,
    pub bpm: Option<f64>,
}

/// Batch beatmap fetch; `ids` echoes the requested ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmaps {
    pub beatmaps: Vec<BeatmapExtended>,
    pub ids: Vec<u64>,
}

/// Ruleset-specific difficulty values; fields absent for other rulesets are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapDifficultyAttributes {
    pub max_combo: u32,
    pub star_rating: f64,

    // osu
    pub aim_difficulty: Option<f64>,
    pub approach_rate: Option<f64>,
    pub flashlight_difficulty: Option<f64>,
    pub overall_difficulty: Option<f64>,
    pub slider_factor: Option<f64>,
    pub speed_difficulty: Option<f64>,
    // taiko
    pub stamina_difficulty: Option<f64>,
    pub rhythm_difficulty: Option<f64>,
    pub colour_difficulty: Option<f64>,
    pub great_hit_window: Option<f64>,
    // mania
    pub score_multiplier: Option<f64>,
}

/// Difficulty attributes plus the request inputs they were computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapAttributes {
    pub attributes: BeatmapDifficultyAttributes,
    pub beatmap_id: u64,
    pub ruleset: Option<Ruleset>,
    pub ruleset_id: Option<u8>,
    pub mods: Option<Vec<Mod>>,
}
