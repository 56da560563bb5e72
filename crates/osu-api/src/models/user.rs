use serde::{Deserialize, Serialize};

use super::enums::Ruleset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCover {
    pub url: String,
    pub custom_url: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLevel {
    pub current: u32,
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGradeCounts {
    pub a: i64,
    pub s: i64,
    pub sh: i64,
    pub ss: i64,
    pub ssh: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub count_300: u64,
    pub count_100: u64,
    pub count_50: u64,
    pub count_miss: u64,
    pub level: UserLevel,
    pub pp: f64,
    pub ranked_score: u64,
    pub hit_accuracy: f64,
    pub play_count: u64,
    pub play_time: u64,
    pub total_score: u64,
    pub total_hits: u64,
    pub maximum_combo: u32,
    pub replays_watched_by_others: u64,
    pub is_ranked: bool,
    pub grade_counts: UserGradeCounts,
    pub global_rank: Option<u64>,
    pub country_rank: Option<u64>,
}

/// Compact user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub avatar_url: String,
    pub country_code: String,
    pub id: u64,
    pub is_active: bool,
    pub is_bot: bool,
    pub is_deleted: bool,
    pub is_online: bool,
    pub is_supporter: bool,
    pub pm_friends_only: bool,
    pub username: String,

    pub default_group: Option<String>,
    pub last_visit: Option<String>,
    pub profile_colour: Option<String>,
    pub country: Option<Country>,
    pub cover: Option<UserCover>,
    pub statistics: Option<UserStatistics>,
    pub follower_count: Option<u64>,
    pub previous_usernames: Option<Vec<String>>,
    pub ranked_beatmapset_count: Option<u32>,
    pub loved_beatmapset_count: Option<u32>,
    pub scores_best_count: Option<u32>,
    pub scores_first_count: Option<u32>,
    pub support_level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserKudosu {
    pub available: i64,
    pub total: i64,
}

/// The authenticated user as returned by `/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExtended {
    #[serde(flatten)]
    pub user: User,

    pub has_supported: bool,
    pub join_date: String,
    pub kudosu: UserKudosu,
    pub max_blocks: u32,
    pub max_friends: u32,
    pub playmode: Ruleset,
    pub post_count: u64,
    pub profile_order: Vec<String>,

    pub playstyle: Option<Vec<String>>,
    pub discord: Option<String>,
    pub interests: Option<String>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub title: Option<String>,
    pub title_url: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}
