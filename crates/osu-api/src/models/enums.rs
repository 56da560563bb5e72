use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    Osu,
    Taiko,
    Fruits,
    Mania,
}

impl Ruleset {
    pub fn as_str(self) -> &'static str {
        match self {
            Ruleset::Osu => "osu",
            Ruleset::Taiko => "taiko",
            Ruleset::Fruits => "fruits",
            Ruleset::Mania => "mania",
        }
    }

    /// Numeric id used by `mode_int` and `ruleset_id`.
    pub fn id(self) -> u8 {
        match self {
            Ruleset::Osu => 0,
            Ruleset::Taiko => 1,
            Ruleset::Fruits => 2,
            Ruleset::Mania => 3,
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ruleset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "osu" => Ok(Ruleset::Osu),
            "taiko" => Ok(Ruleset::Taiko),
            "fruits" => Ok(Ruleset::Fruits),
            "mania" => Ok(Ruleset::Mania),
            other => Err(format!("unknown ruleset '{other}'")),
        }
    }
}

/// Leaderboard scope, sent as the `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreScope {
    #[default]
    Global,
    Country,
}

impl ScoreScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreScope::Global => "global",
            ScoreScope::Country => "country",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankStatus {
    Graveyard,
    Wip,
    Pending,
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl RankStatus {
    /// Numeric form carried by the `ranked` field.
    pub fn from_id(id: i8) -> Option<Self> {
        Some(match id {
            -2 => RankStatus::Graveyard,
            -1 => RankStatus::Wip,
            0 => RankStatus::Pending,
            1 => RankStatus::Ranked,
            2 => RankStatus::Approved,
            3 => RankStatus::Qualified,
            4 => RankStatus::Loved,
            _ => return None,
        })
    }
}

/// Letter grade of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
    S,
    X,
    SH,
    XH,
}

/// Gameplay modifier acronym.
///
/// Acronyms this client does not know decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mod {
    NF,
    EZ,
    TD,
    HD,
    HR,
    SD,
    DT,
    RX,
    HT,
    NC,
    FL,
    SO,
    AP,
    PF,
    FI,
    MR,
    CL,
    #[serde(other)]
    Other,
}

impl Mod {
    pub fn as_str(self) -> &'static str {
        match self {
            Mod::NF => "NF",
            Mod::EZ => "EZ",
            Mod::TD => "TD",
            Mod::HD => "HD",
            Mod::HR => "HR",
            Mod::SD => "SD",
            Mod::DT => "DT",
            Mod::RX => "RX",
            Mod::HT => "HT",
            Mod::NC => "NC",
            Mod::FL => "FL",
            Mod::SO => "SO",
            Mod::AP => "AP",
            Mod::PF => "PF",
            Mod::FI => "FI",
            Mod::MR => "MR",
            Mod::CL => "CL",
            Mod::Other => "??",
        }
    }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        serde_json::from_value::<Mod>(serde_json::Value::String(upper))
            .ok()
            .filter(|m| *m != Mod::Other)
            .ok_or_else(|| format!("unknown mod '{s}'"))
    }
}
