//! Response shapes and context-field merging
//!
//! Some endpoints leave out identifiers the caller already knows (the
//! requested beatmap id, the user id, the ruleset). Each `Shape` names where
//! those context fields belong in the raw JSON. Fields are only filled where
//! the payload lacks them; upstream values always win.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Decoded as-is
    #[default]
    Plain,
    /// Context merged into the top-level object
    Record,
    /// Top level plus every element of `scores`
    ScoreList,
    /// Top level plus the nested `score` object
    UserScore,
    /// Top level, every element of `scores`, and the `user_score` entry
    /// (with its nested `score`) when present
    Leaderboard,
}

impl Shape {
    pub fn merge(self, value: &mut Value, context: &Map<String, Value>) {
        if context.is_empty() || self == Shape::Plain {
            return;
        }
        fill_absent(value, context);

        match self {
            Shape::Plain | Shape::Record => {}
            Shape::ScoreList => fill_each(value.get_mut("scores"), context),
            Shape::UserScore => {
                if let Some(score) = value.get_mut("score") {
                    fill_absent(score, context);
                }
            }
            Shape::Leaderboard => {
                fill_each(value.get_mut("scores"), context);
                if let Some(entry) = value.get_mut("user_score").filter(|v| v.is_object()) {
                    fill_absent(entry, context);
                    if let Some(score) = entry.get_mut("score") {
                        fill_absent(score, context);
                    }
                }
            }
        }
    }
}

/// Insert context entries missing from `target`. Non-objects are left alone.
fn fill_absent(target: &mut Value, context: &Map<String, Value>) {
    if let Value::Object(map) = target {
        for (key, value) in context {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

fn fill_each(list: Option<&mut Value>, context: &Map<String, Value>) {
    if let Some(Value::Array(items)) = list {
        for item in items {
            fill_absent(item, context);
        }
    }
}
