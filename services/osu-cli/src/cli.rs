//! Command-line parsing
//!
//! Global flags (`--config <path>`, `--log-format json|pretty`) may appear
//! anywhere; the first remaining word names the command.

use anyhow::{Context, Result, bail};
use osu_api::BeatmapLookup;
use osu_api::models::Ruleset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Make sure a valid token is held and print its claims
    Token { force: bool },
    Beatmap { id: u64 },
    Lookup(BeatmapLookup),
    Attributes { id: u64, ruleset: Option<Ruleset> },
    Leaderboard { id: u64 },
    UserScore { beatmap_id: u64, user_id: u64 },
    UserScores { beatmap_id: u64, user_id: u64 },
    Score { mode: Ruleset, id: u64 },
    Me { mode: Option<Ruleset> },
    RankedIds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: Option<String>,
    pub log_format: LogFormat,
    pub command: Command,
}

pub const USAGE: &str = "\
usage: osu-cli [--config <path>] [--log-format json|pretty] <command>

commands:
  token [--force]
  beatmap <id>
  lookup --checksum <md5> | --filename <name> | --id <id>
  attributes <id> [ruleset]
  leaderboard <id>
  user-score <beatmap> <user>
  user-scores <beatmap> <user>
  score <mode> <id>
  me [mode]
  ranked-ids";

impl Cli {
    /// Parse arguments without the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut config = None;
        let mut log_format = LogFormat::default();
        let mut rest = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(iter.next().context("--config needs a path")?.clone());
                }
                "--log-format" => {
                    log_format = match iter.next().map(String::as_str) {
                        Some("json") => LogFormat::Json,
                        Some("pretty") => LogFormat::Pretty,
                        other => bail!("--log-format must be json or pretty, got {other:?}"),
                    };
                }
                _ => rest.push(arg.as_str()),
            }
        }

        let command = parse_command(&rest)?;
        Ok(Self {
            config,
            log_format,
            command,
        })
    }
}

fn parse_command(words: &[&str]) -> Result<Command> {
    let Some((name, args)) = words.split_first() else {
        bail!("no command given\n\n{USAGE}");
    };

    let command = match (*name, args) {
        ("token", []) => Command::Token { force: false },
        ("token", ["--force"]) => Command::Token { force: true },
        ("beatmap", [id]) => Command::Beatmap { id: number(id)? },
        ("lookup", [key, value]) => Command::Lookup(match *key {
            "--checksum" => BeatmapLookup::checksum(*value),
            "--filename" => BeatmapLookup::filename(*value),
            "--id" => BeatmapLookup::id(number(value)?),
            other => bail!("unknown lookup key {other}"),
        }),
        ("attributes", [id]) => Command::Attributes {
            id: number(id)?,
            ruleset: None,
        },
        ("attributes", [id, ruleset]) => Command::Attributes {
            id: number(id)?,
            ruleset: Some(ruleset_arg(ruleset)?),
        },
        ("leaderboard", [id]) => Command::Leaderboard { id: number(id)? },
        ("user-score", [beatmap, user]) => Command::UserScore {
            beatmap_id: number(beatmap)?,
            user_id: number(user)?,
        },
        ("user-scores", [beatmap, user]) => Command::UserScores {
            beatmap_id: number(beatmap)?,
            user_id: number(user)?,
        },
        ("score", [mode, id]) => Command::Score {
            mode: ruleset_arg(mode)?,
            id: number(id)?,
        },
        ("me", []) => Command::Me { mode: None },
        ("me", [mode]) => Command::Me {
            mode: Some(ruleset_arg(mode)?),
        },
        ("ranked-ids", []) => Command::RankedIds,
        _ => bail!("unrecognized command: {}\n\n{USAGE}", words.join(" ")),
    };
    Ok(command)
}

fn number(raw: &str) -> Result<u64> {
    raw.parse()
        .with_context(|| format!("expected a numeric id, got {raw}"))
}

fn ruleset_arg(raw: &str) -> Result<Ruleset> {
    raw.parse().map_err(anyhow::Error::msg)
}
