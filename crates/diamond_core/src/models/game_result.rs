//! Game result data structures.
//!
//! A `GameResult` is either a schedule slot (`played == false`, empty log) or
//! the immutable output of `simulate_game`.

use super::counters::StatsCounters;
use super::events::GameEvent;
use super::player::Position;
use super::team::Team;
use crate::replay::GameReplay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameResult {
    pub id: String,
    pub date: NaiveDate,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: u32,
    pub away_score: u32,
    pub innings: u32,
    pub winner_id: Option<String>,
    pub played: bool,
    #[serde(default)]
    pub is_postseason: bool,
    #[serde(default)]
    pub log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_score: Option<BoxScore>,
    #[serde(default)]
    pub replay_seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay: Option<GameReplay>,
    #[serde(default)]
    pub stadium: String,
}

impl GameResult {
    /// An unplayed schedule slot.
    pub fn scheduled(id: impl Into<String>, date: NaiveDate, home: &Team, away: &Team) -> Self {
        Self {
            id: id.into(),
            date,
            home_team_id: home.id.clone(),
            away_team_id: away.id.clone(),
            home_score: 0,
            away_score: 0,
            innings: 9,
            winner_id: None,
            played: false,
            is_postseason: false,
            log: Vec::new(),
            box_score: None,
            replay_seed: 0,
            replay: None,
            stadium: home.stadium.clone(),
        }
    }

    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// SHA-256 over the canonical JSON encoding, hex encoded.
    pub fn fingerprint(&self) -> crate::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxScorePlayer {
    pub id: String,
    pub name: String,
    pub pos: Position,
    /// This game only.
    pub stats: StatsCounters,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InningLine {
    pub inning: u32,
    pub away: u32,
    pub home: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineScore {
    pub innings: Vec<InningLine>,
    pub away_total: u32,
    pub home_total: u32,
    pub away_hits: u32,
    pub home_hits: u32,
    pub away_errors: u32,
    pub home_errors: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoxScore {
    /// Everyone who batted, in order of appearance.
    pub home_lineup: Vec<BoxScorePlayer>,
    pub away_lineup: Vec<BoxScorePlayer>,
    /// Pitchers in order of appearance.
    pub home_pitchers: Vec<BoxScorePlayer>,
    pub away_pitchers: Vec<BoxScorePlayer>,
    pub line_score: LineScore,
}
