use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Replay document schema tag.
pub const REPLAY_SCHEMA: &str = "v1";

/// Field coordinates in feet. Home plate at the origin, +y toward center
/// field, +z up.
pub type FieldPoint = Vector3<f64>;

/// Occupied bases when a pitch is thrown (player ids).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReplayRunners {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

/// One pitch with its illustrative trajectory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitchEvent {
    pub inning: u32,
    pub is_top: bool,
    pub batter_id: String,
    pub pitcher_id: String,
    pub pitch_number: u32,
    pub count_before: Count,
    pub count_after: Count,
    pub result: crate::models::PitchOutcome,
    pub pitch_type: String,
    pub speed_mph: f64,
    pub release: FieldPoint,
    pub plate: FieldPoint,
    pub path: Vec<FieldPoint>,
    pub runners: ReplayRunners,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_location: Option<FieldPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEvent {
    Pitch(PitchEvent),
    Substitution {
        inning: u32,
        is_top: bool,
        team_id: String,
        player_in: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_out: Option<String>,
        role: String,
    },
    PlateAppearance {
        inning: u32,
        is_top: bool,
        batter_id: String,
        pitcher_id: String,
        /// Short outcome code, e.g. "1B" or "K".
        outcome: String,
        outs_after: u8,
    },
    Score {
        inning: u32,
        is_top: bool,
        runner_id: String,
        away_score: u32,
        home_score: u32,
    },
}

/// A game's replay document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameReplay {
    pub schema: String,
    pub seed: u64,
    pub events: Vec<ReplayEvent>,
}

impl GameReplay {
    pub fn pitch_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, ReplayEvent::Pitch(_))).count()
    }
}
