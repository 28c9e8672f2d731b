use super::player::InjurySeverity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum EventKind {
    Hit,
    Out,
    Walk,
    Run,
    Info,
    Injury,
    Steal,
    Error,
}

/// Result of a single pitch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum PitchOutcome {
    Ball,
    #[serde(rename = "Called Strike")]
    StrikeLooking,
    #[serde(rename = "Swinging Strike")]
    StrikeSwinging,
    Foul,
    #[serde(rename = "In Play")]
    InPlay,
    #[serde(rename = "Hit By Pitch")]
    HitByPitch,
    #[serde(rename = "Wild Pitch")]
    WildPitch,
}

impl PitchOutcome {
    pub fn label(self) -> &'static str {
        match self {
            PitchOutcome::Ball => "Ball",
            PitchOutcome::StrikeLooking => "Called Strike",
            PitchOutcome::StrikeSwinging => "Swinging Strike",
            PitchOutcome::Foul => "Foul",
            PitchOutcome::InPlay => "In Play",
            PitchOutcome::HitByPitch => "Hit By Pitch",
            PitchOutcome::WildPitch => "Wild Pitch",
        }
    }

    pub fn is_swing(self) -> bool {
        matches!(self, PitchOutcome::StrikeSwinging | PitchOutcome::Foul | PitchOutcome::InPlay)
    }

    /// Called plus swinging strikes (the CSW numerator).
    pub fn is_called_or_whiff(self) -> bool {
        matches!(self, PitchOutcome::StrikeLooking | PitchOutcome::StrikeSwinging)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitchDetails {
    pub number: u32,
    pub result: PitchOutcome,
    pub description: String,
    /// Balls-strikes after the pitch, e.g. "2-1".
    pub count: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryNote {
    pub player_id: String,
    pub player_name: String,
    #[serde(rename = "type")]
    pub injury_type: String,
    pub days_remaining: u32,
    pub severity: InjurySeverity,
}

/// One play-by-play entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub inning: u32,
    pub is_top: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitches: Option<Vec<PitchDetails>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injured: Option<InjuryNote>,
}

impl GameEvent {
    pub fn new(kind: EventKind, inning: u32, is_top: bool, description: impl Into<String>) -> Self {
        Self { kind, inning, is_top, description: description.into(), pitches: None, injured: None }
    }

    pub fn with_pitches(mut self, pitches: Vec<PitchDetails>) -> Self {
        self.pitches = Some(pitches);
        self
    }
}
