use super::counters::StatsCounters;
use super::stats::{BattingStats, DefenseStats, PitchingStats};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Player data for the game engine.
///
/// Rosters arrive fully populated from an external source. The engine
/// mutates `counters`, `injury` and the derived stat blocks in place; every
/// other field changes only between seasons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub is_two_way: bool,
    #[serde(default)]
    pub number: u8,
    pub age: u32,

    /// Days since last appearance. Negative means unavailable.
    #[serde(default)]
    pub days_rest: i32,

    /// 1-6 rotation, 7-8 spot starters, 9 closer, 10+ relievers, 0 position players
    #[serde(default)]
    pub rotation_slot: u8,

    pub rating: u8,
    #[serde(default)]
    pub potential: u8,
    #[serde(default)]
    pub attributes: Ratings,
    #[serde(default)]
    pub repertoire: Vec<PitchRepertoireEntry>,
    #[serde(default)]
    pub injury: Injury,

    #[serde(default)]
    pub counters: StatsCounters,
    #[serde(default)]
    pub batting: BattingStats,
    #[serde(default)]
    pub pitching: PitchingStats,
    #[serde(default)]
    pub defense: DefenseStats,

    /// Season lines, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Player {
    pub fn is_pitcher_eligible(&self) -> bool {
        self.position == Position::P || self.is_two_way
    }

    pub fn is_hitter_eligible(&self) -> bool {
        self.position != Position::P || self.is_two_way
    }

    pub fn is_healthy(&self) -> bool {
        !self.injury.is_injured
    }

    pub fn is_rotation_arm(&self) -> bool {
        (1..=8).contains(&self.rotation_slot)
    }

    pub fn is_closer(&self) -> bool {
        self.rotation_slot == 9
    }

    pub fn is_relief_arm(&self) -> bool {
        self.rotation_slot >= 9
    }

    pub fn season_innings(&self) -> f64 {
        self.counters.innings_pitched()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Position {
    P,
    C,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    SS,
    LF,
    CF,
    RF,
    DH,
}

impl Position {
    /// Lineup fill order for the nine batting spots.
    pub const LINEUP_ORDER: [Position; 9] = [
        Position::C,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::SS,
        Position::LF,
        Position::CF,
        Position::RF,
        Position::DH,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Position::P => "P",
            Position::C => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::SS => "SS",
            Position::LF => "LF",
            Position::CF => "CF",
            Position::RF => "RF",
            Position::DH => "DH",
        }
    }

    pub fn is_outfield(self) -> bool {
        matches!(self, Position::LF | Position::CF | Position::RF)
    }

    pub fn fields(self) -> bool {
        !matches!(self, Position::DH)
    }
}

/// The twelve 20-99 rating attributes. Missing values deserialize to 50.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Ratings {
    #[validate(range(min = 20, max = 99))]
    pub contact: u8,
    #[validate(range(min = 20, max = 99))]
    pub power: u8,
    #[validate(range(min = 20, max = 99))]
    pub eye: u8,
    #[validate(range(min = 20, max = 99))]
    pub speed: u8,
    #[validate(range(min = 20, max = 99))]
    pub defense: u8,
    #[validate(range(min = 20, max = 99))]
    pub reaction: u8,
    #[validate(range(min = 20, max = 99))]
    pub arm: u8,
    #[validate(range(min = 20, max = 99))]
    pub stuff: u8,
    #[validate(range(min = 20, max = 99))]
    pub control: u8,
    #[validate(range(min = 20, max = 99))]
    pub stamina: u8,
    #[validate(range(min = 20, max = 99))]
    pub velocity: u8,
    #[validate(range(min = 20, max = 99))]
    pub spin: u8,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            contact: 50,
            power: 50,
            eye: 50,
            speed: 50,
            defense: 50,
            reaction: 50,
            arm: 50,
            stuff: 50,
            control: 50,
            stamina: 50,
            velocity: 50,
            spin: 50,
        }
    }
}

impl Ratings {
    pub fn uniform(value: u8) -> Self {
        Self {
            contact: value,
            power: value,
            eye: value,
            speed: value,
            defense: value,
            reaction: value,
            arm: value,
            stuff: value,
            control: value,
            stamina: value,
            velocity: value,
            spin: value,
        }
    }

    /// Shifts every attribute by `delta`, clamped to 20-99.
    pub fn shifted(&self, delta: i32) -> Self {
        let shift = |v: u8| (v as i32 + delta).clamp(20, 99) as u8;
        Self {
            contact: shift(self.contact),
            power: shift(self.power),
            eye: shift(self.eye),
            speed: shift(self.speed),
            defense: shift(self.defense),
            reaction: shift(self.reaction),
            arm: shift(self.arm),
            stuff: shift(self.stuff),
            control: shift(self.control),
            stamina: shift(self.stamina),
            velocity: shift(self.velocity),
            spin: shift(self.spin),
        }
    }

    pub fn batting_composite(&self) -> f64 {
        (self.contact as f64 + self.power as f64 + self.eye as f64) / 3.0
    }

    pub fn pitching_composite(&self) -> f64 {
        (self.stuff as f64 + self.control as f64 + self.stamina as f64) / 3.0
    }

    pub fn fielding_sum(&self) -> u32 {
        self.defense as u32 + self.reaction as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRepertoireEntry {
    #[serde(rename = "type")]
    pub pitch_type: String,
    pub speed: f64,
    /// Percent of pitches thrown; a repertoire sums to roughly 100.
    pub usage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum InjurySeverity {
    #[default]
    #[serde(rename = "Day-to-Day")]
    DayToDay,
    #[serde(rename = "10-Day IL")]
    TenDayIl,
    #[serde(rename = "60-Day IL")]
    SixtyDayIl,
    #[serde(rename = "Season Ending")]
    SeasonEnding,
}

impl InjurySeverity {
    pub fn label(self) -> &'static str {
        match self {
            InjurySeverity::DayToDay => "Day-to-Day",
            InjurySeverity::TenDayIl => "10-Day IL",
            InjurySeverity::SixtyDayIl => "60-Day IL",
            InjurySeverity::SeasonEnding => "Season Ending",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Injury {
    pub is_injured: bool,
    #[serde(rename = "type")]
    pub injury_type: String,
    pub days_remaining: u32,
    pub severity: InjurySeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub year: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub stats: SeasonLine,
}

impl HistoryEntry {
    pub fn year_number(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }
}

/// One archived season. Only `games` is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonLine {
    pub games: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pa: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbi: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub losses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whip: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k9: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fip: Option<f64>,
}
