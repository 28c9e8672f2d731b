use super::Player;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub mlb_id: u32,
    pub city: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub stadium: String,
    pub league: League,
    pub division: Division,
    #[serde(default)]
    pub park_factors: ParkFactors,
    #[serde(default)]
    pub roster: Vec<Player>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub runs_scored: u32,
    #[serde(default)]
    pub runs_allowed: u32,
}

impl Team {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.roster.iter_mut().find(|p| p.id == id)
    }

    pub fn reset_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.runs_scored = 0;
        self.runs_allowed = 0;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum League {
    AL,
    NL,
}

impl League {
    pub const ALL: [League; 2] = [League::AL, League::NL];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Division {
    East,
    Central,
    West,
}

impl Division {
    pub const ALL: [Division; 3] = [Division::East, Division::Central, Division::West];
}

/// Park factors on a 100 = neutral scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkFactors {
    pub run: f64,
    pub hr: f64,
    pub babip: f64,
}

impl Default for ParkFactors {
    fn default() -> Self {
        Self { run: 100.0, hr: 100.0, babip: 100.0 }
    }
}

impl ParkFactors {
    pub fn run_ratio(&self) -> f64 {
        self.run / 100.0
    }

    pub fn hr_ratio(&self) -> f64 {
        self.hr / 100.0
    }

    pub fn babip_ratio(&self) -> f64 {
        self.babip / 100.0
    }
}
