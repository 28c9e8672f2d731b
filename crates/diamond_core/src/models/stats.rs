//! Derived stat blocks. These are recomputed from `StatsCounters` by
//! `engine::stats` and never edited on their own.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattingStats {
    pub games: u32,
    pub pa: u32,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub iso: f64,
    pub babip: f64,
    pub woba: f64,
    pub wrc_plus: f64,
    pub bb_pct: f64,
    pub k_pct: f64,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub ibb: u32,
    pub war: f64,
    pub exit_velocity: f64,
    pub hard_hit_pct: f64,
    pub barrel_pct: f64,
    pub whiff_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingStats {
    pub games: u32,
    pub games_started: u32,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub holds: u32,
    pub blown_saves: u32,
    pub ip: f64,
    pub era: f64,
    pub whip: f64,
    pub k9: f64,
    pub bb9: f64,
    pub hr9: f64,
    pub fip: f64,
    pub war: f64,
    pub so: u32,
    pub bb: u32,
    pub ibb: u32,
    pub csw_pct: f64,
    pub pitches_thrown: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseStats {
    pub po: u32,
    pub a: u32,
    pub e: u32,
    pub dp: u32,
    pub chances: u32,
    pub fpct: f64,
    pub oaa: f64,
    pub uzr: f64,
    pub drs: f64,
}
