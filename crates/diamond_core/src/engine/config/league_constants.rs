//! League-wide constants used by the statistics engine and the
//! performance model.

use crate::models::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConstants {
    /// Season treated as "current" by the history weighting.
    pub base_year: i32,

    pub lg_woba: f64,
    pub woba_scale: f64,
    pub lg_r_per_pa: f64,
    pub batter_runs_per_win: f64,
    pub pitcher_runs_per_win: f64,
    pub fip_constant: f64,
    pub lg_era: f64,
    /// Replacement level sits this many runs per nine above league ERA.
    pub replacement_ra9_margin: f64,
    /// Replacement runs credited per 600 PA.
    pub replacement_runs_per_600: f64,

    pub wrc_plus_compress_high: f64,
    pub wrc_plus_compress_low: f64,
    pub wrc_plus_compress_factor: f64,

    pub war_regress_high: f64,
    pub war_regress_low: f64,
    pub war_regress_factor: f64,

    pub weights: LinearWeights,
    pub positional: PositionalAdjustments,
}

impl Default for LeagueConstants {
    fn default() -> Self {
        Self {
            base_year: 2025,
            lg_woba: 0.318,
            woba_scale: 1.20,
            lg_r_per_pa: 0.118,
            batter_runs_per_win: 10.5,
            pitcher_runs_per_win: 10.0,
            fip_constant: 3.10,
            lg_era: 4.20,
            replacement_ra9_margin: 1.00,
            replacement_runs_per_600: 20.0,
            wrc_plus_compress_high: 140.0,
            wrc_plus_compress_low: 60.0,
            wrc_plus_compress_factor: 0.70,
            war_regress_high: 6.0,
            war_regress_low: -1.0,
            war_regress_factor: 0.75,
            weights: LinearWeights::default(),
            positional: PositionalAdjustments::default(),
        }
    }
}

impl LeagueConstants {
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn replacement_ra9(&self) -> f64 {
        self.lg_era + self.replacement_ra9_margin
    }
}

/// wOBA linear weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearWeights {
    pub ubb: f64,
    pub hbp: f64,
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub hr: f64,
}

impl Default for LinearWeights {
    fn default() -> Self {
        Self { ubb: 0.69, hbp: 0.72, single: 0.88, double: 1.27, triple: 1.61, hr: 2.10 }
    }
}

/// Full-season (600 PA) positional run adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionalAdjustments {
    pub c: f64,
    pub ss: f64,
    pub second_base: f64,
    pub third_base: f64,
    pub cf: f64,
    pub lf: f64,
    pub rf: f64,
    pub first_base: f64,
    pub dh: f64,
}

impl Default for PositionalAdjustments {
    fn default() -> Self {
        Self {
            c: 12.5,
            ss: 7.5,
            second_base: 2.5,
            third_base: 2.5,
            cf: 2.5,
            lf: -7.5,
            rf: -7.5,
            first_base: -12.5,
            dh: -17.5,
        }
    }
}

impl PositionalAdjustments {
    pub fn for_position(&self, position: Position) -> f64 {
        match position {
            Position::C => self.c,
            Position::SS => self.ss,
            Position::SecondBase => self.second_base,
            Position::ThirdBase => self.third_base,
            Position::CF => self.cf,
            Position::LF => self.lf,
            Position::RF => self.rf,
            Position::FirstBase => self.first_base,
            Position::DH => self.dh,
            Position::P => 0.0,
        }
    }
}
