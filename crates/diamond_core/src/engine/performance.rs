//! Player performance model
//!
//! Turns ratings and season history into the multipliers the at-bat
//! resolver consumes. Everything here is pure except `effective_attribute`,
//! which draws its jitter from the injected RNG.

use super::config::LeagueConstants;
use super::rng::SimRng;
use crate::models::{HistoryEntry, Player};

/// Per-game multipliers derived from history. 1.0 is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceFactors {
    pub power: f64,
    pub contact: f64,
    pub pitching: f64,
}

impl Default for PerformanceFactors {
    fn default() -> Self {
        Self { power: 1.0, contact: 1.0, pitching: 1.0 }
    }
}

// ============================================================================
// History weighting
// ============================================================================

const MAX_HISTORY_ROWS: usize = 5;
const MIN_WEIGHTED_GAMES: f64 = 20.0;
const MIN_WEIGHTED_IP: f64 = 30.0;

fn recency_boost(years_back: i32) -> f64 {
    match years_back {
        i32::MIN..=0 => 1.50,
        1 => 1.30,
        2 => 1.10,
        3 => 0.95,
        _ => 0.75,
    }
}

/// Share of the recency bonus an aging player keeps.
fn aging_keep(age: u32) -> f64 {
    if age >= 36 {
        0.25
    } else if age >= 34 {
        0.50
    } else if age >= 32 {
        0.75
    } else {
        1.0
    }
}

fn row_weight(entry: &HistoryEntry, idx: usize, age: u32, base_year: i32) -> f64 {
    let years_back = entry.year_number().map(|y| base_year - y).unwrap_or(0);
    let boost = 1.0 + (recency_boost(years_back) - 1.0) * aging_keep(age);
    let decay = (0.80 - 0.15 * idx as f64).max(0.15);
    boost * decay
}

/// Up to five most recent rows, newest first. Rows whose year does not
/// parse sort as the newest.
fn recent_rows(history: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    let mut rows: Vec<&HistoryEntry> = history.iter().collect();
    rows.sort_by_key(|h| std::cmp::Reverse(h.year_number().unwrap_or(i32::MAX)));
    rows.truncate(MAX_HISTORY_ROWS);
    rows
}

fn hitting_row_qualifies(entry: &HistoryEntry) -> bool {
    let s = &entry.stats;
    s.games > 0 && s.pa.unwrap_or(s.games * 4) > 50
}

fn pitching_row_qualifies(entry: &HistoryEntry) -> bool {
    entry.stats.ip.unwrap_or(0.0) > 10.0
}

fn power_tier(hr_per_game: f64) -> f64 {
    if hr_per_game > 0.40 {
        1.55
    } else if hr_per_game > 0.30 {
        1.40
    } else if hr_per_game > 0.22 {
        1.25
    } else if hr_per_game > 0.16 {
        1.12
    } else if hr_per_game > 0.10 {
        1.04
    } else if hr_per_game < 0.04 {
        0.85
    } else {
        1.0
    }
}

fn contact_tier(ops: Option<f64>, avg: Option<f64>) -> f64 {
    let ops_tier: f64 = match ops {
        Some(v) if v > 0.900 => 1.20,
        Some(v) if v > 0.850 => 1.15,
        Some(v) if v > 0.780 => 1.10,
        Some(v) if v > 0.720 => 1.05,
        _ => 1.0,
    };
    let avg_tier = match avg {
        Some(v) if v > 0.300 => 1.18,
        Some(v) if v > 0.275 => 1.10,
        Some(v) if v > 0.255 => 1.04,
        _ => 1.0,
    };
    if let (Some(a), Some(o)) = (avg, ops) {
        if a < 0.220 && o < 0.680 {
            return 0.90;
        }
    }
    ops_tier.max(avg_tier)
}

fn pitching_tier(era: f64, k9: Option<f64>) -> f64 {
    let base = if era < 2.00 {
        1.12
    } else if era < 2.75 {
        1.08
    } else if era < 3.50 {
        1.04
    } else if era < 4.50 {
        1.00
    } else if era > 5.50 {
        0.90
    } else if era > 5.00 {
        0.94
    } else {
        1.0
    };
    let bonus = match k9 {
        Some(k) if k > 11.0 => 0.03,
        Some(k) if k > 9.5 => 0.015,
        _ => 0.0,
    };
    base + bonus
}

fn hitter_age_multipliers(age: u32) -> (f64, f64) {
    if age >= 36 {
        (0.82, 0.84)
    } else if age >= 34 {
        (0.88, 0.90)
    } else if age >= 32 {
        (0.93, 0.94)
    } else if age >= 30 {
        (0.97, 0.98)
    } else if age <= 25 {
        (1.03, 1.02)
    } else if age <= 28 {
        (1.015, 1.01)
    } else {
        (1.0, 1.0)
    }
}

fn pitcher_age_multiplier(age: u32) -> f64 {
    if age >= 36 {
        0.94
    } else if age >= 34 {
        0.96
    } else if age >= 32 {
        0.98
    } else {
        1.0
    }
}

#[derive(Default)]
struct WeightedMean {
    sum: f64,
    weight: f64,
}

impl WeightedMean {
    fn add(&mut self, value: Option<f64>, weight: f64) {
        if let Some(v) = value {
            self.sum += v * weight;
            self.weight += weight;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.sum / self.weight)
    }
}

/// Power, contact and pitching factors from a player's recent seasons.
///
/// Insufficient history leaves the affected factor at 1.0; this never fails.
pub fn historical_factors(player: &Player, k: &LeagueConstants) -> PerformanceFactors {
    let mut factors = PerformanceFactors::default();
    let rows = recent_rows(&player.history);
    if rows.is_empty() {
        return factors;
    }

    // Hitting
    let mut games = 0.0;
    let mut homers = 0.0;
    let mut ops = WeightedMean::default();
    let mut avg = WeightedMean::default();
    let mut qualifying_ops: Vec<f64> = Vec::new();

    // Pitching
    let mut ip = 0.0;
    let mut era = WeightedMean::default();
    let mut k9 = WeightedMean::default();

    for (idx, row) in rows.iter().enumerate() {
        let w = row_weight(row, idx, player.age, k.base_year);
        let s = &row.stats;

        if hitting_row_qualifies(row) {
            let g = s.games as f64 * w;
            games += g;
            homers += s.hr.unwrap_or(0) as f64 * w;
            ops.add(s.ops, g);
            avg.add(s.avg, g);
            if let Some(v) = s.ops {
                qualifying_ops.push(v);
            }
        }

        if pitching_row_qualifies(row) {
            let row_ip = s.ip.unwrap_or(0.0) * w;
            ip += row_ip;
            era.add(s.era, row_ip);
            k9.add(s.k9, row_ip);
        }
    }

    if games > MIN_WEIGHTED_GAMES {
        let (power_age, contact_age) = hitter_age_multipliers(player.age);
        factors.power = power_tier(homers / games) * power_age;
        factors.contact = contact_tier(ops.mean(), avg.mean()) * contact_age;

        if player.age <= 27 && qualifying_ops.len() >= 2 {
            if qualifying_ops[0] - qualifying_ops[1] >= 0.050 {
                factors.power *= 1.05;
                factors.contact *= 1.04;
            }
        }
    }

    if ip > MIN_WEIGHTED_IP {
        if let Some(mean_era) = era.mean() {
            factors.pitching =
                pitching_tier(mean_era, k9.mean()) * pitcher_age_multiplier(player.age);
        }
    }

    factors
}

// ============================================================================
// Fatigue
// ============================================================================

/// Rating penalty for a pitcher who has thrown `pitches` today.
pub fn fatigue_penalty(pitcher: &Player, pitches: u32) -> f64 {
    let stamina = pitcher.attributes.stamina as f64;
    let (threshold, rate) = if pitcher.is_rotation_arm() {
        ((stamina * 0.65 + 25.0).max(60.0), 0.8)
    } else {
        ((stamina * 0.25 + 10.0).max(15.0), 1.2)
    };
    let over = pitches as f64 - threshold;
    if over <= 0.0 {
        0.0
    } else {
        over.powf(1.6) * rate
    }
}

/// Rating used for a single pitch: base plus jitter, minus fatigue.
pub fn effective_attribute(base: u8, fatigue: f64, rng: &mut dyn SimRng) -> f64 {
    let jitter = rng.range(-5.0, 5.0);
    (base as f64 + jitter - fatigue).clamp(5.0, 99.0)
}
