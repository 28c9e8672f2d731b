//! Team strength from ratings.

use crate::engine::rng::SeededRng;
use crate::models::{Player, Team};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

const LINEUP_DEPTH: usize = 9;
const STAFF_DEPTH: usize = 5;
const OFFENSE_WEIGHT: f64 = 0.52;
const PITCHING_WEIGHT: f64 = 0.48;

/// Bounds for a perturbed overall strength.
pub const OVERALL_MIN: f64 = 38.0;
pub const OVERALL_MAX: f64 = 78.0;
/// Bounds for perturbed offense and pitching.
pub const COMPONENT_MIN: f64 = 30.0;
pub const COMPONENT_MAX: f64 = 85.0;
/// Share of the overall swing felt by offense and pitching.
const COMPONENT_SWING: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub offense: f64,
    pub pitching: f64,
    pub overall: f64,
}

fn top_by_rating<'a>(players: impl Iterator<Item = &'a Player>, depth: usize) -> Vec<&'a Player> {
    let mut v: Vec<&Player> = players.collect();
    v.sort_by(|a, b| b.rating.cmp(&a.rating));
    v.truncate(depth);
    v
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// `None` when the roster has no hitters or no pitchers.
pub fn team_strength(team: &Team) -> Option<TeamStrength> {
    let hitters = top_by_rating(team.roster.iter().filter(|p| p.is_hitter_eligible()), LINEUP_DEPTH);
    let pitchers = top_by_rating(team.roster.iter().filter(|p| p.is_pitcher_eligible()), STAFF_DEPTH);

    let offense = mean(hitters.iter().map(|p| p.attributes.batting_composite()))?;
    let pitching = mean(pitchers.iter().map(|p| p.attributes.pitching_composite()))?;
    Some(TeamStrength {
        offense,
        pitching,
        overall: offense * OFFENSE_WEIGHT + pitching * PITCHING_WEIGHT,
    })
}

/// One trial's version of a club: a season-long normal swing on overall
/// strength, with offense and pitching moving by part of it. Only `overall`
/// decides games. `sigma <= 0` leaves the base untouched apart from the
/// clamps.
pub fn perturbed(base: &TeamStrength, sigma: f64, rng: &mut SeededRng) -> TeamStrength {
    let swing = match Normal::new(0.0, sigma) {
        Ok(normal) if sigma > 0.0 => normal.sample(rng),
        _ => 0.0,
    };
    TeamStrength {
        offense: (base.offense + swing * COMPONENT_SWING).clamp(COMPONENT_MIN, COMPONENT_MAX),
        pitching: (base.pitching + swing * COMPONENT_SWING).clamp(COMPONENT_MIN, COMPONENT_MAX),
        overall: (base.overall + swing).clamp(OVERALL_MIN, OVERALL_MAX),
    }
}
