//! Award voting for one projection trial.

use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{League, Player, Team};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

const ROOKIE_AGE: u32 = 25;
const ROOKIE_FALLBACK_AGE: u32 = 26;
const TOP_ENTRIES: usize = 10;

pub fn hitter_projection(p: &Player) -> f64 {
    let two_way = if p.is_two_way { 5.0 } else { 0.0 };
    p.rating as f64 * 0.55 + p.attributes.batting_composite() * 0.45 + p.attributes.speed as f64 * 0.08 + two_way
}

/// Two-way arms throw fewer innings, so they are marked down.
pub fn pitcher_projection(p: &Player) -> f64 {
    let two_way = if p.is_two_way { -15.0 } else { 0.0 };
    p.rating as f64 * 0.5 + p.attributes.pitching_composite() * 0.5 + p.attributes.velocity as f64 * 0.06 + two_way
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub team: usize,
    pub player: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Winners {
    pub mvp: Option<Candidate>,
    pub cy_young: Option<Candidate>,
    pub rookie: Option<Candidate>,
}

/// Highest score wins; the first candidate keeps a tie.
fn best(scored: impl Iterator<Item = (Candidate, f64)>) -> Option<Candidate> {
    scored
        .fold(None, |acc: Option<(Candidate, f64)>, (c, s)| match acc {
            Some((_, top)) if top >= s => acc,
            _ => Some((c, s)),
        })
        .map(|(c, _)| c)
}

pub fn vote(teams: &[Team], wins: &[u32], league: League, rng: &mut SeededRng) -> Winners {
    let pool: Vec<(Candidate, &Player)> = teams
        .iter()
        .enumerate()
        .filter(|(_, t)| t.league == league)
        .flat_map(|(ti, t)| t.roster.iter().enumerate().map(move |(pi, p)| (Candidate { team: ti, player: pi }, p)))
        .collect();
    let hitters: Vec<(Candidate, &Player)> = pool.iter().copied().filter(|(_, p)| p.is_hitter_eligible()).collect();

    let mvp = best(
        hitters.iter().map(|&(c, p)| (c, hitter_projection(p) + wins[c.team] as f64 * 0.08 + rng.range(0.0, 8.0))),
    );
    let cy_young = best(
        pool.iter()
            .filter(|(_, p)| p.is_pitcher_eligible())
            .map(|&(c, p)| (c, pitcher_projection(p) + wins[c.team] as f64 * 0.06 + rng.range(0.0, 8.0))),
    );

    let mut rookies: Vec<&(Candidate, &Player)> =
        hitters.iter().filter(|(_, p)| p.age <= ROOKIE_AGE && p.history.len() <= 1).collect();
    if rookies.is_empty() {
        rookies = hitters.iter().filter(|(_, p)| p.age <= ROOKIE_FALLBACK_AGE).collect();
    }
    let rookie = best(rookies.iter().map(|&&(c, p)| (c, hitter_projection(p) + rng.range(0.0, 10.0))));

    Winners { mvp, cy_young, rookie }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub player_id: String,
    pub name: String,
    pub team_id: String,
    /// Percent of trials won.
    pub probability: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardOdds {
    pub mvp_al: Vec<AwardEntry>,
    pub mvp_nl: Vec<AwardEntry>,
    pub cy_al: Vec<AwardEntry>,
    pub cy_nl: Vec<AwardEntry>,
    pub roy_al: Vec<AwardEntry>,
    pub roy_nl: Vec<AwardEntry>,
}

/// Win counts for one award in one league, keyed by (team, roster index).
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: FxHashMap<(usize, usize), u32>,
}

impl Tally {
    pub fn add(&mut self, winner: Option<Candidate>) {
        if let Some(c) = winner {
            *self.counts.entry((c.team, c.player)).or_default() += 1;
        }
    }

    /// Top ten by share of `trials`, ties broken by player id.
    pub fn entries(&self, teams: &[Team], trials: u32) -> Vec<AwardEntry> {
        let mut out: Vec<AwardEntry> = self
            .counts
            .iter()
            .filter_map(|(&(ti, pi), &n)| {
                let team = teams.get(ti)?;
                let player = team.roster.get(pi)?;
                Some(AwardEntry {
                    player_id: player.id.clone(),
                    name: player.name.clone(),
                    team_id: team.id.clone(),
                    probability: if trials == 0 { 0.0 } else { n as f64 / trials as f64 * 100.0 },
                })
            })
            .collect();
        out.sort_by(|a, b| b.probability.total_cmp(&a.probability).then_with(|| a.player_id.cmp(&b.player_id)));
        out.truncate(TOP_ENTRIES);
        out
    }
}
