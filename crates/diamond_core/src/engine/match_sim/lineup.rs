//! Lineup construction and bench moves.

use super::side_table::LineupSlot;
use crate::engine::config::LeagueConstants;
use crate::models::{Player, Position, Team};
use fxhash::FxHashSet;

/// Games score from up to three recent seasons, normalised so 150 weighted
/// games is 100. A year that does not parse counts as year 0.
fn games_score(player: &Player, k: &LeagueConstants) -> f64 {
    let mut rows: Vec<_> = player.history.iter().collect();
    rows.sort_by_key(|h| std::cmp::Reverse(h.year_number().unwrap_or(0)));
    rows.truncate(3);
    if rows.is_empty() {
        return 0.0;
    }

    let total: f64 = rows
        .iter()
        .map(|h| {
            let years_back = k.base_year - h.year_number().unwrap_or(0);
            let recency = match years_back {
                i32::MIN..=0 => 1.5,
                1 => 1.2,
                _ => 1.0,
            };
            let games = h.stats.games;
            let pa = h.stats.pa.unwrap_or(0);
            let volume = if games >= 100 || pa >= 400 {
                1.5
            } else if games >= 50 || pa >= 200 {
                1.0
            } else {
                0.5
            };
            games as f64 * recency * volume
        })
        .sum();

    let mean = total / rows.len() as f64;
    (mean / 1.5).min(100.0)
}

/// 0.60 games score + 0.40 rating.
pub fn starter_score(player: &Player, k: &LeagueConstants) -> f64 {
    0.60 * games_score(player, k) + 0.40 * player.rating as f64
}

fn can_hit(p: &Player) -> bool {
    p.is_healthy() && p.is_hitter_eligible()
}

/// Best nine by position, then ordered by starter score.
///
/// Positions are filled in `Position::LINEUP_ORDER`; any position nobody
/// plays naturally goes to the best remaining hitter. With only eight
/// hitters available the DH spot stays empty.
pub fn get_best_lineup(team: &Team, k: &LeagueConstants) -> Vec<LineupSlot> {
    let scores: Vec<f64> = team.roster.iter().map(|p| starter_score(p, k)).collect();
    let mut taken: FxHashSet<usize> = FxHashSet::default();
    let mut filled: Vec<Option<usize>> = vec![None; Position::LINEUP_ORDER.len()];

    let best_where = |taken: &FxHashSet<usize>, pred: &dyn Fn(&Player) -> bool| -> Option<usize> {
        team.roster
            .iter()
            .enumerate()
            .filter(|(i, p)| !taken.contains(i) && can_hit(p) && pred(*p))
            .fold(None, |best: Option<usize>, (i, _)| match best {
                Some(b) if scores[b] >= scores[i] => Some(b),
                _ => Some(i),
            })
    };

    for (slot, pos) in Position::LINEUP_ORDER.iter().enumerate() {
        if let Some(i) = best_where(&taken, &|p: &Player| p.position == *pos) {
            taken.insert(i);
            filled[slot] = Some(i);
        }
    }

    for slot in 0..filled.len() {
        if filled[slot].is_none() {
            if let Some(i) = best_where(&taken, &|_: &Player| true) {
                taken.insert(i);
                filled[slot] = Some(i);
            }
        }
    }

    let mut lineup: Vec<LineupSlot> = filled
        .iter()
        .zip(Position::LINEUP_ORDER.iter())
        .filter_map(|(i, pos)| i.map(|player| LineupSlot { player, position: *pos }))
        .collect();
    lineup.sort_by(|a, b| scores[b.player].total_cmp(&scores[a.player]));
    lineup.truncate(9);
    lineup
}

/// Healthy hitters (two-way players included) who have not entered the game.
pub fn bench(team: &Team, used: &FxHashSet<usize>) -> Vec<usize> {
    team.roster
        .iter()
        .enumerate()
        .filter(|(i, p)| !used.contains(i) && can_hit(p))
        .map(|(i, _)| i)
        .collect()
}

fn hitting_sum(p: &Player) -> u32 {
    p.attributes.contact as u32 + p.attributes.power as u32 + p.attributes.eye as u32
}

fn best_by<F: Fn(&Player) -> u32>(team: &Team, candidates: &[usize], key: F) -> Option<usize> {
    candidates.iter().copied().fold(None, |best, i| match best {
        Some(b) if key(&team.roster[b]) >= key(&team.roster[i]) => Some(b),
        _ => Some(i),
    })
}

/// A bench bat at least 20 points better (contact+power+eye) than the
/// current batter.
pub fn pinch_hitter_for(team: &Team, used: &FxHashSet<usize>, batter: usize) -> Option<usize> {
    let current = hitting_sum(&team.roster[batter]);
    let bench = bench(team, used);
    best_by(team, &bench, hitting_sum).filter(|&i| hitting_sum(&team.roster[i]) >= current + 20)
}

/// A bench runner at least 25 speed faster than a slow (<40) runner.
pub fn pinch_runner_for(team: &Team, used: &FxHashSet<usize>, runner: usize) -> Option<usize> {
    let speed = team.roster[runner].attributes.speed as u32;
    if speed >= 40 {
        return None;
    }
    let bench = bench(team, used);
    best_by(team, &bench, |p| p.attributes.speed as u32).filter(|&i| team.roster[i].attributes.speed as u32 >= speed + 25)
}

/// Weakest fielder in the lineup (DH excluded) and a bench glove that
/// improves defense+reaction by at least 8.
pub fn defensive_upgrade(team: &Team, used: &FxHashSet<usize>, lineup: &[LineupSlot]) -> Option<(usize, usize)> {
    let weakest = lineup
        .iter()
        .enumerate()
        .filter(|(_, s)| s.position.fields())
        .min_by_key(|(_, s)| team.roster[s.player].attributes.fielding_sum())?;
    let (slot, current) = (weakest.0, weakest.1.player);
    let floor = team.roster[current].attributes.fielding_sum();

    let bench = bench(team, used);
    best_by(team, &bench, |p| p.attributes.fielding_sum())
        .filter(|&i| team.roster[i].attributes.fielding_sum() >= floor + 8)
        .map(|i| (slot, i))
}
