//! Postseason field and series play for one projection trial.
//!
//! Six clubs per league: three division winners seeded 1-3 by wins, then
//! three wildcards seeded 4-6.
//!
//! ```text
//! Wild Card (Bo3)   3 v 6, 4 v 5
//! Division  (Bo5)   1 v (4/5), 2 v (3/6)
//! LCS       (Bo7)
//! World Series (Bo7)
//! ```

use super::strength::TeamStrength;
use crate::engine::probability::{playoff_adjusted, win_probability};
use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{Division, League, Team};

pub const WILDCARDS: usize = 3;
pub const FIELD_SIZE: usize = 6;

/// Indices into the trial's team slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueField {
    pub division_winners: Vec<usize>,
    pub wildcards: Vec<usize>,
}

impl LeagueField {
    pub fn seeds(&self) -> Vec<usize> {
        self.division_winners.iter().chain(self.wildcards.iter()).copied().collect()
    }
}

/// Sorts indices by wins, best first. Ties keep input order.
fn by_wins(mut idx: Vec<usize>, wins: &[u32]) -> Vec<usize> {
    idx.sort_by(|&a, &b| wins[b].cmp(&wins[a]));
    idx
}

pub fn league_field(teams: &[Team], wins: &[u32], league: League) -> LeagueField {
    let mut division_winners = Vec::with_capacity(Division::ALL.len());
    for division in Division::ALL {
        let members: Vec<usize> =
            (0..teams.len()).filter(|&i| teams[i].league == league && teams[i].division == division).collect();
        if let Some(&best) = by_wins(members, wins).first() {
            division_winners.push(best);
        }
    }
    let division_winners = by_wins(division_winners, wins);

    let rest: Vec<usize> =
        (0..teams.len()).filter(|&i| teams[i].league == league && !division_winners.contains(&i)).collect();
    let mut wildcards = by_wins(rest, wins);
    wildcards.truncate(WILDCARDS);

    LeagueField { division_winners, wildcards }
}

/// Plays a best-of-`games` series with `a` hosting; returns the winner.
pub fn play_series(
    a: usize,
    b: usize,
    games: u32,
    strengths: &[Option<TeamStrength>],
    rng: &mut SeededRng,
) -> usize {
    let needed = games / 2 + 1;
    let p = match (&strengths[a], &strengths[b]) {
        (Some(sa), Some(sb)) => playoff_adjusted(win_probability(sa.overall, sb.overall)),
        _ => 0.5,
    };
    let (mut wa, mut wb) = (0, 0);
    while wa < needed && wb < needed {
        if rng.chance(p) {
            wa += 1;
        } else {
            wb += 1;
        }
    }
    if wa > wb {
        a
    } else {
        b
    }
}

/// Runs a full league bracket and returns the pennant winner, or `None`
/// when the league cannot fill six seeds.
pub fn play_league(seeds: &[usize], strengths: &[Option<TeamStrength>], rng: &mut SeededRng) -> Option<usize> {
    if seeds.len() < FIELD_SIZE {
        return None;
    }
    let wc1 = play_series(seeds[2], seeds[5], 3, strengths, rng);
    let wc2 = play_series(seeds[3], seeds[4], 3, strengths, rng);
    let ds1 = play_series(seeds[0], wc2, 5, strengths, rng);
    let ds2 = play_series(seeds[1], wc1, 5, strengths, rng);
    Some(play_series(ds1, ds2, 7, strengths, rng))
}
