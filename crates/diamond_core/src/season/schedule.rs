//! Regular-season schedule generation.
//!
//! Matchup counts per pair:
//! - division rivals: 19
//! - same league, other division: 7 or 6 (seven against six of the ten)
//! - interleague: 2 or 1 (two against five of the fifteen)
//!
//! For the standard 2 x 3 x 5 layout that is 162 games per club. The 7- and
//! 2-game pairs are picked by a circulant pattern on each club's slot within
//! its division or league, so every club gets the same split. Other layouts
//! fall back to a parity rule and do not promise 162.

use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{Division, GameResult, League, Team};
use chrono::{Days, NaiveDate};

pub const GAMES_PER_DAY: usize = 15;

const DIVISION_GAMES: u32 = 19;
const CLUBS_PER_DIVISION: usize = 5;
const CLUBS_PER_LEAGUE: usize = 15;

#[derive(Debug, Clone, Copy)]
struct Slot {
    league: League,
    division: Division,
    /// Position within the division, in input order.
    in_division: usize,
    /// Position within the league, in input order.
    in_league: usize,
}

fn slots(teams: &[Team]) -> Vec<Slot> {
    teams
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let before = &teams[..i];
            Slot {
                league: t.league,
                division: t.division,
                in_division: before.iter().filter(|o| o.league == t.league && o.division == t.division).count(),
                in_league: before.iter().filter(|o| o.league == t.league).count(),
            }
        })
        .collect()
}

fn is_standard(slots: &[Slot]) -> bool {
    League::ALL.iter().all(|&l| {
        Division::ALL.iter().all(|&d| slots.iter().filter(|s| s.league == l && s.division == d).count() == CLUBS_PER_DIVISION)
    })
}

/// Games between the clubs at input positions `i < j`.
fn games_between(a: &Slot, b: &Slot, i: usize, j: usize, standard: bool) -> u32 {
    if a.league == b.league && a.division == b.division {
        return DIVISION_GAMES;
    }
    if a.league == b.league {
        let seven = if standard {
            // orient by division so the pattern is a 3-regular bipartite graph
            let (x, y) = if a.division < b.division { (a, b) } else { (b, a) };
            (y.in_division + CLUBS_PER_DIVISION - x.in_division) % CLUBS_PER_DIVISION < 3
        } else {
            (i + j) % 3 == 0
        };
        return if seven { 7 } else { 6 };
    }
    let two = if standard {
        let (x, y) = if a.league < b.league { (a, b) } else { (b, a) };
        (y.in_league + CLUBS_PER_LEAGUE - x.in_league) % CLUBS_PER_LEAGUE < 5
    } else {
        (i + j) % 5 == 0
    };
    if two {
        2
    } else {
        1
    }
}

/// Full regular season, shuffled and dated fifteen games per day from
/// `start`. Home and away alternate within each series of matchups.
pub fn generate_schedule(teams: &[Team], start: NaiveDate, seed: u64) -> Vec<GameResult> {
    let slots = slots(teams);
    let standard = is_standard(&slots);
    if !standard {
        log::warn!("non-standard league layout ({} clubs); schedule will not be balanced", teams.len());
    }

    let mut matchups: Vec<(usize, usize)> = Vec::new();
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            let games = games_between(&slots[i], &slots[j], i, j, standard);
            for g in 0..games {
                matchups.push(if g % 2 == 0 { (i, j) } else { (j, i) });
            }
        }
    }

    let mut rng = SeededRng::new(seed);
    for i in (1..matchups.len()).rev() {
        let j = rng.index(i + 1);
        matchups.swap(i, j);
    }

    matchups
        .iter()
        .enumerate()
        .map(|(n, &(h, a))| {
            let (home, away) = (&teams[h], &teams[a]);
            let day = (n / GAMES_PER_DAY) as u64;
            let date = start.checked_add_days(Days::new(day)).unwrap_or(start);
            GameResult::scheduled(format!("game_{}_{}_{}", n, home.id, away.id), date, home, away)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::teams::all_teams;
    use fxhash::FxHashMap;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 27).unwrap()
    }

    #[test]
    fn test_162_games_per_club() {
        let teams = all_teams();
        let schedule = generate_schedule(&teams, start(), 1);
        assert_eq!(schedule.len(), 2430);

        let mut per_team: FxHashMap<&str, u32> = FxHashMap::default();
        let mut home_games: FxHashMap<&str, u32> = FxHashMap::default();
        for g in &schedule {
            *per_team.entry(&g.home_team_id).or_default() += 1;
            *per_team.entry(&g.away_team_id).or_default() += 1;
            *home_games.entry(&g.home_team_id).or_default() += 1;
            assert!(!g.played);
            assert_ne!(g.home_team_id, g.away_team_id);
        }
        assert_eq!(per_team.len(), 30);
        assert!(per_team.values().all(|&n| n == 162));
        assert!(home_games.values().all(|&n| (70..=92).contains(&n)));
    }

    #[test]
    fn test_matchup_counts() {
        let teams = all_teams();
        let schedule = generate_schedule(&teams, start(), 3);
        let t = &teams[0];
        let mut vs: FxHashMap<&str, u32> = FxHashMap::default();
        for g in schedule.iter().filter(|g| g.involves(&t.id)) {
            let other = if g.home_team_id == t.id { &g.away_team_id } else { &g.home_team_id };
            *vs.entry(other.as_str()).or_default() += 1;
        }

        let count = |pred: &dyn Fn(&Team) -> bool, games: u32| {
            teams.iter().filter(|o| o.id != t.id && pred(o) && vs.get(o.id.as_str()) == Some(&games)).count()
        };
        let division = |o: &Team| o.league == t.league && o.division == t.division;
        let league = |o: &Team| o.league == t.league && o.division != t.division;
        let inter = |o: &Team| o.league != t.league;

        assert_eq!(count(&division, 19), 4);
        assert_eq!(count(&league, 7), 6);
        assert_eq!(count(&league, 6), 4);
        assert_eq!(count(&inter, 2), 5);
        assert_eq!(count(&inter, 1), 10);
    }

    #[test]
    fn test_fifteen_games_per_day() {
        let teams = all_teams();
        let schedule = generate_schedule(&teams, start(), 5);
        let first_day = schedule.iter().filter(|g| g.date == start()).count();
        assert_eq!(first_day, GAMES_PER_DAY);
        let last = schedule.last().unwrap();
        assert_eq!(last.date, start().checked_add_days(Days::new(161)).unwrap());
    }

    #[test]
    fn test_seeded_shuffle() {
        let teams = all_teams();
        let a = generate_schedule(&teams, start(), 9);
        let b = generate_schedule(&teams, start(), 9);
        let c = generate_schedule(&teams, start(), 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
