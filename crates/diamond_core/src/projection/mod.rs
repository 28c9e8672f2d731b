//! Monte-Carlo season projection.
//!
//! Each trial plays the rest of the regular season one coin flip per game,
//! seeds a postseason and votes the awards. Nothing here touches the
//! at-bat engine; it works from ratings alone.
//!
//! ```text
//! Teams ──► team_strength ──► perturbed (per trial)
//!                                 │
//! remaining schedule ─────────────┼──► W/L ──► league_field ──► play_league
//!                                 │                                  │
//!                                 └──► vote (MVP / Cy / ROY)         ▼
//!                                                             FastSimSummary
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `strength` | Offense/pitching/overall ratings and per-trial swings |
//! | `bracket` | Division winners, wildcards, series play |
//! | `awards` | Award scoring and tallies |

pub mod awards;
pub mod bracket;
pub mod strength;

pub use awards::{AwardEntry, AwardOdds};
pub use strength::{team_strength, TeamStrength};

use crate::engine::probability::win_probability;
use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{GameResult, League, Team};
use awards::Tally;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_simulations() -> u32 {
    1000
}

fn default_sigma() -> f64 {
    8.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastSimConfig {
    #[serde(default = "default_simulations")]
    pub simulations: u32,
    #[serde(default)]
    pub seed: u64,
    /// Ignore current records and replay every regular-season game.
    #[serde(default)]
    pub fresh_projection: bool,
    /// Standard deviation of the per-trial strength swing; 0 disables it.
    #[serde(default = "default_sigma")]
    pub strength_sigma: f64,
}

impl Default for FastSimConfig {
    fn default() -> Self {
        Self { simulations: default_simulations(), seed: 0, fresh_projection: false, strength_sigma: default_sigma() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOdds {
    pub team_id: String,
    pub team_name: String,
    pub mean_wins: f64,
    pub mean_losses: f64,
    pub playoff_pct: f64,
    pub division_pct: f64,
    pub wild_card_pct: f64,
    pub pennant_pct: f64,
    pub world_series_pct: f64,
    /// Final win total -> number of trials.
    pub wins_dist: BTreeMap<u32, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastSimSummary {
    pub team_odds: BTreeMap<String, TeamOdds>,
    pub award_odds: AwardOdds,
    pub simulations: u32,
}

#[derive(Debug, Clone, Default)]
struct Counts {
    wins_total: u64,
    losses_total: u64,
    playoffs: u32,
    divisions: u32,
    wild_cards: u32,
    pennants: u32,
    titles: u32,
    wins_dist: BTreeMap<u32, u32>,
}

#[derive(Debug, Default)]
struct AwardTallies {
    mvp: [Tally; 2],
    cy: [Tally; 2],
    roy: [Tally; 2],
}

fn league_slot(league: League) -> usize {
    match league {
        League::AL => 0,
        League::NL => 1,
    }
}

pub fn run_fast_sim(teams: &[Team], schedule: &[GameResult], config: &FastSimConfig) -> FastSimSummary {
    let base: Vec<Option<TeamStrength>> = teams.iter().map(team_strength).collect();
    let index: FxHashMap<&str, usize> = teams.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();

    let (base_wins, base_losses): (Vec<u32>, Vec<u32>) = if config.fresh_projection {
        (vec![0; teams.len()], vec![0; teams.len()])
    } else {
        (teams.iter().map(|t| t.wins).collect(), teams.iter().map(|t| t.losses).collect())
    };

    let remaining: Vec<(usize, usize)> = schedule
        .iter()
        .filter(|g| !g.is_postseason && (config.fresh_projection || !g.played))
        .filter_map(|g| Some((*index.get(g.home_team_id.as_str())?, *index.get(g.away_team_id.as_str())?)))
        .collect();

    log::debug!(
        "fast sim: {} trials, {} clubs, {} remaining games",
        config.simulations,
        teams.len(),
        remaining.len()
    );

    let mut rng = SeededRng::new(config.seed);
    let mut counts = vec![Counts::default(); teams.len()];
    let mut tallies = AwardTallies::default();

    for _ in 0..config.simulations {
        let mut wins = base_wins.clone();
        let mut losses = base_losses.clone();
        let strengths: Vec<Option<TeamStrength>> = base
            .iter()
            .map(|b| b.as_ref().map(|s| strength::perturbed(s, config.strength_sigma, &mut rng)))
            .collect();

        for &(h, a) in &remaining {
            let (Some(hs), Some(as_)) = (&strengths[h], &strengths[a]) else {
                continue;
            };
            if rng.chance(win_probability(hs.overall, as_.overall)) {
                wins[h] += 1;
                losses[a] += 1;
            } else {
                wins[a] += 1;
                losses[h] += 1;
            }
        }

        for (i, c) in counts.iter_mut().enumerate() {
            c.wins_total += wins[i] as u64;
            c.losses_total += losses[i] as u64;
            *c.wins_dist.entry(wins[i]).or_default() += 1;
        }

        let mut champions = [None; 2];
        for league in League::ALL {
            let field = bracket::league_field(teams, &wins, league);
            for &w in &field.division_winners {
                counts[w].divisions += 1;
                counts[w].playoffs += 1;
            }
            for &w in &field.wildcards {
                counts[w].wild_cards += 1;
                counts[w].playoffs += 1;
            }
            if let Some(pennant) = bracket::play_league(&field.seeds(), &strengths, &mut rng) {
                counts[pennant].pennants += 1;
                champions[league_slot(league)] = Some(pennant);
            }
        }
        if let [Some(al), Some(nl)] = champions {
            let title = bracket::play_series(al, nl, 7, &strengths, &mut rng);
            counts[title].titles += 1;
        }

        for league in League::ALL {
            let slot = league_slot(league);
            let winners = awards::vote(teams, &wins, league, &mut rng);
            tallies.mvp[slot].add(winners.mvp);
            tallies.cy[slot].add(winners.cy_young);
            tallies.roy[slot].add(winners.rookie);
        }
    }

    summarize(teams, &counts, &tallies, config.simulations)
}

fn summarize(teams: &[Team], counts: &[Counts], tallies: &AwardTallies, trials: u32) -> FastSimSummary {
    let pct = |n: u32| if trials == 0 { 0.0 } else { n as f64 / trials as f64 * 100.0 };
    let avg = |n: u64| if trials == 0 { 0.0 } else { n as f64 / trials as f64 };

    let team_odds = teams
        .iter()
        .zip(counts)
        .map(|(t, c)| {
            let odds = TeamOdds {
                team_id: t.id.clone(),
                team_name: t.display_name(),
                mean_wins: avg(c.wins_total),
                mean_losses: avg(c.losses_total),
                playoff_pct: pct(c.playoffs),
                division_pct: pct(c.divisions),
                wild_card_pct: pct(c.wild_cards),
                pennant_pct: pct(c.pennants),
                world_series_pct: pct(c.titles),
                wins_dist: c.wins_dist.clone(),
            };
            (t.id.clone(), odds)
        })
        .collect();

    FastSimSummary {
        team_odds,
        award_odds: AwardOdds {
            mvp_al: tallies.mvp[0].entries(teams, trials),
            mvp_nl: tallies.mvp[1].entries(teams, trials),
            cy_al: tallies.cy[0].entries(teams, trials),
            cy_nl: tallies.cy[1].entries(teams, trials),
            roy_al: tallies.roy[0].entries(teams, trials),
            roy_nl: tallies.roy[1].entries(teams, trials),
        },
        simulations: trials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::teams::all_teams;
    use crate::fixtures;
    use crate::season::generate_schedule;
    use chrono::NaiveDate;

    /// All thirty clubs with fixture rosters.
    fn league() -> Vec<Team> {
        all_teams()
            .into_iter()
            .map(|mut t| {
                t.roster = fixtures::team(&t.id).roster;
                t
            })
            .collect()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 27).unwrap()
    }

    #[test]
    fn test_empty_schedule_keeps_records() {
        let mut teams = league();
        for (i, t) in teams.iter_mut().enumerate() {
            t.wins = 60 + i as u32;
            t.losses = 102 - i as u32;
        }
        let config = FastSimConfig { simulations: 20, seed: 1, ..Default::default() };
        let summary = run_fast_sim(&teams, &[], &config);

        assert_eq!(summary.simulations, 20);
        for t in &teams {
            let odds = &summary.team_odds[&t.id];
            assert_eq!(odds.mean_wins, t.wins as f64);
            assert_eq!(odds.mean_losses, t.losses as f64);
            assert_eq!(odds.wins_dist.get(&t.wins), Some(&20));
        }
    }

    #[test]
    fn test_full_season_accounting() {
        let teams = league();
        let schedule = generate_schedule(&teams, start(), 7);
        let config = FastSimConfig { simulations: 25, seed: 3, ..Default::default() };
        let summary = run_fast_sim(&teams, &schedule, &config);

        let odds: Vec<&TeamOdds> = summary.team_odds.values().collect();
        assert_eq!(odds.len(), 30);
        for o in &odds {
            assert!((o.mean_wins + o.mean_losses - 162.0).abs() < 1e-9);
            assert!((o.playoff_pct - o.division_pct - o.wild_card_pct).abs() < 1e-9);
            assert_eq!(o.wins_dist.values().sum::<u32>(), 25);
        }
        let sum = |f: fn(&TeamOdds) -> f64| odds.iter().map(|o| f(o)).sum::<f64>();
        // six playoff clubs, three division winners, one pennant per league; one title
        assert!((sum(|o| o.playoff_pct) - 1200.0).abs() < 1e-6);
        assert!((sum(|o| o.division_pct) - 600.0).abs() < 1e-6);
        assert!((sum(|o| o.pennant_pct) - 200.0).abs() < 1e-6);
        assert!((sum(|o| o.world_series_pct) - 100.0).abs() < 1e-6);

        let awards = &summary.award_odds;
        for list in [&awards.mvp_al, &awards.mvp_nl, &awards.cy_al, &awards.cy_nl] {
            assert!(!list.is_empty() && list.len() <= 10);
            assert!(list.windows(2).all(|w| w[0].probability >= w[1].probability));
            assert!((list.iter().map(|e| e.probability).sum::<f64>() - 100.0).abs() < 1e-6 || list.len() == 10);
        }
    }

    #[test]
    fn test_played_games_are_skipped_unless_fresh() {
        let teams = league();
        let mut schedule = generate_schedule(&teams, start(), 7);
        for g in schedule.iter_mut() {
            g.played = true;
        }
        let config = FastSimConfig { simulations: 5, seed: 3, ..Default::default() };
        let summary = run_fast_sim(&teams, &schedule, &config);
        assert!(summary.team_odds.values().all(|o| o.mean_wins == 0.0));

        let fresh = FastSimConfig { fresh_projection: true, ..config };
        let summary = run_fast_sim(&teams, &schedule, &fresh);
        assert!(summary.team_odds.values().all(|o| (o.mean_wins + o.mean_losses - 162.0).abs() < 1e-9));
    }

    #[test]
    fn test_same_seed_same_summary() {
        let teams = league();
        let schedule = generate_schedule(&teams, start(), 2);
        let config = FastSimConfig { simulations: 10, seed: 99, ..Default::default() };
        assert_eq!(run_fast_sim(&teams, &schedule, &config), run_fast_sim(&teams, &schedule, &config));
    }

    #[test]
    fn test_zero_simulations() {
        let teams = league();
        let config = FastSimConfig { simulations: 0, ..Default::default() };
        let summary = run_fast_sim(&teams, &[], &config);
        assert_eq!(summary.simulations, 0);
        assert!(summary.team_odds.values().all(|o| o.mean_wins == 0.0 && o.playoff_pct == 0.0));
        assert!(summary.award_odds.mvp_al.is_empty());
    }
}
