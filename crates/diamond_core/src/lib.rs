//! # diamond_core - Deterministic Baseball League Simulation Engine
//!
//! Pitch-by-pitch game simulation, season bookkeeping and Monte-Carlo
//! projection for a thirty-club league, with a JSON API for front ends.
//!
//! ## Features
//! - Deterministic games (same seed = same result, byte for byte)
//! - Counting stats, rate stats and WAR maintained on every player
//! - Schedule generation, end-of-season progression, rest and injuries
//! - Playoff and award odds from fast ratings-only trials

// Allow unused code for features under development
#![allow(dead_code)]
// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Engine entry points take many parameters (teams, date, flags, options)
#![allow(clippy::too_many_arguments)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod projection;
pub mod replay;
pub mod season;

// Re-export main API functions
pub use api::{fast_sim_json, generate_schedule_json, simulate_game_json, GameRequest, GameResponse};
pub use engine::{simulate_game, GameOptions};
pub use error::{Result, SimError};
pub use models::{GameResult, Player, Team};
pub use projection::{run_fast_sim, FastSimConfig, FastSimSummary};
pub use season::{advance_day, after_game, generate_schedule, progress_season, record_standings};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use api::SCHEMA_VERSION;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// A short season end to end: schedule, a day of games, bookkeeping,
    /// projection, then progression.
    #[test]
    fn test_season_slice() {
        let mut teams: Vec<Team> = data::all_teams()
            .into_iter()
            .map(|mut t| {
                t.roster = fixtures::team(&t.id).roster;
                t
            })
            .collect();
        let start = NaiveDate::from_ymd_opt(2025, 3, 27).unwrap();
        let mut schedule = generate_schedule(&teams, start, 12);

        for (n, slot) in schedule.iter_mut().take(season::GAMES_PER_DAY).enumerate() {
            let h = teams.iter().position(|t| t.id == slot.home_team_id).unwrap();
            let a = teams.iter().position(|t| t.id == slot.away_team_id).unwrap();
            let (home, away) = if h < a {
                let (left, right) = teams.split_at_mut(a);
                (&mut left[h], &mut right[0])
            } else {
                let (left, right) = teams.split_at_mut(h);
                (&mut right[0], &mut left[a])
            };
            let options = GameOptions::seeded(n as u64);
            let result = simulate_game(home, away, slot.date, false, &options).unwrap();
            record_standings(home, away, &result);
            after_game(home, &result);
            after_game(away, &result);
            *slot = GameResult { id: slot.id.clone(), ..result };
        }
        advance_day(&mut teams);

        let played = schedule.iter().filter(|g| g.played).count();
        assert_eq!(played, season::GAMES_PER_DAY);
        assert_eq!(teams.iter().map(|t| t.wins).sum::<u32>(), 15);
        assert_eq!(teams.iter().map(|t| t.losses).sum::<u32>(), 15);

        let config = FastSimConfig { simulations: 4, seed: 1, ..Default::default() };
        let summary = run_fast_sim(&teams, &schedule, &config);
        for t in &teams {
            let odds = &summary.team_odds[&t.id];
            assert!((odds.mean_wins + odds.mean_losses - 162.0).abs() < 1e-9);
        }

        progress_season(&mut teams, "2025", 3);
        assert!(teams.iter().all(|t| t.wins == 0 && t.roster.iter().all(|p| p.history.len() == 1)));
    }
}
