//! Season Helpers
//!
//! Thin collaborators the season orchestrator calls between games.
//!
//! ## Module Layout
//! - `schedule`: 162-game schedule generation
//! - `progression`: end-of-season aging, rating drift and archiving
//! - `recovery`: rest days, injury countdown, standings
//!
//! ## Usage Flow
//! 1. `generate_schedule()` once per season
//! 2. per day: `advance_day()`, then for each game `simulate_game()`,
//!    `after_game()` and `record_standings()`
//! 3. `progress_season()` after the postseason

pub mod progression;
pub mod recovery;
pub mod schedule;

pub use progression::{progress_season, rating_delta};
pub use recovery::{advance_day, after_game, record_standings};
pub use schedule::{generate_schedule, GAMES_PER_DAY};
