//! Embedded league data.
//!
//! - `clubs.json`: the thirty clubs with stadiums and park factors
//! - `league_constants.yaml`: linear weights and league averages (read by
//!   `engine::config`)

pub mod teams;

pub use teams::{all_teams, club, clubs, Club};
