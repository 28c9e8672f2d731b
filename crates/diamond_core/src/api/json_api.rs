use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::engine::{simulate_game, GameOptions};
use crate::error::{Result, SimError};
use crate::models::{GameResult, Team};
use crate::projection::{run_fast_sim, FastSimConfig, FastSimSummary};
use crate::season::generate_schedule;

pub const SCHEMA_VERSION: u8 = 1;

fn check_schema(found: u8) -> Result<()> {
    if found != SCHEMA_VERSION {
        warn!(found, expected = SCHEMA_VERSION, "rejecting request with unsupported schema version");
        return Err(SimError::SchemaVersion { found, expected: SCHEMA_VERSION });
    }
    Ok(())
}

/// Rating attributes must sit in 20-99 for every player.
fn validate_team(team: &Team) -> Result<()> {
    for p in &team.roster {
        p.attributes.validate()?;
    }
    Ok(())
}

// ============================================================================
// Single game
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub home: Team,
    pub away: Team,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_postseason: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub capture_replay: bool,
}

/// The finished game plus both clubs with their updated counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub result: GameResult,
    pub home: Team,
    pub away: Team,
}

pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let GameRequest { mut home, mut away, date, is_postseason, seed, capture_replay, .. } = request;
    validate_team(&home)?;
    validate_team(&away)?;

    let options = GameOptions { seed, capture_replay };
    debug!(home = %home.id, away = %away.id, %date, ?seed, "simulating game");
    let result = simulate_game(&mut home, &mut away, date, is_postseason, &options)?;
    info!(
        game = %result.id,
        home_score = result.home_score,
        away_score = result.away_score,
        innings = result.innings,
        "game complete"
    );

    let response = GameResponse { schema_version: SCHEMA_VERSION, result, home, away };
    Ok(serde_json::to_string(&response)?)
}

// ============================================================================
// Projection
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastSimRequest {
    pub schema_version: u8,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub schedule: Vec<GameResult>,
    #[serde(default)]
    pub config: FastSimConfig,
}

pub fn fast_sim_json(request_json: &str) -> Result<String> {
    let request: FastSimRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    for team in &request.teams {
        validate_team(team)?;
    }
    for game in &request.schedule {
        for id in [&game.home_team_id, &game.away_team_id] {
            if !request.teams.iter().any(|t| &t.id == id) {
                return Err(SimError::UnknownTeam(id.clone()));
            }
        }
    }

    debug!(
        teams = request.teams.len(),
        games = request.schedule.len(),
        simulations = request.config.simulations,
        "running projection"
    );
    let summary: FastSimSummary = run_fast_sim(&request.teams, &request.schedule, &request.config);
    info!(simulations = summary.simulations, "projection complete");
    Ok(serde_json::to_string(&summary)?)
}

// ============================================================================
// Schedule
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub schema_version: u8,
    pub teams: Vec<Team>,
    pub start: NaiveDate,
    #[serde(default)]
    pub seed: u64,
}

pub fn generate_schedule_json(request_json: &str) -> Result<String> {
    let request: ScheduleRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let schedule = generate_schedule(&request.teams, request.start, request.seed);
    info!(games = schedule.len(), start = %request.start, "schedule generated");
    Ok(serde_json::to_string(&schedule)?)
}
