//! The thirty-club league table.
//!
//! Embedded at compile time; rosters are not part of the table and come
//! from whoever owns the league file.

use crate::models::{Division, League, ParkFactors, Team};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const CLUBS_JSON: &str = include_str!("clubs.json");

/// One row of the club table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub mlb_id: u32,
    pub city: String,
    pub name: String,
    pub abbreviation: String,
    pub stadium: String,
    pub league: League,
    pub division: Division,
    #[serde(default)]
    pub park_factors: ParkFactors,
}

static CLUBS: Lazy<Vec<Club>> = Lazy::new(|| {
    serde_json::from_str(CLUBS_JSON).unwrap_or_else(|err| {
        log::error!("embedded club table failed to parse ({err})");
        Vec::new()
    })
});

pub fn clubs() -> &'static [Club] {
    &CLUBS
}

pub fn club(id: &str) -> Option<&'static Club> {
    CLUBS.iter().find(|c| c.id == id)
}

impl Team {
    /// An empty-roster club with a clean record.
    pub fn from_club(club: &Club) -> Self {
        Self {
            id: club.id.clone(),
            mlb_id: club.mlb_id,
            city: club.city.clone(),
            name: club.name.clone(),
            abbreviation: club.abbreviation.clone(),
            stadium: club.stadium.clone(),
            league: club.league,
            division: club.division,
            park_factors: club.park_factors,
            roster: Vec::new(),
            wins: 0,
            losses: 0,
            runs_scored: 0,
            runs_allowed: 0,
        }
    }
}

/// Every club, AL East first, with empty rosters.
pub fn all_teams() -> Vec<Team> {
    CLUBS.iter().map(Team::from_club).collect()
}
