//! Between-game bookkeeping: rest, injuries, standings.

use crate::models::{GameResult, Injury, Team};

/// Most rest a pitcher can bank.
pub const MAX_DAYS_REST: i32 = 5;

/// One calendar day passes: pitchers bank a day of rest, injury clocks
/// tick down and expired injuries clear.
pub fn advance_day(teams: &mut [Team]) {
    for team in teams.iter_mut() {
        for p in team.roster.iter_mut() {
            if p.is_pitcher_eligible() {
                p.days_rest = (p.days_rest + 1).min(MAX_DAYS_REST);
            }
            if p.injury.is_injured {
                p.injury.days_remaining = p.injury.days_remaining.saturating_sub(1);
                if p.injury.days_remaining == 0 {
                    log::debug!("[{}] {} returns from {}", team.abbreviation, p.name, p.injury.injury_type);
                    p.injury = Injury::default();
                }
            }
        }
    }
}

/// Everyone who pitched in `result` starts over at zero days of rest.
pub fn after_game(team: &mut Team, result: &GameResult) {
    let Some(bs) = result.box_score.as_ref() else {
        return;
    };
    let pitched: Vec<&str> = bs.home_pitchers.iter().chain(bs.away_pitchers.iter()).map(|p| p.id.as_str()).collect();
    for p in team.roster.iter_mut().filter(|p| pitched.contains(&p.id.as_str())) {
        p.days_rest = 0;
    }
}

/// Adds a played game to both clubs' records.
pub fn record_standings(home: &mut Team, away: &mut Team, result: &GameResult) {
    if !result.played {
        return;
    }
    let home_won = result.home_won();
    if home_won {
        home.wins += 1;
        away.losses += 1;
    } else {
        away.wins += 1;
        home.losses += 1;
    }
    home.runs_scored += result.home_score;
    home.runs_allowed += result.away_score;
    away.runs_scored += result.away_score;
    away.runs_allowed += result.home_score;
}
