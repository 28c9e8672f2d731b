//! End-of-season progression.
//!
//! Peak years are 26-29. Younger players drift up, older players drift
//! down, with an extra point off past 33.

use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{BattingStats, DefenseStats, HistoryEntry, PitchingStats, Player, SeasonLine, StatsCounters, Team};

/// Rating change for a player who has just turned `age`.
pub fn rating_delta(age: u32, rng: &mut dyn SimRng) -> i32 {
    if age < 26 {
        (rng.next_f64() * 2.0).round() as i32
    } else if age > 29 {
        let mut change = -((rng.next_f64() * 3.0).round() as i32);
        if age > 33 {
            change -= 1;
        }
        change
    } else {
        (rng.next_f64() * 2.0).round() as i32 - 1
    }
}

/// Closes the season for every club: records reset, players age a year,
/// ratings drift, the finished season is archived and counters are zeroed.
pub fn progress_season(teams: &mut [Team], season_label: &str, seed: u64) {
    let mut rng = SeededRng::new(seed);
    for team in teams.iter_mut() {
        team.reset_record();
        let team_id = team.id.clone();
        for player in team.roster.iter_mut() {
            progress_player(player, &team_id, season_label, &mut rng);
        }
    }
    log::info!("progressed {} clubs past season {}", teams.len(), season_label);
}

fn progress_player(player: &mut Player, team_id: &str, season_label: &str, rng: &mut dyn SimRng) {
    player.history.push(HistoryEntry {
        year: season_label.to_string(),
        team: team_id.to_string(),
        stats: season_line(player),
    });

    player.age += 1;
    let change = rating_delta(player.age, rng);
    player.rating = (player.rating as i32 + change).clamp(40, 99) as u8;
    player.potential = player.rating;
    if change != 0 {
        player.attributes = player.attributes.shifted(change);
    }

    player.counters = StatsCounters::default();
    player.batting = BattingStats::default();
    player.pitching = PitchingStats::default();
    player.defense = DefenseStats::default();
}

/// The derived blocks condensed into one archived line. Batting fields are
/// present only with a plate appearance, pitching fields only with an out.
fn season_line(player: &Player) -> SeasonLine {
    let c = &player.counters;
    let b = &player.batting;
    let p = &player.pitching;
    let mut line = SeasonLine { games: c.g, ..Default::default() };

    if b.pa > 0 {
        line.pa = Some(b.pa);
        line.hr = Some(c.hr);
        line.rbi = Some(c.rbi);
        line.sb = Some(c.sb);
        line.avg = Some(b.avg);
        line.obp = Some(b.obp);
        line.slg = Some(b.slg);
        line.ops = Some(b.ops);
    }
    if c.outs_pitched > 0 {
        line.starts = Some(c.gs);
        line.wins = Some(c.wins);
        line.losses = Some(c.losses);
        line.saves = Some(c.saves);
        line.ip = Some(p.ip);
        line.era = Some(p.era);
        line.so = Some(c.p_so);
        line.bb = Some(c.p_bb);
        line.whip = Some(p.whip);
        line.k9 = Some(p.k9);
        line.fip = Some(p.fip);
    }
    line
}
