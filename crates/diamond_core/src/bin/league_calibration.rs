// League-wide rate check over a slice of a generated season.
// Run with: cargo run --bin league_calibration --release -- [days] [seed]
//
// Prints batting and pitching rates for the whole league so the engine can
// be compared against real league averages.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use diamond_core::data::all_teams;
use diamond_core::engine::config::league_constants;
use diamond_core::engine::stats::{derive_batting, derive_pitching};
use diamond_core::fixtures;
use diamond_core::models::{Position, StatsCounters, Team};
use diamond_core::{advance_day, after_game, generate_schedule, record_standings, simulate_game, GameOptions};

fn parse_arg<T: std::str::FromStr>(args: &[String], idx: usize, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match args.get(idx) {
        Some(raw) => raw.parse::<T>().map_err(|e| anyhow::anyhow!("argument {idx} ({raw}): {e}")),
        None => Ok(default),
    }
}

fn pair_mut(teams: &mut [Team], h: usize, a: usize) -> (&mut Team, &mut Team) {
    if h < a {
        let (left, right) = teams.split_at_mut(a);
        (&mut left[h], &mut right[0])
    } else {
        let (left, right) = teams.split_at_mut(h);
        (&mut right[0], &mut left[a])
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let days: usize = parse_arg(&args, 1, 30)?;
    let seed: u64 = parse_arg(&args, 2, 2025)?;
    if days == 0 {
        bail!("days must be at least 1");
    }

    let start = NaiveDate::from_ymd_opt(2025, 3, 27).context("bad opening day")?;
    let mut teams: Vec<Team> = all_teams()
        .into_iter()
        .map(|mut t| {
            t.roster = fixtures::team(&t.id).roster;
            t
        })
        .collect();
    let schedule = generate_schedule(&teams, start, seed);

    println!("=== League calibration: {days} days, seed {seed} ===");
    let mut games = 0u32;
    let mut innings = 0u32;
    let mut current_day = start;
    for (n, slot) in schedule.iter().enumerate() {
        if slot.date >= start + chrono::Days::new(days as u64) {
            break;
        }
        if slot.date != current_day {
            advance_day(&mut teams);
            current_day = slot.date;
        }
        let h = teams.iter().position(|t| t.id == slot.home_team_id).context("home club missing")?;
        let a = teams.iter().position(|t| t.id == slot.away_team_id).context("away club missing")?;
        let (home, away) = pair_mut(&mut teams, h, a);
        let options = GameOptions::seeded(seed.wrapping_add(n as u64));
        let result = simulate_game(home, away, slot.date, false, &options)
            .with_context(|| format!("game {} ({} @ {})", slot.id, slot.away_team_id, slot.home_team_id))?;
        record_standings(home, away, &result);
        after_game(home, &result);
        after_game(away, &result);
        games += 1;
        innings += result.innings;
    }

    let total = teams
        .iter()
        .flat_map(|t| t.roster.iter())
        .fold(StatsCounters::default(), |acc, p| acc.apply(&p.counters));
    let k = league_constants();
    let bat = derive_batting(&total, Position::DH, 0.0, k);
    let pit = derive_pitching(&total, k);
    let runs: u32 = teams.iter().map(|t| t.runs_scored).sum();

    println!("games        {games}");
    println!("innings/g    {:.2}", innings as f64 / games.max(1) as f64);
    println!("runs/team/g  {:.2}", runs as f64 / (2 * games).max(1) as f64);
    println!("AVG/OBP/SLG  {:.3}/{:.3}/{:.3}", bat.avg, bat.obp, bat.slg);
    println!("K%  BB%      {:.1}  {:.1}", bat.k_pct, bat.bb_pct);
    println!("HR/PA        {:.3}", total.hr as f64 / bat.pa.max(1) as f64);
    println!("BABIP        {:.3}", bat.babip);
    println!("ERA  WHIP    {:.2}  {:.2}", pit.era, pit.whip);
    println!("P/PA         {:.2}", total.pitches_thrown as f64 / total.bf.max(1) as f64);
    println!("SB  CS       {}  {}", total.sb, total.cs);

    let mut standings: Vec<&Team> = teams.iter().collect();
    standings.sort_by(|x, y| y.wins.cmp(&x.wins).then(x.losses.cmp(&y.losses)));
    println!("--- best records ---");
    for t in standings.iter().take(5) {
        println!("{:<4} {:>3}-{:<3} RS {:>4} RA {:>4}", t.abbreviation, t.wins, t.losses, t.runs_scored, t.runs_allowed);
    }
    Ok(())
}
