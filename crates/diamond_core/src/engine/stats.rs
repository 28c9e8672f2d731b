//! Statistics engine
//!
//! Derived stat blocks are pure functions of a player's counters, position
//! and the league constants. Recomputing is idempotent.

use super::config::LeagueConstants;
use super::rng::SimRng;
use crate::models::{BattingStats, DefenseStats, PitchingStats, Player, Position, StatsCounters};

#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Keeps only `factor` of the excess beyond `[low, high]`.
fn compress(value: f64, low: f64, high: f64, factor: f64) -> f64 {
    if value > high {
        high + (value - high) * factor
    } else if value < low {
        low + (value - low) * factor
    } else {
        value
    }
}

// ============================================================================
// Batting
// ============================================================================

pub fn plate_appearances(c: &StatsCounters) -> u32 {
    c.ab + c.bb + c.hbp + c.sf + c.sac
}

pub fn derive_batting(c: &StatsCounters, position: Position, fielding_runs: f64, k: &LeagueConstants) -> BattingStats {
    let pa = plate_appearances(c);
    let pa_f = pa as f64;
    let ab = c.ab as f64;

    let avg = ratio(c.h as f64, ab);
    let slg = ratio(c.tb as f64, ab);
    let obp = ratio((c.h + c.bb + c.hbp) as f64, (c.ab + c.bb + c.hbp + c.sf) as f64);
    let balls_in_play = c.ab as f64 - c.so as f64 - c.hr as f64 + c.sf as f64;
    let babip = ratio(c.h.saturating_sub(c.hr) as f64, balls_in_play);

    let mut b = BattingStats {
        games: c.g,
        pa,
        avg,
        obp,
        slg,
        ops: obp + slg,
        iso: if c.ab > 0 { slg - avg } else { 0.0 },
        babip,
        hr: c.hr,
        rbi: c.rbi,
        sb: c.sb,
        ibb: c.ibb,
        exit_velocity: ratio(c.total_exit_velo, c.batted_ball_events as f64),
        hard_hit_pct: ratio(c.hard_hits as f64, c.batted_ball_events as f64),
        barrel_pct: ratio(c.barrels as f64, c.batted_ball_events as f64),
        whiff_pct: ratio(c.whiffs as f64, c.swings as f64),
        ..Default::default()
    };

    if pa == 0 {
        return b;
    }

    let w = &k.weights;
    let ubb = c.unintentional_walks() as f64;
    b.woba = (w.ubb * ubb
        + w.hbp * c.hbp as f64
        + w.single * c.singles() as f64
        + w.double * c.d as f64
        + w.triple * c.t as f64
        + w.hr * c.hr as f64)
        / pa_f;
    b.bb_pct = ubb / pa_f;
    b.k_pct = c.so as f64 / pa_f;

    let wraa = (b.woba - k.lg_woba) / k.woba_scale * pa_f;
    let lg_wrc = k.lg_r_per_pa * pa_f;
    let raw_wrc_plus = ratio((wraa + lg_wrc) * 100.0, lg_wrc);
    b.wrc_plus = compress(
        raw_wrc_plus,
        k.wrc_plus_compress_low,
        k.wrc_plus_compress_high,
        k.wrc_plus_compress_factor,
    );

    let baserunning = 0.2 * c.sb as f64 - 0.4 * c.cs as f64;
    let share = pa_f / 600.0;
    let positional = k.positional.for_position(position) * share;
    let replacement = k.replacement_runs_per_600 * share;
    let raw_war = (wraa + baserunning + fielding_runs + positional + replacement) / k.batter_runs_per_win;
    b.war = compress(raw_war, k.war_regress_low, k.war_regress_high, k.war_regress_factor);

    b
}

// ============================================================================
// Pitching
// ============================================================================

pub fn derive_pitching(c: &StatsCounters, k: &LeagueConstants) -> PitchingStats {
    let ip = c.innings_pitched();
    let mut p = PitchingStats {
        games: c.gp,
        games_started: c.gs,
        wins: c.wins,
        losses: c.losses,
        saves: c.saves,
        holds: c.holds,
        blown_saves: c.blown_saves,
        ip,
        so: c.p_so,
        bb: c.p_bb,
        ibb: c.p_ibb,
        pitches_thrown: c.pitches_thrown,
        csw_pct: ratio(c.strikes as f64, c.pitches_thrown as f64),
        ..Default::default()
    };

    if c.outs_pitched == 0 {
        return p;
    }

    p.era = c.er as f64 * 9.0 / ip;
    p.whip = (c.p_bb + c.p_h) as f64 / ip;
    p.k9 = c.p_so as f64 * 9.0 / ip;
    p.bb9 = c.p_bb as f64 * 9.0 / ip;
    p.hr9 = c.p_hr as f64 * 9.0 / ip;
    p.fip = (13.0 * c.p_hr as f64 + 3.0 * (c.p_bb + c.p_hbp) as f64 - 2.0 * c.p_so as f64) / ip + k.fip_constant;
    p.war = (k.replacement_ra9() - p.fip) * (ip / 9.0) / k.pitcher_runs_per_win;
    p
}

// ============================================================================
// Defense
// ============================================================================

pub fn derive_defense(c: &StatsCounters) -> DefenseStats {
    DefenseStats {
        po: c.po,
        a: c.a,
        e: c.e,
        dp: c.dp,
        chances: c.chances,
        fpct: ratio((c.po + c.a) as f64, c.chances as f64),
        oaa: c.oaa.clamp(-18.0, 22.0),
        uzr: c.uzr.clamp(-15.0, 18.0),
        drs: c.drs.clamp(-15.0, 20.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldingPlay {
    PutOut,
    Assist,
    Error,
}

/// Counter delta for one fielding chance, including its signed value.
pub fn fielding_delta(fielder: &Player, play: FieldingPlay, rng: &mut dyn SimRng) -> StatsCounters {
    let a = &fielder.attributes;
    let combined = a.defense as f64 * 0.6 + a.reaction as f64 * 0.4;
    let difficulty = rng.range(0.5, 0.9);
    let expected = (0.65 + (combined - 50.0) * 0.006).clamp(0.40, 0.95);

    let oaa = match play {
        FieldingPlay::Error => -0.12 * difficulty,
        _ => ((1.0 - difficulty) - (1.0 - expected)) * 0.06,
    };

    StatsCounters {
        chances: 1,
        po: (play == FieldingPlay::PutOut) as u32,
        a: (play == FieldingPlay::Assist) as u32,
        e: (play == FieldingPlay::Error) as u32,
        oaa,
        drs: oaa * 0.88,
        uzr: oaa * 0.76,
        ..Default::default()
    }
}

/// Recomputes all three derived blocks from the player's counters.
pub fn refresh_player(player: &mut Player, k: &LeagueConstants) {
    player.defense = derive_defense(&player.counters);
    player.batting = derive_batting(&player.counters, player.position, player.defense.drs, k);
    player.pitching = derive_pitching(&player.counters, k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;
    use crate::fixtures;

    fn k() -> LeagueConstants {
        LeagueConstants::default()
    }

    #[test]
    fn test_empty_counters_derive_zeros() {
        let c = StatsCounters::default();
        let b = derive_batting(&c, Position::SS, 0.0, &k());
        assert_eq!(b, BattingStats::default());
        let p = derive_pitching(&c, &k());
        assert_eq!(p, PitchingStats::default());
        assert_eq!(derive_defense(&c).fpct, 0.0);
    }

    #[test]
    fn test_batting_line() {
        // 3-for-4 with a double and a homer, one walk
        let c = StatsCounters { ab: 4, h: 3, d: 1, hr: 1, tb: 7, bb: 1, so: 1, ..Default::default() };
        let b = derive_batting(&c, Position::CF, 0.0, &k());
        assert_eq!(b.pa, 5);
        assert!((b.avg - 0.75).abs() < 1e-12);
        assert!((b.slg - 1.75).abs() < 1e-12);
        assert!((b.obp - 0.8).abs() < 1e-12);
        assert!((b.iso - 1.0).abs() < 1e-12);
        // (H - HR) / (AB - SO - HR + SF) = 2 / 2
        assert!((b.babip - 1.0).abs() < 1e-12);
        let expected_woba = (0.69 + 0.88 + 1.27 + 2.10) / 5.0;
        assert!((b.woba - expected_woba).abs() < 1e-12);
        assert!((b.bb_pct - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_obp_does_not_double_count_intentional_walks() {
        let c = StatsCounters { ab: 2, h: 1, bb: 2, ibb: 1, ..Default::default() };
        let b = derive_batting(&c, Position::FirstBase, 0.0, &k());
        assert!((b.obp - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_wrc_plus_compression() {
        // league-average wOBA scores exactly 100
        let mut k = k();
        k.weights.single = k.lg_woba;
        let c = StatsCounters { ab: 10, h: 10, tb: 10, ..Default::default() };
        let b = derive_batting(&c, Position::DH, 0.0, &k);
        assert!((b.wrc_plus - 100.0).abs() < 1e-9);

        assert!((compress(160.0, 60.0, 140.0, 0.7) - 154.0).abs() < 1e-9);
        assert!((compress(40.0, 60.0, 140.0, 0.7) - 46.0).abs() < 1e-9);
        assert_eq!(compress(100.0, 60.0, 140.0, 0.7), 100.0);
    }

    #[test]
    fn test_pitching_line() {
        // 6 IP, 2 ER, 7 K, 2 BB, 1 HR, 5 H
        let c = StatsCounters {
            outs_pitched: 18,
            er: 2,
            p_so: 7,
            p_bb: 2,
            p_hr: 1,
            p_h: 5,
            pitches_thrown: 100,
            strikes: 30,
            ..Default::default()
        };
        let p = derive_pitching(&c, &k());
        assert!((p.ip - 6.0).abs() < 1e-12);
        assert!((p.era - 3.0).abs() < 1e-12);
        assert!((p.whip - 7.0 / 6.0).abs() < 1e-12);
        assert!((p.k9 - 10.5).abs() < 1e-12);
        let fip = (13.0 + 6.0 - 14.0) / 6.0 + 3.10;
        assert!((p.fip - fip).abs() < 1e-12);
        assert!((p.war - (5.20 - fip) * (6.0 / 9.0) / 10.0).abs() < 1e-12);
        assert!((p.csw_pct - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_defense_clamps() {
        let c = StatsCounters { po: 9, a: 0, e: 1, chances: 10, oaa: 40.0, uzr: -30.0, drs: 25.0, ..Default::default() };
        let d = derive_defense(&c);
        assert!((d.fpct - 0.9).abs() < 1e-12);
        assert_eq!(d.oaa, 22.0);
        assert_eq!(d.uzr, -15.0);
        assert_eq!(d.drs, 20.0);
    }

    #[test]
    fn test_fielding_delta_signs() {
        let fielder = fixtures::hitter("f", Position::SS, 70);
        let mut rng = ScriptedRng::constant(0.5);
        let err = fielding_delta(&fielder, FieldingPlay::Error, &mut rng);
        assert_eq!((err.e, err.chances), (1, 1));
        assert!((err.oaa - (-0.12 * 0.7)).abs() < 1e-12);
        assert!((err.drs - err.oaa * 0.88).abs() < 1e-12);

        let po = fielding_delta(&fielder, FieldingPlay::PutOut, &mut rng);
        assert_eq!(po.po, 1);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut p = fixtures::hitter("h", Position::C, 65);
        p.counters = StatsCounters { g: 3, ab: 11, h: 4, d: 1, tb: 5, bb: 2, so: 3, sb: 1, po: 20, chances: 20, drs: 0.4, ..Default::default() };
        refresh_player(&mut p, &k());
        let once = p.clone();
        refresh_player(&mut p, &k());
        assert_eq!(p, once);
        assert_eq!(p.batting.games, 3);
    }
}
