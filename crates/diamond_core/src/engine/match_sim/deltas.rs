//! Counter deltas for one plate appearance.

use crate::engine::at_bat::{AtBatOutcome, PitchRecord};
use crate::models::{PitchOutcome, StatsCounters};

pub const HARD_HIT_EV: f64 = 95.0;
pub const BARREL_EV: f64 = 98.0;

/// Batter's counters for a finished plate appearance. Runs scored by the
/// batter are recorded separately when he crosses the plate.
pub fn batter_delta(outcome: &AtBatOutcome, pitches: &[PitchRecord], rbi: u32, bases_loaded: bool) -> StatsCounters {
    let mut d = StatsCounters { pa: 1, rbi, ..Default::default() };

    if outcome.is_at_bat() {
        d.ab = 1;
    }
    if outcome.is_hit() {
        d.h = 1;
        d.tb = outcome.total_bases();
    }

    match outcome {
        AtBatOutcome::Strikeout => d.so = 1,
        AtBatOutcome::Walk => d.bb = 1,
        AtBatOutcome::IntentionalWalk => {
            d.bb = 1;
            d.ibb = 1;
        }
        AtBatOutcome::HitByPitch => d.hbp = 1,
        AtBatOutcome::SacrificeBunt => d.sac = 1,
        AtBatOutcome::ReachedOnError { .. } => d.roe = 1,
        AtBatOutcome::Single { .. } => {}
        AtBatOutcome::Double { .. } => {
            d.d = 1;
            d.xbh = 1;
        }
        AtBatOutcome::Triple { .. } => {
            d.t = 1;
            d.xbh = 1;
        }
        AtBatOutcome::HomeRun { .. } => {
            d.hr = 1;
            d.xbh = 1;
            if bases_loaded {
                d.gsh = 1;
            }
        }
        AtBatOutcome::GroundOut { .. } | AtBatOutcome::FieldersChoice { .. } => d.groundouts = 1,
        AtBatOutcome::DoublePlay { .. } => {
            d.groundouts = 1;
            d.gidp = 1;
        }
        AtBatOutcome::FlyOut { .. } => d.flyouts = 1,
        AtBatOutcome::SacrificeFly { .. } => {
            d.flyouts = 1;
            d.sf = 1;
        }
    }

    if let Some((ev, la)) = outcome.batted_ball() {
        d.batted_ball_events = 1;
        d.total_exit_velo = ev;
        if ev >= HARD_HIT_EV {
            d.hard_hits = 1;
        }
        if ev >= BARREL_EV && (26.0..=30.0).contains(&la) {
            d.barrels = 1;
        }
    }

    for p in pitches {
        if p.outcome.is_swing() {
            d.swings += 1;
        }
        if p.outcome == PitchOutcome::StrikeSwinging {
            d.whiffs += 1;
        }
    }

    d
}

/// Pitcher's counters for a finished plate appearance, runs excluded.
pub fn pitcher_delta(outcome: &AtBatOutcome, pitches: &[PitchRecord]) -> StatsCounters {
    let mut d = StatsCounters {
        bf: 1,
        pitches_thrown: pitches.len() as u32,
        strikes: pitches.iter().filter(|p| p.outcome.is_called_or_whiff()).count() as u32,
        wp: pitches.iter().filter(|p| p.outcome == PitchOutcome::WildPitch).count() as u32,
        outs_pitched: outcome.outs() as u32,
        ..Default::default()
    };

    match outcome {
        AtBatOutcome::Strikeout => d.p_so = 1,
        AtBatOutcome::Walk => d.p_bb = 1,
        AtBatOutcome::IntentionalWalk => {
            d.p_bb = 1;
            d.p_ibb = 1;
        }
        AtBatOutcome::HitByPitch => d.p_hbp = 1,
        AtBatOutcome::HomeRun { .. } => {
            d.p_h = 1;
            d.p_hr = 1;
        }
        o if o.is_hit() => d.p_h = 1,
        _ => {}
    }

    d
}
