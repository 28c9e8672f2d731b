//! Raw countable statistics.
//!
//! A `StatsCounters` value is never edited field by field outside this module.
//! The game engine builds a delta (`StatsCounters { bb: 1, ..Default::default() }`)
//! and replaces the old value with `old.apply(&delta)`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsCounters {
    // Offense
    pub ab: u32,
    pub h: u32,
    /// Doubles
    pub d: u32,
    /// Triples
    pub t: u32,
    pub hr: u32,
    /// Grand slams
    pub gsh: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hbp: u32,
    pub so: u32,
    pub rbi: u32,
    pub sb: u32,
    pub cs: u32,
    pub gidp: u32,
    pub sf: u32,
    pub sac: u32,
    pub r: u32,
    pub lob: u32,
    pub xbh: u32,
    pub tb: u32,
    /// Reached on error
    pub roe: u32,
    /// Walk-off plate appearances
    pub wo: u32,
    pub pa: u32,

    // Batted ball
    pub total_exit_velo: f64,
    pub batted_ball_events: u32,
    pub hard_hits: u32,
    pub barrels: u32,
    pub swings: u32,
    pub whiffs: u32,
    pub groundouts: u32,
    pub flyouts: u32,

    // Pitching
    pub outs_pitched: u32,
    pub er: u32,
    pub p_r: u32,
    pub p_h: u32,
    pub p_bb: u32,
    pub p_ibb: u32,
    pub p_hbp: u32,
    pub p_hr: u32,
    pub p_so: u32,
    pub wp: u32,
    pub bk: u32,
    pub pk: u32,
    pub bf: u32,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub holds: u32,
    pub blown_saves: u32,
    pub pitches_thrown: u32,
    pub strikes: u32,
    pub qs: u32,
    pub cg: u32,
    pub sho: u32,
    pub gf: u32,
    pub svo: u32,
    /// Inherited runners
    pub ir: u32,
    /// Inherited runners scored
    pub irs: u32,
    pub gs: u32,
    pub gp: u32,

    // Appearances
    pub g: u32,

    // Defense
    pub po: u32,
    pub a: u32,
    pub e: u32,
    pub dp: u32,
    pub chances: u32,
    /// Signed per-play fielding value, accumulated unclamped.
    pub oaa: f64,
    pub uzr: f64,
    pub drs: f64,
}

macro_rules! sum_counters {
    ($lhs:expr, $rhs:expr; $($field:ident),* $(,)?) => {
        StatsCounters {
            $($field: $lhs.$field + $rhs.$field),*
        }
    };
}

impl StatsCounters {
    /// Returns the counters that result from adding `delta` to `self`.
    pub fn apply(&self, delta: &StatsCounters) -> StatsCounters {
        sum_counters!(self, delta;
            ab, h, d, t, hr, gsh, bb, ibb, hbp, so, rbi, sb, cs, gidp, sf, sac, r, lob, xbh,
            tb, roe, wo, pa,
            total_exit_velo, batted_ball_events, hard_hits, barrels, swings, whiffs,
            groundouts, flyouts,
            outs_pitched, er, p_r, p_h, p_bb, p_ibb, p_hbp, p_hr, p_so, wp, bk, pk, bf, wins,
            losses, saves, holds, blown_saves, pitches_thrown, strikes, qs, cg, sho, gf, svo,
            ir, irs, gs, gp,
            g,
            po, a, e, dp, chances, oaa, uzr, drs,
        )
    }

    pub fn singles(&self) -> u32 {
        self.h.saturating_sub(self.d + self.t + self.hr)
    }

    pub fn unintentional_walks(&self) -> u32 {
        self.bb.saturating_sub(self.ibb)
    }

    pub fn innings_pitched(&self) -> f64 {
        self.outs_pitched as f64 / 3.0
    }

    pub fn is_empty(&self) -> bool {
        *self == StatsCounters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_adds_fieldwise_and_leaves_input_untouched() {
        let before = StatsCounters { ab: 3, h: 1, outs_pitched: 6, ..Default::default() };
        let delta = StatsCounters { ab: 1, h: 1, hr: 1, tb: 4, ..Default::default() };

        let after = before.apply(&delta);

        assert_eq!(after.ab, 4);
        assert_eq!(after.h, 2);
        assert_eq!(after.hr, 1);
        assert_eq!(after.tb, 4);
        assert_eq!(after.outs_pitched, 6);
        assert_eq!(before.ab, 3);
    }

    #[test]
    fn test_apply_default_is_identity() {
        let c = StatsCounters { bb: 2, ibb: 1, oaa: -0.25, ..Default::default() };
        assert_eq!(c.apply(&StatsCounters::default()), c);
    }

    #[test]
    fn test_derived_helpers() {
        let c = StatsCounters { h: 10, d: 2, t: 1, hr: 3, bb: 5, ibb: 2, outs_pitched: 20, ..Default::default() };
        assert_eq!(c.singles(), 4);
        assert_eq!(c.unintentional_walks(), 3);
        assert!((c.innings_pitched() - 6.6667).abs() < 1e-3);
        assert!(!c.is_empty());
        assert!(StatsCounters::default().is_empty());
    }
}
