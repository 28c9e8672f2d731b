//! In-game injury rolls.
//!
//! Every stat-recording event gives the involved player a small chance of
//! picking up an injury. The player finishes the game; the injury takes
//! effect from the next lineup or rotation decision.

use crate::engine::rng::SimRng;
use crate::models::{Injury, InjurySeverity, Player, Position};

const PITCHER_CHANCE: f64 = 0.0002;
const PLAYER_CHANCE: f64 = 0.0001;

pub const INJURY_TYPES: [&str; 7] = [
    "Hamstring Strain",
    "Shoulder Soreness",
    "Lower Back Tightness",
    "Elbow Inflammation",
    "Knee Sprain",
    "Quad Strain",
    "Oblique Strain",
];

/// Rolls for an injury. Players already injured are skipped.
pub fn roll_injury(player: &Player, rng: &mut dyn SimRng) -> Option<Injury> {
    if player.injury.is_injured {
        return None;
    }
    let chance = if player.position == Position::P { PITCHER_CHANCE } else { PLAYER_CHANCE };
    if !rng.chance(chance) {
        return None;
    }
    Some(draw_injury(rng))
}

/// Severity 70/25/5 (day-to-day / 10-day / 60-day) and a random type.
pub fn draw_injury(rng: &mut dyn SimRng) -> Injury {
    let r = rng.next_f64();
    let severity = if r < 0.70 {
        InjurySeverity::DayToDay
    } else if r < 0.95 {
        InjurySeverity::TenDayIl
    } else {
        InjurySeverity::SixtyDayIl
    };
    let injury_type = INJURY_TYPES[rng.index(INJURY_TYPES.len())].to_string();
    let days_remaining = match severity {
        InjurySeverity::DayToDay => 1 + rng.index(5),
        InjurySeverity::TenDayIl => 10 + rng.index(10),
        _ => 60 + rng.index(40),
    } as u32;
    Injury { is_injured: true, injury_type, days_remaining, severity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::{ScriptedRng, SeededRng};
    use crate::fixtures;

    #[test]
    fn test_severity_bands() {
        let mut rng = ScriptedRng::sequence(vec![0.5, 0.0, 0.99], 0.0);
        let inj = draw_injury(&mut rng);
        assert_eq!(inj.severity, InjurySeverity::DayToDay);
        assert_eq!(inj.injury_type, "Hamstring Strain");
        assert_eq!(inj.days_remaining, 5);

        let mut rng = ScriptedRng::sequence(vec![0.96, 0.99, 0.0], 0.0);
        let inj = draw_injury(&mut rng);
        assert_eq!(inj.severity, InjurySeverity::SixtyDayIl);
        assert_eq!(inj.injury_type, "Oblique Strain");
        assert_eq!(inj.days_remaining, 60);
    }

    #[test]
    fn test_days_always_in_band() {
        let mut rng = SeededRng::new(5);
        for _ in 0..1_000 {
            let inj = draw_injury(&mut rng);
            let range = match inj.severity {
                InjurySeverity::DayToDay => 1..=5,
                InjurySeverity::TenDayIl => 10..=19,
                _ => 60..=99,
            };
            assert!(range.contains(&inj.days_remaining));
        }
    }

    #[test]
    fn test_already_injured_is_skipped() {
        let mut p = fixtures::hitter("h", Position::LF, 60);
        p.injury.is_injured = true;
        assert!(roll_injury(&p, &mut ScriptedRng::constant(0.0)).is_none());
        p.injury.is_injured = false;
        assert!(roll_injury(&p, &mut ScriptedRng::constant(0.0)).is_some());
        assert!(roll_injury(&p, &mut ScriptedRng::constant(0.5)).is_none());
    }
}
