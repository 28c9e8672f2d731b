//! Probability functions for the at-bat resolver and the projection engine.
//!
//! All functions are pure: ratings in, probability out. Every result is
//! clamped to its documented range so callers never see a value outside
//! `[0, 1]`.

use crate::models::ParkFactors;

// ============================================================================
// Per-pitch constants
// ============================================================================

pub const HIT_BY_PITCH: f64 = 0.005;
pub const WILD_PITCH: f64 = 0.004;
pub const SWING_IN_ZONE: f64 = 0.78;
pub const FOUL_ON_CONTACT: f64 = 0.22;
pub const INTENTIONAL_WALK: f64 = 0.05;
pub const SACRIFICE_BUNT: f64 = 0.05;
pub const FLY_BALL_SHARE: f64 = 0.45;
pub const FIELDERS_CHOICE: f64 = 0.20;

// ============================================================================
// Pitch
// ============================================================================

pub fn strike_zone(control: f64) -> f64 {
    (0.46 + control * 0.0010).clamp(0.46, 0.56)
}

pub fn chase(eye: f64) -> f64 {
    (0.28 - eye * 0.003).max(0.0)
}

pub fn contact(contact: f64, stuff: f64) -> f64 {
    (0.82 + (contact - stuff) * 0.0022).clamp(0.55, 0.94)
}

// ============================================================================
// Ball in play
// ============================================================================

/// Share of balls in play that fall for hits.
pub fn hit(contact: f64, stuff: f64, fatigue: f64, contact_factor: f64, pitching_factor: f64, park: &ParkFactors) -> f64 {
    let mut p = 0.282 + (contact - stuff) * 0.0024 + fatigue * 0.010;

    let cf = contact_factor.min(1.20);
    for step in [1.05, 1.10, 1.15] {
        if cf > step {
            p += 0.006;
        }
    }

    if pitching_factor > 1.04 {
        p -= 0.005;
    }
    if pitching_factor > 1.08 {
        p -= 0.006;
    }
    if pitching_factor > 1.12 {
        p -= 0.005;
    }

    p *= 0.7 * park.run_ratio() + 0.3 * park.babip_ratio();
    p.clamp(0.165, 0.405)
}

/// Share of hits that leave the park.
pub fn home_run(power: f64, stuff: f64, power_factor: f64, park: &ParkFactors) -> f64 {
    let base = 0.040 + (power - stuff) * 0.0024;
    (base * power_factor.max(0.65).powf(2.8) * park.hr_ratio()).clamp(0.014, 0.56)
}

/// Share of non-homer hits that find a gap.
pub fn extra_base(power: f64, speed: f64, park: &ParkFactors) -> f64 {
    ((0.16 + power * 0.0022 + speed * 0.0012) * (0.8 + 0.2 * park.babip_ratio())).clamp(0.0, 1.0)
}

/// Share of gap hits that go for three.
pub fn triple_share(speed: f64) -> f64 {
    (0.045 + (speed - 50.0) * 0.0015).clamp(0.01, 0.15)
}

pub fn error(defense: f64) -> f64 {
    (0.015 - (defense - 50.0) * 0.0003).clamp(0.001, 1.0)
}

pub fn double_play(speed: f64) -> f64 {
    (0.15 - speed * 0.001).clamp(0.0, 1.0)
}

pub fn sacrifice_fly(contact: f64) -> f64 {
    (0.30 + contact * 0.001).clamp(0.0, 1.0)
}

/// Runner on second scoring on a single.
pub fn score_from_second(speed: f64) -> f64 {
    (0.52 + (speed - 50.0) * 0.004).clamp(0.38, 0.72)
}

// ============================================================================
// Baserunning
// ============================================================================

pub fn steal_attempt(speed: f64) -> f64 {
    ((speed - 45.0) * 0.008).clamp(0.0, 1.0)
}

pub fn steal_success(speed: f64, catcher_arm: f64) -> f64 {
    (0.75 + (speed - catcher_arm) * 0.005).clamp(0.3, 0.95)
}

// ============================================================================
// Projection
// ============================================================================

/// Home win probability from two overall strengths.
pub fn win_probability(home_strength: f64, away_strength: f64) -> f64 {
    let diff = home_strength - away_strength;
    let logistic = 1.0 / (1.0 + 10f64.powf(-diff / 12.0));
    (logistic + 0.035).clamp(0.2, 0.8)
}

/// Postseason games regress a quarter of the way toward a coin flip.
pub fn playoff_adjusted(p: f64) -> f64 {
    0.5 + (p - 0.5) * 0.75
}
