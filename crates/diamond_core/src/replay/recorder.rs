//! ReplayRecorder - collects replay events while a game is simulated.
//!
//! Trajectories draw from their own RNG stream (seeded from the game seed),
//! so turning capture on or off never changes the game itself.

use super::types::*;
use crate::engine::at_bat::AtBatOutcome;
use crate::engine::rng::{SeededRng, SimRng};
use crate::models::{PitchOutcome, Position};
use nalgebra::Vector3;

/// Mixed into the game seed for the trajectory stream.
const TRAJECTORY_STREAM: u64 = 0x5EED_BA11_0F_D1A0;

/// Mound-to-plate distance in feet.
const MOUND_DISTANCE: f64 = 60.5;
const PATH_POINTS: usize = 5;

#[derive(Debug)]
pub struct ReplayRecorder {
    seed: u64,
    rng: SeededRng,
    pub events: Vec<ReplayEvent>,
}

impl ReplayRecorder {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: SeededRng::new(seed ^ TRAJECTORY_STREAM), events: Vec::with_capacity(400) }
    }

    // ========================================
    // Pitches
    // ========================================

    #[allow(clippy::too_many_arguments)]
    pub fn record_pitch(
        &mut self,
        inning: u32,
        is_top: bool,
        batter_id: &str,
        pitcher_id: &str,
        pitch_number: u32,
        count_before: Count,
        count_after: Count,
        result: PitchOutcome,
        pitch_type: &str,
        speed_mph: f64,
        runners: ReplayRunners,
    ) {
        let release = Vector3::new(self.rng.range(-2.5, 2.5), MOUND_DISTANCE - 5.5, self.rng.range(5.5, 6.5));
        let plate = match result {
            PitchOutcome::Ball | PitchOutcome::WildPitch | PitchOutcome::HitByPitch => {
                Vector3::new(self.rng.range(-1.8, 1.8), 0.0, self.rng.range(0.5, 4.5))
            }
            _ => Vector3::new(self.rng.range(-0.8, 0.8), 0.0, self.rng.range(1.6, 3.4)),
        };
        let path = ball_path(&release, &plate, speed_mph);

        self.events.push(ReplayEvent::Pitch(PitchEvent {
            inning,
            is_top,
            batter_id: batter_id.to_string(),
            pitcher_id: pitcher_id.to_string(),
            pitch_number,
            count_before,
            count_after,
            result,
            pitch_type: pitch_type.to_string(),
            speed_mph,
            release,
            plate,
            path,
            runners,
            hit_location: None,
        }));
    }

    /// Attaches a landing spot to the last recorded pitch.
    pub fn record_hit_location(&mut self, outcome: &AtBatOutcome) {
        let Some((exit_velocity, launch_angle)) = outcome.batted_ball() else {
            return;
        };
        let spray = match outcome.fielder() {
            Some(pos) => spray_angle(pos) + self.rng.range(-8.0, 8.0),
            None => self.rng.range(-45.0, 45.0),
        };
        let distance = carry_distance(exit_velocity, launch_angle);
        let rad = spray.to_radians();
        let location = Vector3::new(distance * rad.sin(), distance * rad.cos(), 0.0);

        if let Some(ReplayEvent::Pitch(p)) = self.events.last_mut() {
            p.hit_location = Some(location);
        }
    }

    // ========================================
    // Actions
    // ========================================

    pub fn record_substitution(
        &mut self,
        inning: u32,
        is_top: bool,
        team_id: &str,
        player_in: &str,
        player_out: Option<&str>,
        role: &str,
    ) {
        self.events.push(ReplayEvent::Substitution {
            inning,
            is_top,
            team_id: team_id.to_string(),
            player_in: player_in.to_string(),
            player_out: player_out.map(str::to_string),
            role: role.to_string(),
        });
    }

    pub fn record_plate_appearance(
        &mut self,
        inning: u32,
        is_top: bool,
        batter_id: &str,
        pitcher_id: &str,
        outcome: &AtBatOutcome,
        outs_after: u8,
    ) {
        self.events.push(ReplayEvent::PlateAppearance {
            inning,
            is_top,
            batter_id: batter_id.to_string(),
            pitcher_id: pitcher_id.to_string(),
            outcome: outcome.code().to_string(),
            outs_after,
        });
    }

    pub fn record_score(&mut self, inning: u32, is_top: bool, runner_id: &str, away_score: u32, home_score: u32) {
        self.events.push(ReplayEvent::Score {
            inning,
            is_top,
            runner_id: runner_id.to_string(),
            away_score,
            home_score,
        });
    }

    pub fn finish(self) -> GameReplay {
        GameReplay { schema: REPLAY_SCHEMA.to_string(), seed: self.seed, events: self.events }
    }
}

/// Straight line with a gravity sag scaled by flight time.
fn ball_path(release: &FieldPoint, plate: &FieldPoint, speed_mph: f64) -> Vec<FieldPoint> {
    let feet_per_sec = (speed_mph.max(40.0) * 5280.0) / 3600.0;
    let flight = (release.y - plate.y) / feet_per_sec;
    let sag = 16.1 * flight * flight;
    (0..PATH_POINTS)
        .map(|i| {
            let t = i as f64 / (PATH_POINTS - 1) as f64;
            let mut point = release.lerp(plate, t);
            point.z -= sag * t * (1.0 - t);
            point
        })
        .collect()
}

/// Degrees from straightaway center, negative toward left field.
fn spray_angle(pos: Position) -> f64 {
    match pos {
        Position::LF => -30.0,
        Position::ThirdBase => -35.0,
        Position::SS => -15.0,
        Position::CF | Position::P | Position::C | Position::DH => 0.0,
        Position::SecondBase => 15.0,
        Position::RF => 30.0,
        Position::FirstBase => 35.0,
    }
}

fn carry_distance(exit_velocity: f64, launch_angle: f64) -> f64 {
    let la = launch_angle.clamp(-10.0, 50.0);
    let carry = if la <= 0.0 { 0.6 } else { 1.0 + (2.0 * la.to_radians()).sin() * 2.2 };
    (exit_velocity * carry * 1.3).clamp(20.0, 470.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_starts_at_release_and_ends_at_plate() {
        let release = Vector3::new(1.0, 55.0, 6.0);
        let plate = Vector3::new(0.0, 0.0, 2.5);
        let path = ball_path(&release, &plate, 95.0);
        assert_eq!(path.len(), PATH_POINTS);
        assert!((path[0] - release).norm() < 1e-9);
        assert!((path[PATH_POINTS - 1] - plate).norm() < 1e-9);
        assert!(path[2].z < release.lerp(&plate, 0.5).z);
    }

    #[test]
    fn test_recorder_is_reproducible() {
        let record = || {
            let mut rec = ReplayRecorder::new(99);
            rec.record_pitch(
                1,
                true,
                "b",
                "p",
                1,
                Count::default(),
                Count { balls: 1, strikes: 0 },
                PitchOutcome::Ball,
                "Slider",
                86.0,
                ReplayRunners::default(),
            );
            rec.finish()
        };
        let a = record();
        assert_eq!(a, record());
        assert_eq!(a.schema, REPLAY_SCHEMA);
        assert_eq!(a.pitch_count(), 1);
    }

    #[test]
    fn test_home_run_lands_deep() {
        assert!(carry_distance(110.0, 28.0) > 350.0);
        assert!(carry_distance(80.0, -5.0) < 100.0);
    }
}
