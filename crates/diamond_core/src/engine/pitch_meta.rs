//! Pitch type and speed selection.

use super::rng::SimRng;
use crate::models::Player;

#[derive(Debug, Clone, PartialEq)]
pub struct PitchChoice {
    pub pitch_type: String,
    pub speed_mph: f64,
}

impl PitchChoice {
    /// e.g. "95mph Four-Seam Fastball"
    pub fn description(&self) -> String {
        format!("{:.0}mph {}", self.speed_mph, self.pitch_type)
    }
}

/// Picks from the repertoire by usage, or from a generic four-pitch mix
/// built from velocity and stuff when the pitcher has no repertoire.
pub fn choose_pitch(pitcher: &Player, rng: &mut dyn SimRng) -> PitchChoice {
    let total_usage: f64 = pitcher.repertoire.iter().map(|p| p.usage.max(0.0)).sum();
    if total_usage > 0.0 {
        let roll = rng.range(0.0, total_usage);
        let mut acc = 0.0;
        for entry in &pitcher.repertoire {
            acc += entry.usage.max(0.0);
            if roll < acc {
                return PitchChoice {
                    pitch_type: entry.pitch_type.clone(),
                    speed_mph: entry.speed + rng.range(-1.25, 1.25),
                };
            }
        }
        if let Some(last) = pitcher.repertoire.last() {
            return PitchChoice { pitch_type: last.pitch_type.clone(), speed_mph: last.speed };
        }
    }

    let base = 87.0 + pitcher.attributes.velocity as f64 * 0.16;
    let r = rng.next_f64();
    let (pitch_type, speed) = if r < 0.50 {
        ("Four-Seam Fastball", base)
    } else if r < 0.70 {
        ("Changeup", base - 8.0)
    } else if r < 0.85 {
        ("Slider", base - 5.0)
    } else if pitcher.attributes.stuff >= 60 {
        ("Curveball", base - 10.0)
    } else {
        ("Sinker", base - 2.0)
    };
    PitchChoice { pitch_type: pitch_type.to_string(), speed_mph: speed + rng.range(-1.25, 1.25) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;
    use crate::fixtures;
    use crate::models::PitchRepertoireEntry;

    #[test]
    fn test_repertoire_by_usage() {
        let mut p = fixtures::pitcher("p1", 1, 80);
        p.repertoire = vec![
            PitchRepertoireEntry { pitch_type: "Sinker".into(), speed: 94.0, usage: 60.0 },
            PitchRepertoireEntry { pitch_type: "Sweeper".into(), speed: 84.0, usage: 40.0 },
        ];
        // roll 0.7 * 100 = 70 lands in the second bucket; jitter 0.5 -> 0
        let mut rng = ScriptedRng::sequence(vec![0.7, 0.5], 0.5);
        let pick = choose_pitch(&p, &mut rng);
        assert_eq!(pick.pitch_type, "Sweeper");
        assert!((pick.speed_mph - 84.0).abs() < 1e-9);
        assert_eq!(pick.description(), "84mph Sweeper");
    }

    #[test]
    fn test_fallback_mix_uses_velocity() {
        let mut p = fixtures::pitcher("p1", 1, 80);
        p.repertoire.clear();
        p.attributes.velocity = 50;
        let mut rng = ScriptedRng::sequence(vec![0.1, 0.5], 0.5);
        let pick = choose_pitch(&p, &mut rng);
        assert_eq!(pick.pitch_type, "Four-Seam Fastball");
        assert!((pick.speed_mph - 95.0).abs() < 1e-9);
    }
}
