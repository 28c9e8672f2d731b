pub mod at_bat; // Pitch and plate-appearance resolution
pub mod config; // League constants (embedded YAML)
pub mod match_sim;
pub mod performance; // History-driven performance factors, fatigue
pub mod pitch_meta;
pub mod probability;
pub mod rng;
pub mod stats; // Derived batting/pitching/defense statistics

pub use at_bat::{resolve_plate_appearance, AtBatOutcome, Bases, PlateAppearance};
pub use match_sim::{simulate_game, GameEngine, GameOptions};
pub use rng::{SeededRng, SimRng};
