pub mod counters;
pub mod events;
pub mod game_result;
pub mod player;
pub mod stats;
pub mod team;

pub use counters::StatsCounters;
pub use events::{EventKind, GameEvent, InjuryNote, PitchDetails, PitchOutcome};
pub use game_result::{BoxScore, BoxScorePlayer, GameResult, InningLine, LineScore};
pub use player::{
    HistoryEntry, Injury, InjurySeverity, PitchRepertoireEntry, Player, Position, Ratings,
    SeasonLine,
};
pub use stats::{BattingStats, DefenseStats, PitchingStats};
pub use team::{Division, League, ParkFactors, Team};
