pub mod recorder;
pub mod types;

pub use recorder::*;
pub use types::*;
