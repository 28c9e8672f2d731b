use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid roster for {team}: {reason}")]
    InvalidRoster { team: String, reason: String },

    #[error("Unknown team id: {0}")]
    UnknownTeam(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn invalid_roster(team: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidRoster { team: team.into(), reason: reason.into() }
    }

    /// Input-contract violations are not retried by callers.
    pub fn is_precondition(&self) -> bool {
        matches!(self, SimError::InvalidRoster { .. } | SimError::UnknownTeam(_))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
