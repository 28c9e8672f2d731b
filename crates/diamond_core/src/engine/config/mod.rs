//! # Engine Configuration
//!
//! League constants live in `data/league_constants.yaml`, embedded at compile
//! time and parsed once on first use.
//!
//! ```rust
//! use diamond_core::engine::config::{league_constants, LeagueConstants};
//!
//! let k = league_constants();
//! assert_eq!(k.fip_constant, LeagueConstants::default().fip_constant);
//! ```

mod league_constants;

pub use league_constants::{LeagueConstants, LinearWeights, PositionalAdjustments};

use once_cell::sync::Lazy;

const LEAGUE_CONSTANTS_YAML: &str = include_str!("../../data/league_constants.yaml");

static LEAGUE_CONSTANTS: Lazy<LeagueConstants> = Lazy::new(|| {
    LeagueConstants::from_yaml_str(LEAGUE_CONSTANTS_YAML).unwrap_or_else(|err| {
        log::warn!("embedded league constants failed to parse ({err}); using defaults");
        LeagueConstants::default()
    })
});

/// The embedded league constants.
pub fn league_constants() -> &'static LeagueConstants {
    &LEAGUE_CONSTANTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_yaml_matches_defaults() {
        let parsed = LeagueConstants::from_yaml_str(LEAGUE_CONSTANTS_YAML).unwrap();
        assert_eq!(parsed, LeagueConstants::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let k = LeagueConstants::from_yaml_str("lg_era: 4.50\nweights:\n  hr: 2.0\n").unwrap();
        assert_eq!(k.lg_era, 4.50);
        assert_eq!(k.weights.hr, 2.0);
        assert_eq!(k.weights.single, 0.88);
        assert_eq!(k.fip_constant, 3.10);
        assert!((k.replacement_ra9() - 5.50).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = LeagueConstants::from_yaml_str("lg_era: [oops").unwrap_err();
        assert!(matches!(err, crate::SimError::Config(_)));
    }
}
