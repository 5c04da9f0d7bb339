//! wg-core: scoring rules, target ranges, elimination, session state, and configuration
//! for the weighing game.
//!
//! The scoring core (`summary`, `range`, `elimination`) is a set of pure functions over
//! plain data. `session` is the only module that mutates players or round history.

pub mod config;
pub mod elimination;
pub mod player;
pub mod range;
pub mod round;
pub mod session;
pub mod standings;
pub mod summary;

pub use config::{
    Config, ConfigError, EliminationConfig, GameConfig, RangeRules, ScoringRules, VesselSize,
};
pub use elimination::{check_elimination, final_round_triggered, is_eliminated, EliminationCheck};
pub use player::{Player, PlayerId};
pub use range::{compute_target_range, decide_target, TargetDecision, TargetRange};
pub use round::{Round, RoundTarget};
pub use session::{EliminationReport, Phase, RoundOutcome, Session, SessionError};
pub use standings::{average_distance, final_standings, Standing};
pub use summary::{
    summarize_round, DuplicateGroup, PenaltyAward, PenaltyReason, RoundSummary, SpecialHit,
    SummaryError,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod properties_tests;
#[cfg(test)]
mod range_tests;
