//! Disqualification and the final-round trigger.

use serde::{Deserialize, Serialize};

/// Result of checking one player's weight against their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationCheck {
    pub eliminated: bool,
    /// `weight - target`, saturating; negative means the player drank past the target.
    pub distance: i32,
}

/// A player is out once they miss the target by more than `tolerance` grams,
/// in either direction.
pub fn check_elimination(weight: i32, target: i32, tolerance: u32) -> EliminationCheck {
    EliminationCheck {
        eliminated: weight.abs_diff(target) > tolerance,
        distance: weight.saturating_sub(target),
    }
}

pub fn is_eliminated(weight: i32, target: i32, tolerance: u32) -> bool {
    check_elimination(weight, target, tolerance).eliminated
}

/// True once any active weight falls strictly below `min_start_weight - drop`.
///
/// `drop` comes from the vessel preset (`VesselSize::final_round_drop`).
pub fn final_round_triggered(active_weights: &[i32], min_start_weight: i32, drop: i32) -> bool {
    let threshold = min_start_weight.saturating_sub(drop);
    active_weights.iter().any(|&w| w < threshold)
}
