//! Legal band for the next announced target, and the auto-target fallback.
//!
//! The next target must be at least `below_lowest` grams under the lightest
//! current weight and at most `below_highest` grams under the heaviest one.
//! Once weights spread too far apart no single target satisfies both, and
//! `decide_target` assigns one instead of taking player input.

use serde::{Deserialize, Serialize};

use crate::config::RangeRules;

/// Inclusive `[min, max]` band in grams. May be inverted (`min > max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: i32,
    pub max: i32,
}

impl TargetRange {
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// False for every target when the band is inverted.
    pub fn contains(&self, target: i32) -> bool {
        self.min <= target && target <= self.max
    }
}

/// How the next target is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetDecision {
    /// Players announce any target inside the band.
    Free { range: TargetRange },
    /// Weights diverged: the target is fixed at `target`.
    AutoAssigned { target: i32, spread: i32 },
}

impl TargetDecision {
    pub fn auto_target(&self) -> Option<i32> {
        match self {
            TargetDecision::Free { .. } => None,
            TargetDecision::AutoAssigned { target, .. } => Some(*target),
        }
    }
}

/// Band for the next target given the active players' most recent weights
/// (start weights before round 1).
///
/// Bounds are clamped at zero and never overflow. Empty input gives `{0, 0}`. The result is not
/// validated; see `decide_target`.
pub fn compute_target_range(weights: &[i32], rules: &RangeRules) -> TargetRange {
    let (Some(&lowest), Some(&highest)) = (weights.iter().min(), weights.iter().max()) else {
        return TargetRange { min: 0, max: 0 };
    };
    TargetRange {
        min: highest.saturating_sub(rules.below_highest).max(0),
        max: lowest.saturating_sub(rules.below_lowest).max(0),
    }
}

/// Spread policy on top of `compute_target_range`.
///
/// Auto-assigns `lowest - below_lowest` when `highest - lowest` reaches
/// `auto_target_spread`, or when the band comes out inverted under a custom
/// rule set.
pub fn decide_target(weights: &[i32], rules: &RangeRules) -> TargetDecision {
    let range = compute_target_range(weights, rules);
    let (Some(&lowest), Some(&highest)) = (weights.iter().min(), weights.iter().max()) else {
        return TargetDecision::Free { range };
    };
    let spread = highest.saturating_sub(lowest);
    if spread >= rules.auto_target_spread || range.is_inverted() {
        TargetDecision::AutoAssigned {
            target: range.max,
            spread,
        }
    } else {
        TargetDecision::Free { range }
    }
}
