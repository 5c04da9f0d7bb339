//! Rounds: an announced target plus the weights reported against it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};

/// What players aim for in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "grams", rename_all = "snake_case")]
pub enum RoundTarget {
    /// One announced target shared by everyone (normal rounds).
    Shared(i32),
    /// Each player's privately declared empty-vessel estimate (final round).
    Individual(BTreeMap<PlayerId, i32>),
}

/// A round in progress or in the history. Immutable once scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub target: RoundTarget,
    /// Player id -> reported weight in grams.
    pub results: BTreeMap<PlayerId, i32>,
}

impl Round {
    pub fn shared(target: i32) -> Self {
        Self {
            target: RoundTarget::Shared(target),
            results: BTreeMap::new(),
        }
    }

    pub fn individual(targets: BTreeMap<PlayerId, i32>) -> Self {
        Self {
            target: RoundTarget::Individual(targets),
            results: BTreeMap::new(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self.target, RoundTarget::Individual(_))
    }

    /// Target that `id`'s result is measured against.
    pub fn effective_target(&self, id: &PlayerId) -> Option<i32> {
        match &self.target {
            RoundTarget::Shared(t) => Some(*t),
            RoundTarget::Individual(targets) => targets.get(id).copied(),
        }
    }

    pub fn result(&self, id: &PlayerId) -> Option<i32> {
        self.results.get(id).copied()
    }

    /// Record (or overwrite) a reported weight.
    pub fn record_result(&mut self, id: PlayerId, grams: i32) {
        self.results.insert(id, grams);
    }

    /// Active players without a recorded result, in roster order.
    pub fn missing_results<'a, I>(&self, active: I) -> Vec<PlayerId>
    where
        I: IntoIterator<Item = &'a Player>,
    {
        active
            .into_iter()
            .filter(|p| !self.results.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn is_complete<'a, I>(&self, active: I) -> bool
    where
        I: IntoIterator<Item = &'a Player>,
    {
        self.missing_results(active).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_target_follows_round_kind() {
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");

        let normal = Round::shared(600);
        assert!(!normal.is_final());
        assert_eq!(normal.effective_target(&a), Some(600));

        let mut targets = BTreeMap::new();
        targets.insert(a.clone(), 180);
        let fin = Round::individual(targets);
        assert!(fin.is_final());
        assert_eq!(fin.effective_target(&a), Some(180));
        assert_eq!(fin.effective_target(&b), None);
    }

    #[test]
    fn completeness_only_counts_given_players() {
        let roster = vec![Player::new("a", "A", 600), Player::new("b", "B", 600)];
        let mut r = Round::shared(550);
        r.record_result(PlayerId::new("a"), 548);
        assert_eq!(r.missing_results(&roster), vec![PlayerId::new("b")]);
        assert!(!r.is_complete(&roster));
        assert!(r.is_complete(&roster[..1]));

        r.record_result(PlayerId::new("b"), 560);
        r.record_result(PlayerId::new("b"), 561);
        assert!(r.is_complete(&roster));
        assert_eq!(r.result(&PlayerId::new("b")), Some(561));
    }
}
