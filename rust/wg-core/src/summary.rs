//! Round scoring: who pays a Schnaps after a round, and why.
//!
//! `summarize_round` is pure. It never mutates the roster; the caller applies
//! the returned awards (one `penalty_count += 1` per award).
//!
//! Categories:
//! - furthest from target (all ties), every round
//! - exact hit (distance 0), every round
//! - special number (raw weight on the allow-list), normal rounds only by default
//! - duplicate weight (two or more identical raw weights), normal rounds only by default

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScoringRules;
use crate::player::{Player, PlayerId};
use crate::round::Round;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("no result recorded for active player {player_id}")]
    MissingResult { player_id: PlayerId },
    #[error("no individual target declared for player {player_id}")]
    MissingTarget { player_id: PlayerId },
}

/// Why a penalty point was awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyReason {
    Furthest,
    ExactHit,
    SpecialNumber,
    DuplicateWeight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyAward {
    pub player_id: PlayerId,
    pub reason: PenaltyReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialHit {
    pub player_id: PlayerId,
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub weight: i32,
    /// Roster order.
    pub player_ids: Vec<PlayerId>,
}

/// Outcome of one scored round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub is_final: bool,
    /// `None` only when nobody was scored.
    pub max_distance: Option<u32>,
    pub furthest_player_ids: BTreeSet<PlayerId>,
    pub exact_hit_ids: BTreeSet<PlayerId>,
    pub special_number_hits: Vec<SpecialHit>,
    /// Sorted by weight ascending.
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Every point awarded this round, grouped by category.
    pub awards: Vec<PenaltyAward>,
    pub penalized_player_ids: BTreeSet<PlayerId>,
}

impl RoundSummary {
    /// Points `id` earns from this round.
    pub fn points_for(&self, id: &PlayerId) -> u32 {
        self.awards.iter().filter(|a| &a.player_id == id).count() as u32
    }

    /// Categories `id` qualified under, in award order.
    pub fn reasons_for(&self, id: &PlayerId) -> Vec<PenaltyReason> {
        self.awards
            .iter()
            .filter(|a| &a.player_id == id)
            .map(|a| a.reason)
            .collect()
    }

    pub fn duplicate_participants(&self) -> BTreeSet<PlayerId> {
        self.duplicate_groups
            .iter()
            .flat_map(|g| g.player_ids.iter().cloned())
            .collect()
    }
}

struct Scored<'a> {
    id: &'a PlayerId,
    weight: i32,
    distance: u32,
}

/// Score one complete round against the active roster.
///
/// Eliminated entries in `players` are ignored. An empty active roster yields an
/// empty summary.
pub fn summarize_round(
    round: &Round,
    players: &[Player],
    rules: &ScoringRules,
) -> Result<RoundSummary, SummaryError> {
    let is_final = round.is_final();
    let specials_apply = !is_final || rules.final_round_special_numbers;
    let duplicates_apply = !is_final || rules.final_round_duplicates;

    let mut scored = Vec::with_capacity(players.len());
    for p in players.iter().filter(|p| p.is_active()) {
        let weight = round.result(&p.id).ok_or_else(|| SummaryError::MissingResult {
            player_id: p.id.clone(),
        })?;
        let target = round
            .effective_target(&p.id)
            .ok_or_else(|| SummaryError::MissingTarget {
                player_id: p.id.clone(),
            })?;
        scored.push(Scored {
            id: &p.id,
            weight,
            distance: weight.abs_diff(target),
        });
    }

    let max_distance = scored.iter().map(|s| s.distance).max();

    let furthest: Vec<&PlayerId> = match max_distance {
        Some(max) => scored
            .iter()
            .filter(|s| s.distance == max)
            .map(|s| s.id)
            .collect(),
        None => Vec::new(),
    };

    let exact: Vec<&PlayerId> = scored
        .iter()
        .filter(|s| s.distance == 0)
        .map(|s| s.id)
        .collect();

    let special_number_hits: Vec<SpecialHit> = if specials_apply {
        scored
            .iter()
            .filter(|s| rules.is_special(s.weight))
            .map(|s| SpecialHit {
                player_id: s.id.clone(),
                weight: s.weight,
            })
            .collect()
    } else {
        Vec::new()
    };

    let duplicate_groups: Vec<DuplicateGroup> = if duplicates_apply {
        let mut by_weight: BTreeMap<i32, Vec<PlayerId>> = BTreeMap::new();
        for s in &scored {
            by_weight.entry(s.weight).or_default().push(s.id.clone());
        }
        by_weight
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(weight, player_ids)| DuplicateGroup { weight, player_ids })
            .collect()
    } else {
        Vec::new()
    };

    let mut awards = Vec::new();
    let mut push = |id: &PlayerId, reason: PenaltyReason| {
        awards.push(PenaltyAward {
            player_id: id.clone(),
            reason,
        })
    };
    for id in &furthest {
        push(*id, PenaltyReason::Furthest);
    }
    for id in &exact {
        push(*id, PenaltyReason::ExactHit);
    }
    for hit in &special_number_hits {
        push(&hit.player_id, PenaltyReason::SpecialNumber);
    }
    for group in &duplicate_groups {
        for id in &group.player_ids {
            push(id, PenaltyReason::DuplicateWeight);
        }
    }

    if !rules.stack_categories {
        let mut seen = BTreeSet::new();
        awards.retain(|a| seen.insert(a.player_id.clone()));
    }

    let penalized_player_ids = awards.iter().map(|a| a.player_id.clone()).collect();

    Ok(RoundSummary {
        is_final,
        max_distance,
        furthest_player_ids: furthest.into_iter().cloned().collect(),
        exact_hit_ids: exact.into_iter().cloned().collect(),
        special_number_hits,
        duplicate_groups,
        awards,
        penalized_player_ids,
    })
}
