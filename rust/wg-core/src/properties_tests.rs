//! Property tests for the scoring core.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use crate::{
    compute_target_range, is_eliminated, summarize_round, Player, PlayerId, RangeRules, Round,
    ScoringRules,
};

fn build(target: i32, weights: &[i32]) -> (Round, Vec<Player>) {
    let players: Vec<Player> = (0..weights.len())
        .map(|i| Player::new(format!("p{i}"), format!("P{i}"), 700))
        .collect();
    let mut round = Round::shared(target);
    for (p, &w) in players.iter().zip(weights) {
        round.record_result(p.id.clone(), w);
    }
    (round, players)
}

proptest! {
    #[test]
    fn every_max_distance_player_is_furthest(
        target in 0i32..800,
        // Narrow range so ties are common.
        weights in prop::collection::vec(0i32..40, 1..10),
    ) {
        let weights: Vec<i32> = weights.iter().map(|w| target - 20 + w).collect();
        let (round, players) = build(target, &weights);
        let s = summarize_round(&round, &players, &ScoringRules::default()).unwrap();

        let max = weights.iter().map(|w| w.abs_diff(target)).max().unwrap();
        for (p, w) in players.iter().zip(&weights) {
            let is_max = w.abs_diff(target) == max;
            prop_assert_eq!(s.furthest_player_ids.contains(&p.id), is_max);
        }
    }

    #[test]
    fn every_penalty_is_traceable(
        target in 0i32..500,
        weights in prop::collection::vec(0i32..500, 0..10),
        stack in any::<bool>(),
    ) {
        let rules = ScoringRules { stack_categories: stack, ..ScoringRules::default() };
        let (round, players) = build(target, &weights);
        let s = summarize_round(&round, &players, &rules).unwrap();

        let special: BTreeSet<PlayerId> =
            s.special_number_hits.iter().map(|h| h.player_id.clone()).collect();
        let dup = s.duplicate_participants();
        for id in &s.penalized_player_ids {
            prop_assert!(
                s.furthest_player_ids.contains(id)
                    || s.exact_hit_ids.contains(id)
                    || special.contains(id)
                    || dup.contains(id)
            );
        }
    }

    #[test]
    fn range_is_ordered_below_spread_threshold(
        lowest in 100i32..2000,
        spread in 0i32..90,
        extra in prop::collection::vec(0i32..90, 0..8),
    ) {
        let mut weights = vec![lowest, lowest + spread];
        weights.extend(extra.iter().map(|e| lowest + e % (spread + 1)));
        let r = compute_target_range(&weights, &RangeRules::default());
        prop_assert!(r.min <= r.max, "{:?} from {:?}", r, weights);
    }

    #[test]
    fn elimination_is_deterministic(
        weight in -1000i32..2000,
        target in 0i32..1000,
        tolerance in 0u32..200,
    ) {
        let first = is_eliminated(weight, target, tolerance);
        for _ in 0..3 {
            prop_assert_eq!(is_eliminated(weight, target, tolerance), first);
        }
        prop_assert_eq!(first, weight.abs_diff(target) > tolerance);
    }

    #[test]
    fn duplicate_groups_cover_exactly_the_shared_weights(
        weights in prop::collection::vec(300i32..320, 0..12),
    ) {
        let (round, players) = build(310, &weights);
        let s = summarize_round(&round, &players, &ScoringRules::default()).unwrap();

        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for &w in &weights {
            *counts.entry(w).or_default() += 1;
        }
        let expected: BTreeSet<PlayerId> = players
            .iter()
            .zip(&weights)
            .filter(|(_, w)| counts[*w] > 1)
            .map(|(p, _)| p.id.clone())
            .collect();
        prop_assert_eq!(s.duplicate_participants(), expected);
    }
}
