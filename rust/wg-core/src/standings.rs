//! Final ranking: average distance to target plus Schnaps count, lowest wins.

use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};
use crate::round::Round;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub average_distance: f64,
    pub penalty_count: u32,
    pub eliminated: bool,
    /// `average_distance + penalty_count`.
    pub total: f64,
}

/// Mean |result - target| over the rounds where `id` has both a result and a
/// target. 0 when there are none.
pub fn average_distance(id: &PlayerId, rounds: &[Round]) -> f64 {
    let distances: Vec<u32> = rounds
        .iter()
        .filter_map(|r| Some(r.result(id)?.abs_diff(r.effective_target(id)?)))
        .collect();
    if distances.is_empty() {
        return 0.0;
    }
    let sum: u64 = distances.iter().map(|&d| d as u64).sum();
    sum as f64 / distances.len() as f64
}

/// Rank every player (eliminated ones included) by ascending total. Ties keep
/// roster order.
pub fn final_standings(players: &[Player], rounds: &[Round]) -> Vec<Standing> {
    let mut rows: Vec<Standing> = players
        .iter()
        .map(|p| {
            let average_distance = average_distance(&p.id, rounds);
            Standing {
                rank: 0,
                player_id: p.id.clone(),
                name: p.name.clone(),
                average_distance,
                penalty_count: p.penalty_count,
                eliminated: p.eliminated,
                total: average_distance + p.penalty_count as f64,
            }
        })
        .collect();

    // Stable sort; totals are finite so total_cmp matches numeric order.
    rows.sort_by(|a, b| a.total.total_cmp(&b.total));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
