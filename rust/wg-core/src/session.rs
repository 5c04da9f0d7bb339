//! Session state machine: the single place that mutates the roster and the
//! round history.
//!
//! ```text
//! Setup -> RoundTarget -> Gameplay -+-> RoundTarget            (next normal round)
//!                                   +-> FinalTargets -> FinalResults -> Results
//!                                   +-> Results                (everyone eliminated)
//! ```
//!
//! Scoring itself lives in `summary`, `range` and `elimination`; this module
//! only sequences calls into them and applies their output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::elimination::{check_elimination, final_round_triggered, EliminationCheck};
use crate::player::{Player, PlayerId};
use crate::range::{decide_target, TargetDecision};
use crate::round::Round;
use crate::standings::{final_standings, Standing};
use crate::summary::{summarize_round, RoundSummary, SummaryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Roster is being entered.
    Setup,
    /// Waiting for the shared target of the next round.
    RoundTarget,
    /// Collecting weights for a normal round.
    Gameplay,
    /// Collecting each player's private empty-vessel estimate.
    FinalTargets,
    /// Collecting weights for the final round.
    FinalResults,
    /// Terminal.
    Results,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("{op} is not allowed in phase {phase:?}")]
    WrongPhase { op: &'static str, phase: Phase },
    #[error("player count {count} outside {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("player name must be non-empty")]
    InvalidName,
    #[error("player name {name:?} is already taken")]
    DuplicateName { name: String },
    #[error("invalid weight {grams}g")]
    InvalidWeight { grams: i32 },
    #[error("unknown player {player_id}")]
    UnknownPlayer { player_id: PlayerId },
    #[error("player {player_id} is eliminated")]
    PlayerEliminated { player_id: PlayerId },
    #[error("target {target}g outside {min}g..={max}g")]
    TargetOutOfRange { target: i32, min: i32, max: i32 },
    #[error("weights diverged: the target for this round is fixed at {target}g")]
    AutoTargetRequired { target: i32 },
    #[error("this round's target is announced freely")]
    NoAutoTarget,
    #[error("missing results for {missing:?}")]
    IncompleteRound { missing: Vec<PlayerId> },
    #[error("missing final targets for {missing:?}")]
    MissingFinalTargets { missing: Vec<PlayerId> },
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// One player's elimination check for a scored round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationReport {
    pub player_id: PlayerId,
    pub weight: i32,
    pub target: i32,
    pub check: EliminationCheck,
}

/// Everything `score_round` decided, for display and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// 0-based index into `Session::rounds`.
    pub round_index: usize,
    pub round: Round,
    pub summary: RoundSummary,
    /// Checks for every player scored this round (eliminated or not).
    pub eliminations: Vec<EliminationReport>,
    pub next_phase: Phase,
}

impl RoundOutcome {
    pub fn newly_eliminated(&self) -> impl Iterator<Item = &EliminationReport> {
        self.eliminations.iter().filter(|e| e.check.eliminated)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    phase: Phase,
    players: Vec<Player>,
    rounds: Vec<Round>,
    current: Option<Round>,
    final_targets: BTreeMap<PlayerId, i32>,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Setup,
            players: Vec::new(),
            rounds: Vec::new(),
            current: None,
            final_targets: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Scored rounds, oldest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Round currently collecting results, if any.
    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// 1-based number of the round being played or about to be announced.
    pub fn round_number(&self) -> usize {
        self.rounds.len() + 1
    }

    pub fn final_targets(&self) -> &BTreeMap<PlayerId, i32> {
        &self.final_targets
    }

    fn expect_phase(&self, op: &'static str, allowed: &[Phase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                op,
                phase: self.phase,
            })
        }
    }

    fn active_player(&self, id: &PlayerId) -> Result<&Player, SessionError> {
        let p = self.player(id).ok_or_else(|| SessionError::UnknownPlayer {
            player_id: id.clone(),
        })?;
        if p.eliminated {
            return Err(SessionError::PlayerEliminated {
                player_id: id.clone(),
            });
        }
        Ok(p)
    }

    // --- setup ---

    /// Add a player; ids are assigned in order (`p0`, `p1`, ...).
    pub fn add_player(&mut self, name: &str, start_weight: i32) -> Result<PlayerId, SessionError> {
        self.expect_phase("add_player", &[Phase::Setup])?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidName);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(SessionError::DuplicateName {
                name: name.to_string(),
            });
        }
        if start_weight <= 0 {
            return Err(SessionError::InvalidWeight {
                grams: start_weight,
            });
        }
        let max = self.config.game.max_players;
        if self.players.len() >= max {
            return Err(SessionError::PlayerCount {
                count: self.players.len() + 1,
                min: self.config.game.min_players,
                max,
            });
        }
        let id = PlayerId::new(format!("p{}", self.players.len()));
        self.players.push(Player::new(id.clone(), name, start_weight));
        Ok(id)
    }

    /// Close the roster and move to the first target announcement.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_phase("start", &[Phase::Setup])?;
        let (min, max) = (self.config.game.min_players, self.config.game.max_players);
        let count = self.players.len();
        if !(min..=max).contains(&count) {
            return Err(SessionError::PlayerCount { count, min, max });
        }
        self.phase = Phase::RoundTarget;
        Ok(())
    }

    // --- normal rounds ---

    fn latest_weight(&self, p: &Player) -> i32 {
        self.rounds
            .last()
            .and_then(|r| r.result(&p.id))
            .unwrap_or(p.start_weight)
    }

    /// Active players' most recent weights: start weights before round 1, the
    /// previous round's results afterwards.
    pub fn current_weights(&self) -> Vec<(PlayerId, i32)> {
        self.active_players()
            .map(|p| (p.id.clone(), self.latest_weight(p)))
            .collect()
    }

    pub fn target_decision(&self) -> TargetDecision {
        let weights: Vec<i32> = self.current_weights().into_iter().map(|(_, w)| w).collect();
        decide_target(&weights, &self.config.range)
    }

    /// Announce the shared target for the next round.
    pub fn announce_target(&mut self, target: i32) -> Result<(), SessionError> {
        self.expect_phase("announce_target", &[Phase::RoundTarget])?;
        match self.target_decision() {
            TargetDecision::Free { range } => {
                if !range.contains(target) {
                    return Err(SessionError::TargetOutOfRange {
                        target,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
            TargetDecision::AutoAssigned { target: auto, .. } => {
                if target != auto {
                    return Err(SessionError::AutoTargetRequired { target: auto });
                }
            }
        }
        self.current = Some(Round::shared(target));
        self.phase = Phase::Gameplay;
        Ok(())
    }

    /// Start the round with the auto-assigned target. Returns that target.
    pub fn accept_auto_target(&mut self) -> Result<i32, SessionError> {
        self.expect_phase("accept_auto_target", &[Phase::RoundTarget])?;
        let target = self
            .target_decision()
            .auto_target()
            .ok_or(SessionError::NoAutoTarget)?;
        self.announce_target(target)?;
        Ok(target)
    }

    /// Record (or correct) a player's weight for the current round.
    pub fn record_result(&mut self, id: &PlayerId, grams: i32) -> Result<(), SessionError> {
        self.expect_phase("record_result", &[Phase::Gameplay, Phase::FinalResults])?;
        if grams < 0 {
            return Err(SessionError::InvalidWeight { grams });
        }
        self.active_player(id)?;
        if let Some(round) = self.current.as_mut() {
            round.record_result(id.clone(), grams);
        }
        Ok(())
    }

    /// Active players who still owe a weight this round, in roster order.
    pub fn pending_players(&self) -> Vec<PlayerId> {
        match &self.current {
            Some(round) => round.missing_results(self.active_players()),
            None => Vec::new(),
        }
    }

    /// Score the current round and apply penalties and eliminations.
    pub fn score_round(&mut self) -> Result<RoundOutcome, SessionError> {
        self.expect_phase("score_round", &[Phase::Gameplay, Phase::FinalResults])?;
        let missing = self.pending_players();
        if !missing.is_empty() {
            return Err(SessionError::IncompleteRound { missing });
        }
        let Some(round) = self.current.take() else {
            return Err(SessionError::WrongPhase {
                op: "score_round",
                phase: self.phase,
            });
        };

        let summary = match summarize_round(&round, &self.players, &self.config.scoring) {
            Ok(s) => s,
            Err(e) => {
                self.current = Some(round);
                return Err(e.into());
            }
        };

        let tolerance = self.config.elimination.tolerance;
        let mut eliminations = Vec::new();
        for p in self.players.iter().filter(|p| p.is_active()) {
            // Presence of both was checked by summarize_round.
            let (Some(weight), Some(target)) = (round.result(&p.id), round.effective_target(&p.id))
            else {
                continue;
            };
            eliminations.push(EliminationReport {
                player_id: p.id.clone(),
                weight,
                target,
                check: check_elimination(weight, target, tolerance),
            });
        }

        for award in &summary.awards {
            if let Some(p) = self.players.iter_mut().find(|p| p.id == award.player_id) {
                p.penalty_count += 1;
            }
        }
        for report in eliminations.iter().filter(|e| e.check.eliminated) {
            if let Some(p) = self.players.iter_mut().find(|p| p.id == report.player_id) {
                p.eliminated = true;
            }
        }

        let was_final = round.is_final();
        self.rounds.push(round.clone());

        let active_weights: Vec<i32> = self
            .active_players()
            .filter_map(|p| round.result(&p.id))
            .collect();
        let next_phase = if was_final || active_weights.is_empty() {
            Phase::Results
        } else if final_round_triggered(
            &active_weights,
            self.min_start_weight(),
            self.config.game.vessel.final_round_drop(),
        ) {
            self.final_targets.clear();
            Phase::FinalTargets
        } else {
            Phase::RoundTarget
        };
        self.phase = next_phase;

        Ok(RoundOutcome {
            round_index: self.rounds.len() - 1,
            round,
            summary,
            eliminations,
            next_phase,
        })
    }

    /// Lightest start weight on the roster (eliminated players included).
    pub fn min_start_weight(&self) -> i32 {
        self.players
            .iter()
            .map(|p| p.start_weight)
            .min()
            .unwrap_or(0)
    }

    // --- final round ---

    /// Record (or change) a player's private target for the final round.
    pub fn declare_final_target(&mut self, id: &PlayerId, grams: i32) -> Result<(), SessionError> {
        self.expect_phase("declare_final_target", &[Phase::FinalTargets])?;
        if grams < 0 {
            return Err(SessionError::InvalidWeight { grams });
        }
        self.active_player(id)?;
        self.final_targets.insert(id.clone(), grams);
        Ok(())
    }

    /// Close target declarations and start collecting final weights.
    pub fn begin_final_round(&mut self) -> Result<(), SessionError> {
        self.expect_phase("begin_final_round", &[Phase::FinalTargets])?;
        let missing: Vec<PlayerId> = self
            .active_players()
            .filter(|p| !self.final_targets.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::MissingFinalTargets { missing });
        }
        let targets = std::mem::take(&mut self.final_targets);
        self.current = Some(Round::individual(targets));
        self.phase = Phase::FinalResults;
        Ok(())
    }

    // --- results ---

    /// Ranking over every player and every scored round. Available in any phase.
    pub fn standings(&self) -> Vec<Standing> {
        final_standings(&self.players, &self.rounds)
    }
}
