//! Line-based session driver: prompts on `out`, answers from `input`.
//!
//! Invalid answers are reported and asked again. Running out of input before
//! the results screen is an error.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use wg_core::{
    Config, Phase, PlayerId, RoundOutcome, RoundTarget, Session, SessionError, Standing,
    TargetDecision,
};
use wg_logging::{
    debug_log, LogError, NdjsonWriter, RoundScoredEventV1, SessionFinishedEventV1,
    SessionStartedEventV1,
};

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("input ended while waiting for: {prompt}")]
    UnexpectedEof { prompt: String },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("event log: {0}")]
    Log(#[from] LogError),
}

/// Where session events go, if anywhere.
pub struct EventLog {
    pub writer: NdjsonWriter,
    pub session_id: String,
    pub config_hash: Option<String>,
}

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn ask_line(&mut self, prompt: &str) -> Result<String, PlayError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PlayError::UnexpectedEof {
                prompt: prompt.trim().to_string(),
            });
        }
        Ok(line.trim().to_string())
    }

    fn ask_grams(&mut self, prompt: &str) -> Result<i32, PlayError> {
        loop {
            let line = self.ask_line(prompt)?;
            match line.trim_end_matches('g').trim().parse::<i32>() {
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.out, "  not a number: {line:?}")?,
            }
        }
    }
}

fn name_of(session: &Session, id: &PlayerId) -> String {
    session
        .player(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn join_names<'a>(session: &Session, ids: impl IntoIterator<Item = &'a PlayerId>) -> String {
    ids.into_iter()
        .map(|id| name_of(session, id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Play one full session. Returns the final standings.
pub fn run_play<R: BufRead, W: Write>(
    config: Config,
    input: R,
    out: W,
    mut log: Option<EventLog>,
) -> Result<Vec<Standing>, PlayError> {
    let mut session = Session::new(config)?;
    let mut p = Prompter { input, out };

    writeln!(p.out, "1. Bundeswiega")?;
    setup_roster(&mut session, &mut p)?;
    session.start()?;

    if let Some(log) = log.as_mut() {
        log.writer.write_event(&SessionStartedEventV1::new(
            &log.session_id,
            log.config_hash.clone(),
            session.config().game.vessel,
            session.players(),
        ))?;
    }

    loop {
        match session.phase() {
            Phase::Setup => session.start()?,
            Phase::RoundTarget => announce_target(&mut session, &mut p)?,
            Phase::Gameplay | Phase::FinalResults => {
                collect_results(&mut session, &mut p)?;
                let outcome = session.score_round()?;
                debug_log(
                    "wg-cli::play",
                    "round scored",
                    serde_json::json!({
                        "round": outcome.round_index + 1,
                        "awards": outcome.summary.awards.len(),
                        "next_phase": outcome.next_phase,
                    }),
                );
                render_outcome(&session, &outcome, &mut p.out)?;
                if let Some(log) = log.as_mut() {
                    log.writer
                        .write_event(&RoundScoredEventV1::from_outcome(&log.session_id, &outcome))?;
                }
            }
            Phase::FinalTargets => declare_final_targets(&mut session, &mut p)?,
            Phase::Results => break,
        }
    }

    let standings = session.standings();
    render_history(&session, &mut p.out)?;
    render_standings(&standings, &mut p.out)?;
    if let Some(log) = log.as_mut() {
        log.writer.write_event(&SessionFinishedEventV1::new(
            &log.session_id,
            session.rounds().len(),
            &standings,
        ))?;
        log.writer.flush()?;
    }
    Ok(standings)
}

fn setup_roster<R: BufRead, W: Write>(
    session: &mut Session,
    p: &mut Prompter<R, W>,
) -> Result<(), PlayError> {
    let (min, max) = (
        session.config().game.min_players,
        session.config().game.max_players,
    );
    let count = loop {
        let n = p.ask_grams(&format!("Number of players ({min}-{max}): "))?;
        match usize::try_from(n) {
            Ok(n) if (min..=max).contains(&n) => break n,
            _ => writeln!(p.out, "  choose between {min} and {max}")?,
        }
    };

    for i in 1..=count {
        loop {
            let mut name = p.ask_line(&format!("Name of player {i}: "))?;
            if name.is_empty() {
                name = format!("Player {i}");
            }
            let weight = p.ask_grams(&format!("Start weight of {name} (g): "))?;
            match session.add_player(&name, weight) {
                Ok(_) => break,
                Err(e) => writeln!(p.out, "  {e}")?,
            }
        }
    }
    Ok(())
}

fn announce_target<R: BufRead, W: Write>(
    session: &mut Session,
    p: &mut Prompter<R, W>,
) -> Result<(), PlayError> {
    writeln!(p.out)?;
    writeln!(p.out, "Round {}", session.round_number())?;
    for (id, w) in session.current_weights() {
        writeln!(p.out, "  {:<16} {w}g", name_of(session, &id))?;
    }

    match session.target_decision() {
        TargetDecision::Free { range } => loop {
            let target = p.ask_grams(&format!("Target ({}g-{}g): ", range.min, range.max))?;
            match session.announce_target(target) {
                Ok(()) => return Ok(()),
                Err(e) => writeln!(p.out, "  {e}")?,
            }
        },
        TargetDecision::AutoAssigned { target, spread } => {
            writeln!(
                p.out,
                "Weights are {spread}g apart; the target is fixed at {target}g."
            )?;
            session.accept_auto_target()?;
            Ok(())
        }
    }
}

fn collect_results<R: BufRead, W: Write>(
    session: &mut Session,
    p: &mut Prompter<R, W>,
) -> Result<(), PlayError> {
    for id in session.pending_players() {
        let name = name_of(session, &id);
        loop {
            let grams = p.ask_grams(&format!("{name} weighs (g): "))?;
            match session.record_result(&id, grams) {
                Ok(()) => break,
                Err(e) => writeln!(p.out, "  {e}")?,
            }
        }
    }
    Ok(())
}

fn declare_final_targets<R: BufRead, W: Write>(
    session: &mut Session,
    p: &mut Prompter<R, W>,
) -> Result<(), PlayError> {
    writeln!(p.out)?;
    writeln!(
        p.out,
        "Final round! Everyone secretly estimates their empty-vessel weight."
    )?;
    let ids: Vec<PlayerId> = session.active_players().map(|pl| pl.id.clone()).collect();
    for id in ids {
        let name = name_of(session, &id);
        loop {
            let grams = p.ask_grams(&format!("{name}'s estimate (g): "))?;
            match session.declare_final_target(&id, grams) {
                Ok(()) => break,
                Err(e) => writeln!(p.out, "  {e}")?,
            }
        }
    }
    session.begin_final_round()?;
    Ok(())
}

fn render_outcome<W: Write>(
    session: &Session,
    outcome: &RoundOutcome,
    out: &mut W,
) -> io::Result<()> {
    let s = &outcome.summary;
    let title = if s.is_final {
        "Final round".to_string()
    } else {
        format!("Round {}", outcome.round_index + 1)
    };
    writeln!(out, "--- {title} summary ---")?;
    if let Some(max) = s.max_distance {
        writeln!(
            out,
            "Furthest off ({max}g, +1): {}",
            join_names(session, &s.furthest_player_ids)
        )?;
    }
    if !s.exact_hit_ids.is_empty() {
        writeln!(out, "Exact hit (+1): {}", join_names(session, &s.exact_hit_ids))?;
    }
    for g in &s.duplicate_groups {
        writeln!(
            out,
            "Same weight {}g (+1): {}",
            g.weight,
            join_names(session, &g.player_ids)
        )?;
    }
    for hit in &s.special_number_hits {
        writeln!(
            out,
            "Schnapszahl {}g (+1): {}",
            hit.weight,
            name_of(session, &hit.player_id)
        )?;
    }
    for e in outcome.newly_eliminated() {
        writeln!(
            out,
            "Eliminated: {} ({:+}g from {}g)",
            name_of(session, &e.player_id),
            e.check.distance,
            e.target
        )?;
    }
    for pl in session.players() {
        let gained = s.points_for(&pl.id);
        if gained > 0 {
            writeln!(out, "  {:<16} +{gained} -> {}", pl.name, pl.penalty_count)?;
        }
    }
    Ok(())
}

/// One row per scored round: the target (or `indiv.` for the final round),
/// then each player's weight and distance. `-` once a player is out.
fn render_history<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== History ===")?;
    write!(out, "{:<6} {:>7}", "Round", "Target")?;
    for pl in session.players() {
        write!(out, " {:>14}", pl.name)?;
    }
    writeln!(out)?;

    for (i, round) in session.rounds().iter().enumerate() {
        let (label, target) = match &round.target {
            RoundTarget::Shared(t) => ((i + 1).to_string(), format!("{t}g")),
            RoundTarget::Individual(_) => ("Final".to_string(), "indiv.".to_string()),
        };
        write!(out, "{label:<6} {target:>7}")?;
        for pl in session.players() {
            let cell = match (round.result(&pl.id), round.effective_target(&pl.id)) {
                (Some(w), Some(t)) => format!("{w}g ({})", w.abs_diff(t)),
                _ => "-".to_string(),
            };
            write!(out, " {cell:>14}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_standings<W: Write>(standings: &[Standing], out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Results ===")?;
    writeln!(
        out,
        "{:<4} {:<16} {:>9} {:>8} {:>7}",
        "#", "Player", "avg dist", "Schnaps", "total"
    )?;
    for s in standings {
        let marker = if s.eliminated { " (out)" } else { "" };
        writeln!(
            out,
            "{:<4} {:<16} {:>8.1}g {:>8} {:>7.1}{marker}",
            format!("{}.", s.rank),
            s.name,
            s.average_distance,
            s.penalty_count,
            s.total
        )?;
    }
    Ok(())
}
