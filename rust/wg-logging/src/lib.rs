//! wg-logging: NDJSON session events + env-gated debug logging.
//!
//! A session log is append-only: one `session_started` line, one `round_scored`
//! line per scored round, and a `session_finished` line once standings are final.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use wg_core::{
    EliminationReport, Phase, Player, RoundOutcome, RoundTarget, RoundSummary, Standing,
    VesselSize,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event log schema version.
pub const LOG_VERSION: u32 = 1;

/// Ruleset id written into every event.
pub const RULESET_ID: &str = "bundeswiega_v1";

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Fresh session id derived from the wall clock.
pub fn new_session_id() -> String {
    format!("s{}", now_ms())
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Schema versioning fields carried by every event.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub log_version: u32,
    pub ruleset_id: &'static str,
}

impl Default for VersionInfoV1 {
    fn default() -> Self {
        Self {
            log_version: LOG_VERSION,
            ruleset_id: RULESET_ID,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStartedEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub config_hash: Option<String>,
    pub vessel: VesselSize,
    pub players: Vec<Player>,
}

impl SessionStartedEventV1 {
    pub fn new(
        session_id: &str,
        config_hash: Option<String>,
        vessel: VesselSize,
        players: &[Player],
    ) -> Self {
        Self {
            event: "session_started",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: session_id.to_string(),
            config_hash,
            vessel,
            players: players.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundScoredEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    /// 1-based, as shown to players.
    pub round: usize,
    pub target: RoundTarget,
    pub results: Vec<(String, i32)>,
    pub summary: RoundSummary,
    pub eliminations: Vec<EliminationReport>,
    pub next_phase: Phase,
}

impl RoundScoredEventV1 {
    pub fn from_outcome(session_id: &str, outcome: &RoundOutcome) -> Self {
        Self {
            event: "round_scored",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: session_id.to_string(),
            round: outcome.round_index + 1,
            target: outcome.round.target.clone(),
            results: outcome
                .round
                .results
                .iter()
                .map(|(id, &w)| (id.to_string(), w))
                .collect(),
            summary: outcome.summary.clone(),
            eliminations: outcome.eliminations.clone(),
            next_phase: outcome.next_phase,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionFinishedEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub rounds_played: usize,
    pub standings: Vec<Standing>,
}

impl SessionFinishedEventV1 {
    pub fn new(session_id: &str, rounds_played: usize, standings: &[Standing]) -> Self {
        Self {
            event: "session_finished",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: session_id.to_string(),
            rounds_played,
            standings: standings.to_vec(),
        }
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, LogError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), LogError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// True when `WG_DEBUG_LOG` is `1`, `true` or `yes`. Read once per process.
pub fn debug_enabled() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| {
        matches!(
            std::env::var("WG_DEBUG_LOG").as_deref(),
            Ok("1" | "true" | "yes")
        )
    })
}

fn debug_line(location: &str, message: &str, data: serde_json::Value) -> String {
    serde_json::json!({
        "ts_ms": now_ms(),
        "location": location,
        "message": message,
        "data": data,
    })
    .to_string()
}

/// Write one JSON debug line to stderr when debug logging is enabled.
pub fn debug_log(location: &str, message: &str, data: serde_json::Value) {
    if !debug_enabled() {
        return;
    }
    eprintln!("{}", debug_line(location, message, data));
}
