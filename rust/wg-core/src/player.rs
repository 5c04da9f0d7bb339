//! Player roster entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable player identifier (`p0`, `p1`, ... when assigned by a `Session`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One participant. Weights are integer grams.
///
/// `penalty_count` and `eliminated` only change when a scored round is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub start_weight: i32,
    /// Schnaps count.
    pub penalty_count: u32,
    pub eliminated: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, start_weight: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_weight,
            penalty_count: 0,
            eliminated: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }
}
