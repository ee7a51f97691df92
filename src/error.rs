//! Crate-wide error type.
//!
//! Per the engine's error handling design, almost nothing in the hot
//! path returns a `Result`: out-of-bounds writes, missing components,
//! event-queue overflow and numeric degeneracies are all silent no-ops
//! or diagnostic counters, never errors. `GameError` exists only for
//! the handful of initialization-time failures that must propagate to
//! the caller.

use std::fmt;

#[derive(Debug)]
pub enum GameError {
    TerminalInit(String),
    Io(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::TerminalInit(msg) => write!(f, "terminal init failed: {msg}"),
            GameError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Converts a lower-level error into a `GameError::Io`, mirroring the
/// teacher's `to_error`/`io_error` boundary-conversion helpers.
pub fn to_error<E: fmt::Display>(e: E) -> GameError {
    GameError::Io(e.to_string())
}
