//! Error types for tone lookups, melody parsing and export
//!
//! Symbol references (`Pitch::A4`, `DUR_1_4`) are checked by the compiler.
//! Everything parsed from text or files at runtime reports through
//! [`ToneError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneError {
    /// Note name that is not in the C3..C8 table
    #[error("unknown pitch: '{0}'")]
    UnknownPitch(String),

    /// Fraction that is not one of the n/1 .. n/32 table entries
    #[error("unknown duration: '{0}'")]
    UnknownDuration(String),

    /// Malformed melody token (1-based position in the input)
    #[error("invalid token #{position} '{token}': {reason}")]
    InvalidToken {
        position: usize,
        token: String,
        reason: String,
    },

    /// Transposition or index arithmetic left the playable range
    #[error("pitch index {0} is outside 1..=61")]
    OutOfRange(i32),

    #[error("invalid playback config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("midi write error: {0}")]
    Midi(String),
}

pub type Result<T> = std::result::Result<T, ToneError>;
