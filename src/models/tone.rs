//! A pitch or a rest
//!
//! The pitch table starts at 1, leaving index 0 free. A melody uses it for
//! silence: the player skips the tone generator and only waits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::pitch::Pitch;
use crate::error::ToneError;

/// Index reserved for silence
pub const REST_INDEX: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tone {
    Rest,
    Pitch(Pitch),
}

impl Tone {
    pub fn index(self) -> u8 {
        match self {
            Tone::Rest => REST_INDEX,
            Tone::Pitch(pitch) => pitch.index(),
        }
    }

    pub fn from_index(index: u8) -> Option<Tone> {
        if index == REST_INDEX {
            return Some(Tone::Rest);
        }
        Pitch::from_index(index).map(Tone::Pitch)
    }

    pub fn is_rest(self) -> bool {
        matches!(self, Tone::Rest)
    }

    pub fn pitch(self) -> Option<Pitch> {
        match self {
            Tone::Rest => None,
            Tone::Pitch(pitch) => Some(pitch),
        }
    }

    /// `None` for rests
    pub fn frequency_hz(self) -> Option<u16> {
        self.pitch().map(Pitch::frequency_hz)
    }

    /// Rests stay rests
    pub fn transpose(self, semitones: i32) -> Result<Tone, ToneError> {
        match self {
            Tone::Rest => Ok(Tone::Rest),
            Tone::Pitch(pitch) => pitch.transpose(semitones).map(Tone::Pitch),
        }
    }
}

impl From<Pitch> for Tone {
    fn from(pitch: Pitch) -> Self {
        Tone::Pitch(pitch)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Rest => write!(f, "R"),
            Tone::Pitch(pitch) => write!(f, "{}", pitch),
        }
    }
}

impl FromStr for Tone {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" | "r" | "-" => Ok(Tone::Rest),
            rest if rest.eq_ignore_ascii_case("rest") => Ok(Tone::Rest),
            name => name.parse().map(Tone::Pitch),
        }
    }
}

impl TryFrom<String> for Tone {
    type Error = ToneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.to_string()
    }
}
