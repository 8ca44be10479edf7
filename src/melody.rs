//! Melodies: sequences of (tone, length) pairs
//!
//! The text form is a list of `TONE:LENGTH` tokens separated by
//! whitespace or commas:
//!
//! ```text
//! E5:1/8 D5:1/8 C5:1/4 R:1/8 C5:3/8
//! ```
//!
//! YAML and JSON files hold a `name` and a `notes` list using the same
//! token syntax per entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::PlaybackConfig;
use crate::error::{Result, ToneError};
use crate::models::duration::NoteLength;
use crate::models::frequency::frequency_for;
use crate::models::pitch::Pitch;
use crate::models::tone::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    pub tone: Tone,
    pub length: NoteLength,
}

impl Note {
    pub fn new(tone: impl Into<Tone>, length: NoteLength) -> Self {
        Self {
            tone: tone.into(),
            length,
        }
    }

    pub fn rest(length: NoteLength) -> Self {
        Self {
            tone: Tone::Rest,
            length,
        }
    }

    /// Milliseconds at the 120 BPM reference tempo
    pub fn millis(&self) -> u16 {
        self.length.millis()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tone, self.length)
    }
}

impl FromStr for Note {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self> {
        parse_token(s, 1)
    }
}

impl TryFrom<String> for Note {
    type Error = ToneError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

fn parse_token(token: &str, position: usize) -> Result<Note> {
    let invalid = |reason: String| ToneError::InvalidToken {
        position,
        token: token.to_string(),
        reason,
    };

    let (tone, length) = token
        .split_once(':')
        .ok_or_else(|| invalid("expected TONE:LENGTH".to_string()))?;
    let tone: Tone = tone.parse().map_err(|e: ToneError| invalid(e.to_string()))?;
    let length: NoteLength = length.parse().map_err(|e: ToneError| invalid(e.to_string()))?;

    Ok(Note { tone, length })
}

/// What the tone routine needs for one step: a frequency (or silence) and how long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayEvent {
    pub frequency_hz: Option<u16>,
    pub millis: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Melody {
    #[serde(default)]
    pub name: String,
    pub notes: Vec<Note>,
}

impl Melody {
    pub fn new(name: impl Into<String>, notes: Vec<Note>) -> Self {
        Self {
            name: name.into(),
            notes,
        }
    }

    /// Parse the whitespace/comma separated token form
    pub fn parse(text: &str) -> Result<Self> {
        let notes = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(i, token)| parse_token(token, i + 1))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("parsed melody with {} notes", notes.len());
        Ok(Self {
            name: String::new(),
            notes,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load by extension: `.yaml`/`.yml`, `.json`, anything else is token text.
    /// Token files get the file stem as their name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        log::debug!("loading melody from {}", path.display());
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            Some("json") => Self::from_json(&text),
            _ => {
                let mut melody = Self::parse(&text)?;
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    melody.name = stem.to_string();
                }
                Ok(melody)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total length at the 120 BPM reference tempo
    pub fn total_millis(&self) -> u32 {
        self.notes.iter().map(|note| note.millis() as u32).sum()
    }

    /// Shift every pitch; fails if any note leaves C3..C8
    pub fn transpose(&self, semitones: i32) -> Result<Melody> {
        let notes = self
            .notes
            .iter()
            .map(|note| {
                note.tone
                    .transpose(semitones)
                    .map(|tone| Note::new(tone, note.length))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Melody {
            name: self.name.clone(),
            notes,
        })
    }

    /// Frequency/length pairs for a tone routine
    ///
    /// With the reference config the values come straight from the
    /// tables. Other tempos scale the table lengths and other tunings
    /// recompute the frequency.
    pub fn events(&self, config: &PlaybackConfig) -> Result<Vec<PlayEvent>> {
        config.validate()?;
        let retuned = config.reference_hz != crate::models::frequency::REFERENCE_HZ;

        self.notes
            .iter()
            .map(|note| {
                let frequency_hz = match note.tone.pitch() {
                    None => None,
                    Some(pitch) if retuned => Some(retuned_hz(pitch, config.reference_hz)?),
                    Some(pitch) => Some(pitch.frequency_hz()),
                };
                Ok(PlayEvent {
                    frequency_hz,
                    millis: note.length.millis_at(config.tempo_bpm)?,
                })
            })
            .collect()
    }
}

/// Whole-Hz frequency under another tuning; fails when it does not fit a `u16`
fn retuned_hz(pitch: Pitch, reference_hz: f64) -> Result<u16> {
    let hz = frequency_for(pitch, reference_hz).round();
    if hz > u16::MAX as f64 {
        return Err(ToneError::InvalidConfig(format!(
            "{} sounds at {} Hz with A4 = {} Hz, above {} Hz",
            pitch,
            hz,
            reference_hz,
            u16::MAX
        )));
    }
    Ok(hz as u16)
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", note)?;
        }
        Ok(())
    }
}
