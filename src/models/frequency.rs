//! Index -> Hz table for the tone generator
//!
//! Equal temperament around A4 = 440 Hz, rounded to whole Hz the way a
//! `tone()`-style timer driver expects them.

use once_cell::sync::Lazy;

use super::pitch::{Pitch, NTONE_PITCH};

/// Concert pitch of [`Pitch::A4`]
pub const REFERENCE_HZ: f64 = 440.0;

/// Whole-Hz frequency of every pitch, slot `index - 1`
pub static FREQUENCY_TABLE: Lazy<[u16; NTONE_PITCH as usize]> = Lazy::new(|| {
    let mut table = [0u16; NTONE_PITCH as usize];
    for pitch in Pitch::iter() {
        table[(pitch.index() - 1) as usize] = frequency_for(pitch, REFERENCE_HZ).round() as u16;
    }
    log::debug!(
        "built frequency table: {} Hz .. {} Hz",
        table[0],
        table[NTONE_PITCH as usize - 1]
    );
    table
});

/// Exact frequency of `pitch` when A4 sounds at `reference_hz`
pub fn frequency_for(pitch: Pitch, reference_hz: f64) -> f64 {
    let semitones = pitch.index() as f64 - Pitch::A4.index() as f64;
    reference_hz * 2f64.powf(semitones / 12.0)
}

impl Pitch {
    /// Tabled frequency in Hz
    pub fn frequency_hz(self) -> u16 {
        FREQUENCY_TABLE[(self.index() - 1) as usize]
    }
}
