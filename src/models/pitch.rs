//! Pitch table for the buzzer/speaker tone routine
//!
//! Covers five octaves, C3 through C8, as 61 consecutive semitone
//! indices. Index 1 is C3, index 61 is C8. The frequency table that turns
//! an index into Hz lives in [`super::frequency`].
//!
//! Sharps are the canonical spelling. Flats are associated constants that
//! alias the sharp variant, so `Pitch::Db4` and `Pitch::Cs4` are the same
//! value and there is no separate slot for an enharmonic spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ToneError;

/// Number of pitches in the table
pub const NTONE_PITCH: u8 = 61;

/// MIDI note number of C3, the lowest table entry
const MIDI_C3: u8 = 48;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [Option<&str>; 12] = [
    None,
    Some("Db"),
    None,
    Some("Eb"),
    None,
    None,
    Some("Gb"),
    None,
    Some("Ab"),
    None,
    Some("Bb"),
    None,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Pitch {
    C3 = 1,
    Cs3 = 2,
    D3 = 3,
    Ds3 = 4,
    E3 = 5,
    F3 = 6,
    Fs3 = 7,
    G3 = 8,
    Gs3 = 9,
    A3 = 10,
    As3 = 11,
    B3 = 12,
    C4 = 13,
    Cs4 = 14,
    D4 = 15,
    Ds4 = 16,
    E4 = 17,
    F4 = 18,
    Fs4 = 19,
    G4 = 20,
    Gs4 = 21,
    /// Concert pitch, 440 Hz
    A4 = 22,
    As4 = 23,
    B4 = 24,
    C5 = 25,
    Cs5 = 26,
    D5 = 27,
    Ds5 = 28,
    E5 = 29,
    F5 = 30,
    Fs5 = 31,
    G5 = 32,
    Gs5 = 33,
    A5 = 34,
    As5 = 35,
    B5 = 36,
    C6 = 37,
    Cs6 = 38,
    D6 = 39,
    Ds6 = 40,
    E6 = 41,
    F6 = 42,
    Fs6 = 43,
    G6 = 44,
    Gs6 = 45,
    A6 = 46,
    As6 = 47,
    B6 = 48,
    C7 = 49,
    Cs7 = 50,
    D7 = 51,
    Ds7 = 52,
    E7 = 53,
    F7 = 54,
    Fs7 = 55,
    G7 = 56,
    Gs7 = 57,
    A7 = 58,
    As7 = 59,
    B7 = 60,
    C8 = 61,
}

#[allow(non_upper_case_globals)]
impl Pitch {
    pub const Db3: Pitch = Pitch::Cs3;
    pub const Eb3: Pitch = Pitch::Ds3;
    pub const Gb3: Pitch = Pitch::Fs3;
    pub const Ab3: Pitch = Pitch::Gs3;
    pub const Bb3: Pitch = Pitch::As3;
    pub const Db4: Pitch = Pitch::Cs4;
    pub const Eb4: Pitch = Pitch::Ds4;
    pub const Gb4: Pitch = Pitch::Fs4;
    pub const Ab4: Pitch = Pitch::Gs4;
    pub const Bb4: Pitch = Pitch::As4;
    pub const Db5: Pitch = Pitch::Cs5;
    pub const Eb5: Pitch = Pitch::Ds5;
    pub const Gb5: Pitch = Pitch::Fs5;
    pub const Ab5: Pitch = Pitch::Gs5;
    pub const Bb5: Pitch = Pitch::As5;
    pub const Db6: Pitch = Pitch::Cs6;
    pub const Eb6: Pitch = Pitch::Ds6;
    pub const Gb6: Pitch = Pitch::Fs6;
    pub const Ab6: Pitch = Pitch::Gs6;
    pub const Bb6: Pitch = Pitch::As6;
    pub const Db7: Pitch = Pitch::Cs7;
    pub const Eb7: Pitch = Pitch::Ds7;
    pub const Gb7: Pitch = Pitch::Fs7;
    pub const Ab7: Pitch = Pitch::Gs7;
    pub const Bb7: Pitch = Pitch::As7;

    // Spelling used by the original header (`NOTE_Df3`)
    pub const Df3: Pitch = Pitch::Cs3;
    pub const Ef3: Pitch = Pitch::Ds3;
    pub const Gf3: Pitch = Pitch::Fs3;
    pub const Af3: Pitch = Pitch::Gs3;
    pub const Bf3: Pitch = Pitch::As3;
    pub const Df4: Pitch = Pitch::Cs4;
    pub const Ef4: Pitch = Pitch::Ds4;
    pub const Gf4: Pitch = Pitch::Fs4;
    pub const Af4: Pitch = Pitch::Gs4;
    pub const Bf4: Pitch = Pitch::As4;
    pub const Df5: Pitch = Pitch::Cs5;
    pub const Ef5: Pitch = Pitch::Ds5;
    pub const Gf5: Pitch = Pitch::Fs5;
    pub const Af5: Pitch = Pitch::Gs5;
    pub const Bf5: Pitch = Pitch::As5;
    pub const Df6: Pitch = Pitch::Cs6;
    pub const Ef6: Pitch = Pitch::Ds6;
    pub const Gf6: Pitch = Pitch::Fs6;
    pub const Af6: Pitch = Pitch::Gs6;
    pub const Bf6: Pitch = Pitch::As6;
    pub const Df7: Pitch = Pitch::Cs7;
    pub const Ef7: Pitch = Pitch::Ds7;
    pub const Gf7: Pitch = Pitch::Fs7;
    pub const Af7: Pitch = Pitch::Gs7;
    pub const Bf7: Pitch = Pitch::As7;
}

impl Pitch {
    /// Every pitch in ascending order, `ALL[i].index() == i + 1`
    pub const ALL: [Pitch; NTONE_PITCH as usize] = [
        Pitch::C3, Pitch::Cs3, Pitch::D3, Pitch::Ds3, Pitch::E3, Pitch::F3,
        Pitch::Fs3, Pitch::G3, Pitch::Gs3, Pitch::A3, Pitch::As3, Pitch::B3,
        Pitch::C4, Pitch::Cs4, Pitch::D4, Pitch::Ds4, Pitch::E4, Pitch::F4,
        Pitch::Fs4, Pitch::G4, Pitch::Gs4, Pitch::A4, Pitch::As4, Pitch::B4,
        Pitch::C5, Pitch::Cs5, Pitch::D5, Pitch::Ds5, Pitch::E5, Pitch::F5,
        Pitch::Fs5, Pitch::G5, Pitch::Gs5, Pitch::A5, Pitch::As5, Pitch::B5,
        Pitch::C6, Pitch::Cs6, Pitch::D6, Pitch::Ds6, Pitch::E6, Pitch::F6,
        Pitch::Fs6, Pitch::G6, Pitch::Gs6, Pitch::A6, Pitch::As6, Pitch::B6,
        Pitch::C7, Pitch::Cs7, Pitch::D7, Pitch::Ds7, Pitch::E7, Pitch::F7,
        Pitch::Fs7, Pitch::G7, Pitch::Gs7, Pitch::A7, Pitch::As7, Pitch::B7,
        Pitch::C8,
    ];

    /// Offset+1 into the pitch table
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look up a pitch by table index. 0 is not a pitch (see [`super::tone::Tone::Rest`]).
    pub fn from_index(index: u8) -> Option<Pitch> {
        let slot = index.checked_sub(1)?;
        Self::ALL.get(slot as usize).copied()
    }

    pub fn iter() -> impl Iterator<Item = Pitch> {
        Self::ALL.into_iter()
    }

    /// Semitone within the octave, 0 = C
    pub fn pitch_class(self) -> u8 {
        (self.index() - 1) % 12
    }

    pub fn octave(self) -> u8 {
        3 + (self.index() - 1) / 12
    }

    /// MIDI note number (C4 = 60)
    pub fn midi_number(self) -> u8 {
        MIDI_C3 + self.index() - 1
    }

    pub fn from_midi_number(midi: u8) -> Option<Pitch> {
        let offset = midi.checked_sub(MIDI_C3)?;
        Self::from_index(offset.checked_add(1)?)
    }

    /// Note letter without accidental or octave
    pub fn letter(self) -> char {
        SHARP_NAMES[self.pitch_class() as usize]
            .chars()
            .next()
            .unwrap_or('C')
    }

    /// True for the black keys (the pitches that have a flat alias)
    pub fn is_accidental(self) -> bool {
        FLAT_NAMES[self.pitch_class() as usize].is_some()
    }

    /// Canonical (sharp) name, e.g. "C#4"
    pub fn name(self) -> String {
        format!("{}{}", SHARP_NAMES[self.pitch_class() as usize], self.octave())
    }

    /// Flat spelling for accidentals, e.g. "Db4"
    pub fn flat_name(self) -> Option<String> {
        FLAT_NAMES[self.pitch_class() as usize].map(|flat| format!("{}{}", flat, self.octave()))
    }

    /// Move by a number of semitones, staying inside the table
    pub fn transpose(self, semitones: i32) -> Result<Pitch, ToneError> {
        let target = self.index() as i32 + semitones;
        u8::try_from(target)
            .ok()
            .and_then(Pitch::from_index)
            .ok_or(ToneError::OutOfRange(target))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Pitch {
    type Err = ToneError;

    /// Accepts "A4", "C#4", "Cs4", "Db4", "Df4", "C♯4", "D♭4".
    ///
    /// The letter is case-insensitive. Spellings such as "B#3" or "Fb4"
    /// resolve to their enharmonic index as long as it is inside C3..C8.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ToneError::UnknownPitch(s.to_string());
        let trimmed = s.trim();

        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(unknown)?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(unknown()),
        };

        let rest = chars.as_str();
        let octave_start = rest
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(unknown)?;
        let (accidentals, octave) = rest.split_at(octave_start);

        let mut alter: i32 = 0;
        for c in accidentals.chars() {
            match c {
                '#' | '♯' | 's' => alter += 1,
                'b' | '♭' | 'f' => alter -= 1,
                _ => return Err(unknown()),
            }
        }
        if alter.abs() > 2 {
            return Err(unknown());
        }

        if octave.is_empty() || !octave.chars().all(|c| c.is_ascii_digit()) {
            return Err(unknown());
        }
        let octave: i32 = octave.parse().map_err(|_| unknown())?;

        let index = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|semis| semis.checked_add(base + alter))
            .and_then(|midi| midi.checked_sub(MIDI_C3 as i32 - 1))
            .ok_or_else(unknown)?;
        let pitch = u8::try_from(index)
            .ok()
            .and_then(Pitch::from_index)
            .ok_or_else(unknown)?;

        log::trace!("parsed pitch '{}' as {} (index {})", s, pitch, pitch.index());
        Ok(pitch)
    }
}

impl TryFrom<String> for Pitch {
    type Error = ToneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.name()
    }
}

impl From<Pitch> for u8 {
    fn from(pitch: Pitch) -> Self {
        pitch.index()
    }
}

// Symbol namespace of the original header: offset+1 into the pitch table.
// Flat spellings use the `f` suffix and alias the sharp entry.
#[allow(non_upper_case_globals)]
pub mod symbols {
    use super::Pitch;

    pub const NOTE_C3: u8 = 1;
    pub const NOTE_Cs3: u8 = 2;
    pub const NOTE_Df3: u8 = NOTE_Cs3;
    pub const NOTE_D3: u8 = 3;
    pub const NOTE_Ds3: u8 = 4;
    pub const NOTE_Ef3: u8 = NOTE_Ds3;
    pub const NOTE_E3: u8 = 5;
    pub const NOTE_F3: u8 = 6;
    pub const NOTE_Fs3: u8 = 7;
    pub const NOTE_Gf3: u8 = NOTE_Fs3;
    pub const NOTE_G3: u8 = 8;
    pub const NOTE_Gs3: u8 = 9;
    pub const NOTE_Af3: u8 = NOTE_Gs3;
    pub const NOTE_A3: u8 = 10;
    pub const NOTE_As3: u8 = 11;
    pub const NOTE_Bf3: u8 = NOTE_As3;
    pub const NOTE_B3: u8 = 12;
    pub const NOTE_C4: u8 = 13;
    pub const NOTE_Cs4: u8 = 14;
    pub const NOTE_Df4: u8 = NOTE_Cs4;
    pub const NOTE_D4: u8 = 15;
    pub const NOTE_Ds4: u8 = 16;
    pub const NOTE_Ef4: u8 = NOTE_Ds4;
    pub const NOTE_E4: u8 = 17;
    pub const NOTE_F4: u8 = 18;
    pub const NOTE_Fs4: u8 = 19;
    pub const NOTE_Gf4: u8 = NOTE_Fs4;
    pub const NOTE_G4: u8 = 20;
    pub const NOTE_Gs4: u8 = 21;
    pub const NOTE_Af4: u8 = NOTE_Gs4;
    pub const NOTE_A4: u8 = 22;
    pub const NOTE_As4: u8 = 23;
    pub const NOTE_Bf4: u8 = NOTE_As4;
    pub const NOTE_B4: u8 = 24;
    pub const NOTE_C5: u8 = 25;
    pub const NOTE_Cs5: u8 = 26;
    pub const NOTE_Df5: u8 = NOTE_Cs5;
    pub const NOTE_D5: u8 = 27;
    pub const NOTE_Ds5: u8 = 28;
    pub const NOTE_Ef5: u8 = NOTE_Ds5;
    pub const NOTE_E5: u8 = 29;
    pub const NOTE_F5: u8 = 30;
    pub const NOTE_Fs5: u8 = 31;
    pub const NOTE_Gf5: u8 = NOTE_Fs5;
    pub const NOTE_G5: u8 = 32;
    pub const NOTE_Gs5: u8 = 33;
    pub const NOTE_Af5: u8 = NOTE_Gs5;
    pub const NOTE_A5: u8 = 34;
    pub const NOTE_As5: u8 = 35;
    pub const NOTE_Bf5: u8 = NOTE_As5;
    pub const NOTE_B5: u8 = 36;
    pub const NOTE_C6: u8 = 37;
    pub const NOTE_Cs6: u8 = 38;
    pub const NOTE_Df6: u8 = NOTE_Cs6;
    pub const NOTE_D6: u8 = 39;
    pub const NOTE_Ds6: u8 = 40;
    pub const NOTE_Ef6: u8 = NOTE_Ds6;
    pub const NOTE_E6: u8 = 41;
    pub const NOTE_F6: u8 = 42;
    pub const NOTE_Fs6: u8 = 43;
    pub const NOTE_Gf6: u8 = NOTE_Fs6;
    pub const NOTE_G6: u8 = 44;
    pub const NOTE_Gs6: u8 = 45;
    pub const NOTE_Af6: u8 = NOTE_Gs6;
    pub const NOTE_A6: u8 = 46;
    pub const NOTE_As6: u8 = 47;
    pub const NOTE_Bf6: u8 = NOTE_As6;
    pub const NOTE_B6: u8 = 48;
    pub const NOTE_C7: u8 = 49;
    pub const NOTE_Cs7: u8 = 50;
    pub const NOTE_Df7: u8 = NOTE_Cs7;
    pub const NOTE_D7: u8 = 51;
    pub const NOTE_Ds7: u8 = 52;
    pub const NOTE_Ef7: u8 = NOTE_Ds7;
    pub const NOTE_E7: u8 = 53;
    pub const NOTE_F7: u8 = 54;
    pub const NOTE_Fs7: u8 = 55;
    pub const NOTE_Gf7: u8 = NOTE_Fs7;
    pub const NOTE_G7: u8 = 56;
    pub const NOTE_Gs7: u8 = 57;
    pub const NOTE_Af7: u8 = NOTE_Gs7;
    pub const NOTE_A7: u8 = 58;
    pub const NOTE_As7: u8 = 59;
    pub const NOTE_Bf7: u8 = NOTE_As7;
    pub const NOTE_B7: u8 = 60;
    pub const NOTE_C8: u8 = 61;

    /// `NOTE_A4` is the 440 Hz tuning reference
    pub const NOTE_REFERENCE: u8 = NOTE_A4;

    const _: () = assert!(NOTE_A4 == Pitch::A4.index());
    const _: () = assert!(NOTE_C8 == Pitch::C8.index());
}

#[cfg(test)]
mod tests {
    use super::symbols::*;
    use super::*;

    #[test]
    fn test_table_bounds() {
        assert_eq!(Pitch::C3.index(), 1);
        assert_eq!(Pitch::C8.index(), 61);
        assert_eq!(Pitch::ALL.len(), NTONE_PITCH as usize);
    }

    #[test]
    fn test_indices_step_by_one_semitone() {
        for (i, pitch) in Pitch::iter().enumerate() {
            assert_eq!(pitch.index() as usize, i + 1, "{} out of order", pitch);
        }
        for pair in Pitch::ALL.windows(2) {
            assert_eq!(pair[1].index(), pair[0].index() + 1);
            assert_eq!(pair[1].midi_number(), pair[0].midi_number() + 1);
        }
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Pitch::from_index(0), None);
        assert_eq!(Pitch::from_index(1), Some(Pitch::C3));
        assert_eq!(Pitch::from_index(22), Some(Pitch::A4));
        assert_eq!(Pitch::from_index(61), Some(Pitch::C8));
        assert_eq!(Pitch::from_index(62), None);
    }

    #[test]
    fn test_enharmonic_aliases_share_index() {
        assert_eq!(Pitch::Db3, Pitch::Cs3);
        assert_eq!(Pitch::Eb4, Pitch::Ds4);
        assert_eq!(Pitch::Gb5, Pitch::Fs5);
        assert_eq!(Pitch::Ab6, Pitch::Gs6);
        assert_eq!(Pitch::Bb7, Pitch::As7);
        assert_eq!(Pitch::Df3, Pitch::Cs3);
        assert_eq!(Pitch::Ef4, Pitch::Eb4);
        assert_eq!(Pitch::Gf5, Pitch::Fs5);
        assert_eq!(Pitch::Af6, Pitch::Gs6);
        assert_eq!(Pitch::Bf7, Pitch::As7);
        assert_eq!(Pitch::Df7.index(), NOTE_Df7);

        assert_eq!(NOTE_Df3, NOTE_Cs3);
        assert_eq!(NOTE_Ef5, NOTE_Ds5);
        assert_eq!(NOTE_Gf6, NOTE_Fs6);
        assert_eq!(NOTE_Af4, NOTE_Gs4);
        assert_eq!(NOTE_Bf7, NOTE_As7);
    }

    #[test]
    fn test_every_flat_spelling_parses_to_sharp() {
        for pitch in Pitch::iter().filter(|p| p.is_accidental()) {
            let flat = pitch.flat_name().unwrap();
            assert_eq!(flat.parse::<Pitch>().unwrap(), pitch, "{}", flat);
            let f_style = flat.replace('b', "f");
            assert_eq!(f_style.parse::<Pitch>().unwrap(), pitch, "{}", f_style);
        }
    }

    #[test]
    fn test_symbol_constants_match_enum() {
        assert_eq!(NOTE_C3, Pitch::C3.index());
        assert_eq!(NOTE_A4, 22);
        assert_eq!(NOTE_REFERENCE, Pitch::A4.index());
        assert_eq!(NOTE_B7, 60);
        assert_eq!(NOTE_C8, NTONE_PITCH);
    }

    #[test]
    fn test_from_str_spellings() {
        assert_eq!("A4".parse::<Pitch>().unwrap(), Pitch::A4);
        assert_eq!("a4".parse::<Pitch>().unwrap(), Pitch::A4);
        assert_eq!("C#4".parse::<Pitch>().unwrap(), Pitch::Cs4);
        assert_eq!("Cs4".parse::<Pitch>().unwrap(), Pitch::Cs4);
        assert_eq!("C♯4".parse::<Pitch>().unwrap(), Pitch::Cs4);
        assert_eq!("D♭4".parse::<Pitch>().unwrap(), Pitch::Cs4);
        assert_eq!("Bb3".parse::<Pitch>().unwrap(), Pitch::As3);
        assert_eq!("bb3".parse::<Pitch>().unwrap(), Pitch::As3);
        assert_eq!("B#3".parse::<Pitch>().unwrap(), Pitch::C4);
        assert_eq!("Fb4".parse::<Pitch>().unwrap(), Pitch::E4);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("".parse::<Pitch>().is_err());
        assert!("H4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("C#".parse::<Pitch>().is_err());
        assert!("B2".parse::<Pitch>().is_err());
        assert!("Cb3".parse::<Pitch>().is_err());
        assert!("C#8".parse::<Pitch>().is_err());
        assert!("C9".parse::<Pitch>().is_err());
        assert!("C###4".parse::<Pitch>().is_err());
        assert!("Cx4".parse::<Pitch>().is_err());
        assert!("C4x".parse::<Pitch>().is_err());
        assert!("C200000000".parse::<Pitch>().is_err());
        assert!("C99999999999".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(Pitch::Cs4.name(), "C#4");
        assert_eq!(Pitch::Cs4.flat_name().as_deref(), Some("Db4"));
        assert_eq!(Pitch::E4.flat_name(), None);
        assert_eq!(format!("{}", Pitch::C8), "C8");
        assert_eq!(Pitch::As5.letter(), 'A');
        assert_eq!(Pitch::As5.octave(), 5);
    }

    #[test]
    fn test_midi_numbers() {
        assert_eq!(Pitch::C3.midi_number(), 48);
        assert_eq!(Pitch::C4.midi_number(), 60);
        assert_eq!(Pitch::A4.midi_number(), 69);
        assert_eq!(Pitch::from_midi_number(69), Some(Pitch::A4));
        assert_eq!(Pitch::from_midi_number(47), None);
        assert_eq!(Pitch::from_midi_number(109), None);
    }

    #[test]
    fn test_transpose() {
        assert_eq!(Pitch::A4.transpose(12).unwrap(), Pitch::A5);
        assert_eq!(Pitch::A4.transpose(-1).unwrap(), Pitch::Gs4);
        assert!(matches!(Pitch::C3.transpose(-1), Err(ToneError::OutOfRange(0))));
        assert!(Pitch::C8.transpose(1).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Pitch::Fs4).unwrap();
        assert_eq!(json, "\"F#4\"");

        let parsed: Pitch = serde_json::from_str("\"Gb4\"").unwrap();
        assert_eq!(parsed, Pitch::Fs4);
        assert!(serde_json::from_str::<Pitch>("\"X4\"").is_err());
    }
}
