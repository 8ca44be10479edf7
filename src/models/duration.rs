//! Note durations in milliseconds at the 120 BPM reference tempo
//!
//! The `DUR_n_d` constants are the n/d note lengths for d in 1, 2, 4, 8,
//! 16, 32. Non-reduced fractions (2/4, 4/8, 8/16, ...) are defined in
//! terms of the shorter spelling, so they always agree. Thirty-second
//! values are the literal rounded numbers (1/32 = 63 ms, not 62.5).

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ToneError};

/// Tempo the duration table was written for
pub const TEMPO_BPM: u32 = 120;

/// A quarter note at [`TEMPO_BPM`]
pub const MILLIS_PER_QUARTER: u16 = DUR_1_4;

/// Finest subdivision in the table
pub const SMALLEST_DENOMINATOR: u32 = 32;

pub const DUR_1_1: u16 = 2000;
pub const DUR_1_2: u16 = 1000;
pub const DUR_2_2: u16 = DUR_1_1;
pub const DUR_1_4: u16 = 500;
pub const DUR_2_4: u16 = DUR_1_2;
pub const DUR_3_4: u16 = 1500;
pub const DUR_4_4: u16 = DUR_2_2;
pub const DUR_1_8: u16 = 250;
pub const DUR_2_8: u16 = DUR_1_4;
pub const DUR_3_8: u16 = 750;
pub const DUR_4_8: u16 = DUR_2_4;
pub const DUR_5_8: u16 = 1250;
pub const DUR_6_8: u16 = DUR_3_4;
pub const DUR_7_8: u16 = 1750;
pub const DUR_8_8: u16 = DUR_4_4;
pub const DUR_1_16: u16 = 125;
pub const DUR_2_16: u16 = DUR_1_8;
pub const DUR_3_16: u16 = 375;
pub const DUR_4_16: u16 = DUR_2_8;
pub const DUR_5_16: u16 = 625;
pub const DUR_6_16: u16 = DUR_3_8;
pub const DUR_7_16: u16 = 875;
pub const DUR_8_16: u16 = DUR_4_8;
pub const DUR_9_16: u16 = 1125;
pub const DUR_10_16: u16 = DUR_5_8;
pub const DUR_11_16: u16 = 1375;
pub const DUR_12_16: u16 = DUR_6_8;
pub const DUR_13_16: u16 = 1625;
pub const DUR_14_16: u16 = DUR_7_8;
pub const DUR_15_16: u16 = 1875;
pub const DUR_16_16: u16 = DUR_8_8;
pub const DUR_1_32: u16 = 63;
pub const DUR_2_32: u16 = DUR_1_16;
pub const DUR_3_32: u16 = 188;
pub const DUR_4_32: u16 = DUR_2_16;
pub const DUR_5_32: u16 = 313;
pub const DUR_6_32: u16 = DUR_3_16;
pub const DUR_7_32: u16 = 438;
pub const DUR_8_32: u16 = DUR_4_16;
pub const DUR_9_32: u16 = 563;
pub const DUR_10_32: u16 = DUR_5_16;
pub const DUR_11_32: u16 = 688;
pub const DUR_12_32: u16 = DUR_6_16;
pub const DUR_13_32: u16 = 813;
pub const DUR_14_32: u16 = DUR_7_16;
pub const DUR_15_32: u16 = 938;
pub const DUR_16_32: u16 = DUR_8_16;
pub const DUR_17_32: u16 = 1063;
pub const DUR_18_32: u16 = DUR_9_16;
pub const DUR_19_32: u16 = 1188;
pub const DUR_20_32: u16 = DUR_10_16;
pub const DUR_21_32: u16 = 1313;
pub const DUR_22_32: u16 = DUR_11_16;
pub const DUR_23_32: u16 = 1438;
pub const DUR_24_32: u16 = DUR_12_16;
pub const DUR_25_32: u16 = 1563;
pub const DUR_26_32: u16 = DUR_13_16;
pub const DUR_27_32: u16 = 1688;
pub const DUR_28_32: u16 = DUR_14_16;
pub const DUR_29_32: u16 = 1813;
pub const DUR_30_32: u16 = DUR_15_16;
pub const DUR_31_32: u16 = 1938;
pub const DUR_32_32: u16 = DUR_16_16;

/// Millisecond value of n/32 at index n-1
const MILLIS_BY_32ND: [u16; SMALLEST_DENOMINATOR as usize] = [
    DUR_1_32, DUR_2_32, DUR_3_32, DUR_4_32,
    DUR_5_32, DUR_6_32, DUR_7_32, DUR_8_32,
    DUR_9_32, DUR_10_32, DUR_11_32, DUR_12_32,
    DUR_13_32, DUR_14_32, DUR_15_32, DUR_16_32,
    DUR_17_32, DUR_18_32, DUR_19_32, DUR_20_32,
    DUR_21_32, DUR_22_32, DUR_23_32, DUR_24_32,
    DUR_25_32, DUR_26_32, DUR_27_32, DUR_28_32,
    DUR_29_32, DUR_30_32, DUR_31_32, DUR_32_32,
];

/// Table lookup for a raw fraction. `None` when the fraction is not in the table.
pub fn duration_millis(numerator: u32, denominator: u32) -> Option<u16> {
    NoteLength::new(numerator, denominator).ok().map(NoteLength::millis)
}

/// A note length that is guaranteed to be in the duration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteLength {
    ratio: Ratio<u32>,
}

impl NoteLength {
    pub const WHOLE: NoteLength = NoteLength::reduced(1, 1);
    pub const HALF: NoteLength = NoteLength::reduced(1, 2);
    pub const QUARTER: NoteLength = NoteLength::reduced(1, 4);
    pub const EIGHTH: NoteLength = NoteLength::reduced(1, 8);
    pub const SIXTEENTH: NoteLength = NoteLength::reduced(1, 16);
    pub const THIRTY_SECOND: NoteLength = NoteLength::reduced(1, 32);

    pub const DOTTED_HALF: NoteLength = NoteLength::reduced(3, 4);
    pub const DOTTED_QUARTER: NoteLength = NoteLength::reduced(3, 8);
    pub const DOTTED_EIGHTH: NoteLength = NoteLength::reduced(3, 16);
    pub const DOTTED_SIXTEENTH: NoteLength = NoteLength::reduced(3, 32);

    // Caller guarantees the fraction is already in lowest terms.
    const fn reduced(numerator: u32, denominator: u32) -> NoteLength {
        NoteLength {
            ratio: Ratio::new_raw(numerator, denominator),
        }
    }

    /// Build from any table fraction, e.g. `new(6, 8)` is the same length as `new(3, 4)`.
    pub fn new(numerator: u32, denominator: u32) -> Result<NoteLength> {
        let valid_denominator =
            denominator.is_power_of_two() && denominator <= SMALLEST_DENOMINATOR;
        if !valid_denominator || numerator == 0 || numerator > denominator {
            return Err(ToneError::UnknownDuration(format!(
                "{}/{}",
                numerator, denominator
            )));
        }
        Ok(NoteLength {
            ratio: Ratio::new(numerator, denominator),
        })
    }

    /// Build from a count of thirty-second notes (1..=32)
    pub fn from_thirty_seconds(count: u32) -> Result<NoteLength> {
        NoteLength::new(count, SMALLEST_DENOMINATOR)
    }

    /// Fraction of a whole note, in lowest terms
    pub fn ratio(self) -> Ratio<u32> {
        self.ratio
    }

    pub fn numerator(self) -> u32 {
        *self.ratio.numer()
    }

    pub fn denominator(self) -> u32 {
        *self.ratio.denom()
    }

    /// Length counted in thirty-second notes
    pub fn thirty_seconds(self) -> u32 {
        self.numerator() * (SMALLEST_DENOMINATOR / self.denominator())
    }

    /// Milliseconds at 120 BPM, straight from the table
    pub fn millis(self) -> u16 {
        MILLIS_BY_32ND[(self.thirty_seconds() - 1) as usize]
    }

    /// Milliseconds at another tempo.
    ///
    /// Scales the table value by `120 / bpm` and rounds half up, so at
    /// 120 BPM this returns exactly [`NoteLength::millis`].
    pub fn millis_at(self, bpm: u32) -> Result<u32> {
        if bpm == 0 {
            return Err(ToneError::InvalidConfig("tempo must be above 0 BPM".into()));
        }
        let scaled = self.millis() as u64 * TEMPO_BPM as u64 * 2 + bpm as u64;
        let millis = scaled / (bpm as u64 * 2);
        u32::try_from(millis).map_err(|_| ToneError::InvalidConfig(format!("tempo {} BPM", bpm)))
    }

    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_millis(self.millis() as u64)
    }

    /// Dotted variant (one and a half times as long), if the table has it
    pub fn dotted(self) -> Option<NoteLength> {
        let ratio = self.ratio * Ratio::new(3, 2);
        NoteLength::new(*ratio.numer(), *ratio.denom()).ok()
    }
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}

impl FromStr for NoteLength {
    type Err = ToneError;

    /// "3/8", "3_8" or a bare "1" for a whole note
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || ToneError::UnknownDuration(s.to_string());
        let trimmed = s.trim();

        let (numerator, denominator) = match trimmed.split_once(|c| c == '/' || c == '_') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (trimmed, "1"),
        };
        let numerator: u32 = numerator.parse().map_err(|_| unknown())?;
        let denominator: u32 = denominator.parse().map_err(|_| unknown())?;

        NoteLength::new(numerator, denominator).map_err(|_| unknown())
    }
}

impl TryFrom<String> for NoteLength {
    type Error = ToneError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NoteLength> for String {
    fn from(length: NoteLength) -> Self {
        length.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(DUR_1_4, 500);
        assert_eq!(DUR_1_1, 2000);
        assert_eq!(DUR_1_2, 1000);
        assert_eq!(MILLIS_PER_QUARTER, 500);
        assert_eq!(NoteLength::QUARTER.millis(), 500);
        assert_eq!(NoteLength::WHOLE.millis(), 2000);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(DUR_2_4, DUR_1_2);
        assert_eq!(DUR_4_8, DUR_1_2);
        assert_eq!(DUR_8_16, DUR_1_2);
        assert_eq!(DUR_16_32, DUR_1_2);
        assert_eq!(DUR_2_2, DUR_1_1);
        assert_eq!(DUR_32_32, DUR_1_1);
        assert_eq!(DUR_6_8, DUR_3_4);
        assert_eq!(DUR_10_16, DUR_5_8);
        assert_eq!(DUR_18_32, DUR_9_16);
        assert_eq!(DUR_30_32, DUR_15_16);
    }

    #[test]
    fn test_every_fraction_matches_reduced_form() {
        let mut den = 1;
        while den <= SMALLEST_DENOMINATOR {
            for num in 1..=den {
                let ratio = Ratio::new(num, den);
                assert_eq!(
                    duration_millis(num, den),
                    duration_millis(*ratio.numer(), *ratio.denom()),
                    "{}/{}",
                    num,
                    den
                );
            }
            den *= 2;
        }
    }

    #[test]
    fn test_thirty_second_rounding_is_literal() {
        let expected = [
            63, 188, 313, 438, 563, 688, 813, 938, 1063, 1188, 1313, 1438, 1563, 1688, 1813, 1938,
        ];
        for (i, &ms) in expected.iter().enumerate() {
            let n = 2 * i as u32 + 1;
            assert_eq!(duration_millis(n, 32), Some(ms), "{}/32", n);
        }
        assert_eq!(DUR_1_32, 63);
        assert_eq!(DUR_31_32, 1938);
    }

    #[test]
    fn test_exact_values_follow_formula() {
        // Everything but the odd thirty-seconds is exact at 120 BPM
        for n in (2..=32).step_by(2) {
            let exact = n as u32 * 2000 / 32;
            assert_eq!(duration_millis(n, 32), Some(exact as u16));
        }
    }

    #[test]
    fn test_new_rejects_unknown_fractions() {
        assert!(NoteLength::new(0, 4).is_err());
        assert!(NoteLength::new(5, 4).is_err());
        assert!(NoteLength::new(1, 3).is_err());
        assert!(NoteLength::new(1, 64).is_err());
        assert!(NoteLength::new(1, 0).is_err());
        assert_eq!(duration_millis(1, 64), None);
    }

    #[test]
    fn test_new_reduces() {
        let length = NoteLength::new(6, 8).unwrap();
        assert_eq!(length, NoteLength::DOTTED_HALF);
        assert_eq!(length.numerator(), 3);
        assert_eq!(length.denominator(), 4);
        assert_eq!(length.thirty_seconds(), 24);
        assert_eq!(NoteLength::from_thirty_seconds(8).unwrap(), NoteLength::QUARTER);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("1/4".parse::<NoteLength>().unwrap(), NoteLength::QUARTER);
        assert_eq!("2/4".parse::<NoteLength>().unwrap(), NoteLength::HALF);
        assert_eq!("3_8".parse::<NoteLength>().unwrap(), NoteLength::DOTTED_QUARTER);
        assert_eq!(" 1 ".parse::<NoteLength>().unwrap(), NoteLength::WHOLE);
        assert!("1/3".parse::<NoteLength>().is_err());
        assert!("x/4".parse::<NoteLength>().is_err());
        assert!("".parse::<NoteLength>().is_err());
    }

    #[test]
    fn test_millis_at_other_tempos() {
        assert_eq!(NoteLength::QUARTER.millis_at(120).unwrap(), 500);
        assert_eq!(NoteLength::QUARTER.millis_at(60).unwrap(), 1000);
        assert_eq!(NoteLength::QUARTER.millis_at(240).unwrap(), 250);
        assert_eq!(NoteLength::THIRTY_SECOND.millis_at(120).unwrap(), 63);
        assert!(NoteLength::QUARTER.millis_at(0).is_err());
    }

    #[test]
    fn test_dotted() {
        assert_eq!(NoteLength::QUARTER.dotted(), Some(NoteLength::DOTTED_QUARTER));
        assert_eq!(NoteLength::HALF.dotted(), Some(NoteLength::DOTTED_HALF));
        assert_eq!(NoteLength::WHOLE.dotted(), None);
        assert_eq!(NoteLength::THIRTY_SECOND.dotted(), None);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(NoteLength::new(4, 8).unwrap().to_string(), "1/2");
        let json = serde_json::to_string(&NoteLength::DOTTED_EIGHTH).unwrap();
        assert_eq!(json, "\"3/16\"");
        let parsed: NoteLength = serde_json::from_str("\"6/32\"").unwrap();
        assert_eq!(parsed, NoteLength::DOTTED_EIGHTH);
    }
}
