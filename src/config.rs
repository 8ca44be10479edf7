//! Playback settings
//!
//! The tables are fixed at 120 BPM and A4 = 440 Hz. A `PlaybackConfig`
//! lets a player or exporter deviate from those without touching them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ToneError};
use crate::models::duration::TEMPO_BPM;
use crate::models::frequency::REFERENCE_HZ;

fn default_tempo_bpm() -> u32 {
    TEMPO_BPM
}

fn default_reference_hz() -> f64 {
    REFERENCE_HZ
}

fn default_ticks_per_quarter() -> u16 {
    480
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_tempo_bpm")]
    pub tempo_bpm: u32,

    /// Frequency of A4
    #[serde(default = "default_reference_hz")]
    pub reference_hz: f64,

    /// MIDI export resolution
    #[serde(default = "default_ticks_per_quarter")]
    pub ticks_per_quarter: u16,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: default_tempo_bpm(),
            reference_hz: default_reference_hz(),
            ticks_per_quarter: default_ticks_per_quarter(),
        }
    }
}

impl PlaybackConfig {
    pub fn with_tempo(tempo_bpm: u32) -> Self {
        Self {
            tempo_bpm,
            ..Self::default()
        }
    }

    /// Parse and validate a YAML document. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PlaybackConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading playback config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tempo_bpm == 0 {
            return Err(ToneError::InvalidConfig("tempo_bpm must be above 0".into()));
        }
        if !(self.reference_hz > 0.0 && self.reference_hz.is_finite()) {
            return Err(ToneError::InvalidConfig(format!(
                "reference_hz must be a positive frequency, got {}",
                self.reference_hz
            )));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return Err(ToneError::InvalidConfig(format!(
                "ticks_per_quarter must be in 1..=32767, got {}",
                self.ticks_per_quarter
            )));
        }
        Ok(())
    }

    /// True when the tables can be used as-is
    pub fn is_reference(&self) -> bool {
        self.tempo_bpm == TEMPO_BPM && self.reference_hz == REFERENCE_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlaybackConfig::default();
        assert_eq!(config.tempo_bpm, 120);
        assert_eq!(config.reference_hz, 440.0);
        assert_eq!(config.ticks_per_quarter, 480);
        assert!(config.is_reference());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = PlaybackConfig::from_yaml("tempo_bpm: 90\n").unwrap();
        assert_eq!(config.tempo_bpm, 90);
        assert_eq!(config.reference_hz, 440.0);
        assert!(!config.is_reference());
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        assert!(matches!(
            PlaybackConfig::from_yaml("tempo_bpm: 0\n"),
            Err(ToneError::InvalidConfig(_))
        ));
        assert!(PlaybackConfig::from_yaml("reference_hz: -1.0\n").is_err());
        assert!(PlaybackConfig::from_yaml("ticks_per_quarter: 0\n").is_err());
        assert!(matches!(
            PlaybackConfig::from_yaml("tempo_bpm: [1, 2]\n"),
            Err(ToneError::Yaml(_))
        ));
    }
}
