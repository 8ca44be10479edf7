//! WASM API for the tone tables
//!
//! Thin JavaScript-facing wrappers: everything is computed by the Rust
//! modules and errors cross the boundary as strings.

use wasm_bindgen::prelude::*;

use crate::config::PlaybackConfig;
use crate::melody::Melody;
use crate::midi::melody_to_smf;
use crate::models::{NoteLength, Pitch};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    log::warn!("[WASM] {}", e);
    JsValue::from_str(&e.to_string())
}

/// Pitch table index (1..=61) for a note name such as "C#4" or "Db4"
#[wasm_bindgen(js_name = lookupPitch)]
pub fn lookup_pitch(name: &str) -> Result<u8, JsValue> {
    name.parse::<Pitch>().map(Pitch::index).map_err(to_js_error)
}

/// Milliseconds at 120 BPM for a fraction such as "3/8"
#[wasm_bindgen(js_name = lookupDuration)]
pub fn lookup_duration(fraction: &str) -> Result<u16, JsValue> {
    fraction
        .parse::<NoteLength>()
        .map(NoteLength::millis)
        .map_err(to_js_error)
}

/// Tabled frequency in Hz for a pitch index; 0 (rest) gives 0
#[wasm_bindgen(js_name = pitchFrequency)]
pub fn pitch_frequency(index: u8) -> Result<u16, JsValue> {
    if index == crate::models::tone::REST_INDEX {
        return Ok(0);
    }
    Pitch::from_index(index)
        .map(Pitch::frequency_hz)
        .ok_or_else(|| to_js_error(format!("no pitch with index {}", index)))
}

/// Parse token text into `{ name, notes }`
#[wasm_bindgen(js_name = parseMelody)]
pub fn parse_melody(text: &str) -> Result<JsValue, JsValue> {
    let melody = Melody::parse(text).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&melody).map_err(to_js_error)
}

/// Playback events (`{ frequency_hz, millis }`) for token text at a tempo
#[wasm_bindgen(js_name = melodyEvents)]
pub fn melody_events(text: &str, tempo_bpm: u32) -> Result<JsValue, JsValue> {
    let melody = Melody::parse(text).map_err(to_js_error)?;
    let events = melody
        .events(&PlaybackConfig::with_tempo(tempo_bpm))
        .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&events).map_err(to_js_error)
}

/// SMF bytes for token text at a tempo
#[wasm_bindgen(js_name = melodyToMidi)]
pub fn melody_to_midi(text: &str, tempo_bpm: u32) -> Result<Vec<u8>, JsValue> {
    let melody = Melody::parse(text).map_err(to_js_error)?;
    melody_to_smf(&melody, &PlaybackConfig::with_tempo(tempo_bpm)).map_err(to_js_error)
}
