//! Pong Tones
//!
//! Pitch and duration tables for the 1D LED pong game's sound effects,
//! plus the small amount of machinery needed to write melodies against
//! them: parsing, playback events, and MIDI export.
//!
//! ```
//! use pong_tones::models::{Pitch, NoteLength, DUR_1_4};
//!
//! assert_eq!(Pitch::A4.index(), 22);
//! assert_eq!(Pitch::A4.frequency_hz(), 440);
//! assert_eq!(NoteLength::QUARTER.millis(), DUR_1_4);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod melody;
pub mod midi;
pub mod models;

pub use config::PlaybackConfig;
pub use error::{Result, ToneError};
pub use melody::{Melody, Note, PlayEvent};
pub use models::{NoteLength, Pitch, Tone};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();

    log::info!("Pong tones WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        log::warn!("logger already initialized: {}", e);
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
