//! Tone tables
//!
//! The pitch and duration tables, the rest/pitch distinction built on top
//! of them, and the index -> Hz table.

pub mod duration;
pub mod frequency;
pub mod pitch;
pub mod tone;

// Re-export commonly used types
pub use duration::*;
pub use pitch::symbols::*;
pub use pitch::{Pitch, NTONE_PITCH};
pub use tone::Tone;
