//! Standard MIDI File export
//!
//! Renders a [`Melody`] as a single-track (Format 0) SMF so a melody can
//! be auditioned on a desktop before it goes onto the buzzer.

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

use crate::config::PlaybackConfig;
use crate::error::{Result, ToneError};
use crate::melody::Melody;

const CHANNEL: u8 = 0;
const VELOCITY: u8 = 100;
/// Square wave lead (GM program 81, zero based)
const PROGRAM: u8 = 80;

/// Largest value of the 24-bit tempo meta event
const MAX_MICROSECONDS_PER_QUARTER: u32 = 0xFF_FFFF;
/// Largest variable-length delta time
const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Absolute tick of a position counted in thirty-seconds (a quarter is 8).
///
/// Positions are converted from the melody start so rounding never
/// accumulates, whatever the resolution.
fn ticks_at(thirty_seconds: u64, tpq: u16) -> u64 {
    thirty_seconds * tpq as u64 / 8
}

fn delta(ticks: u64) -> Result<u32> {
    if ticks > MAX_DELTA {
        return Err(ToneError::Midi(format!("delta time {} does not fit in a MIDI event", ticks)));
    }
    Ok(ticks as u32)
}

/// Convert a melody to SMF bytes
pub fn melody_to_smf(melody: &Melody, config: &PlaybackConfig) -> Result<Vec<u8>> {
    config.validate()?;

    let track = build_track(melody, config)?;
    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(config.ticks_per_quarter.into()),
        },
        tracks: vec![track],
    };

    let mut out = Vec::new();
    smf.write(&mut out)
        .map_err(|e| ToneError::Midi(format!("Failed to write MIDI: {}", e)))?;

    log::debug!(
        "wrote {} notes as {} bytes of MIDI at {} BPM",
        melody.len(),
        out.len(),
        config.tempo_bpm
    );
    Ok(out)
}

fn build_track<'a>(melody: &'a Melody, config: &PlaybackConfig) -> Result<Track<'a>> {
    let mut events = Vec::new();

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(melody.name.as_bytes())),
    });

    let microseconds_per_quarter = 60_000_000 / config.tempo_bpm;
    if microseconds_per_quarter > MAX_MICROSECONDS_PER_QUARTER {
        return Err(ToneError::Midi(format!(
            "tempo {} BPM is too slow for a MIDI tempo event",
            config.tempo_bpm
        )));
    }
    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter.into())),
    });

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Midi {
            channel: CHANNEL.into(),
            message: MidiMessage::ProgramChange {
                program: PROGRAM.into(),
            },
        },
    });

    // Rests only push the next note-on further out
    let tpq = config.ticks_per_quarter;
    let mut position: u64 = 0;
    let mut last_tick: u64 = 0;
    for note in &melody.notes {
        let start = ticks_at(position, tpq);
        position += note.length.thirty_seconds() as u64;
        let end = ticks_at(position, tpq);

        let Some(pitch) = note.tone.pitch() else {
            continue;
        };
        let key = pitch.midi_number();

        events.push(TrackEvent {
            delta: delta(start - last_tick)?.into(),
            kind: TrackEventKind::Midi {
                channel: CHANNEL.into(),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: VELOCITY.into(),
                },
            },
        });
        events.push(TrackEvent {
            delta: delta(end - start)?.into(),
            kind: TrackEventKind::Midi {
                channel: CHANNEL.into(),
                message: MidiMessage::NoteOff {
                    key: key.into(),
                    vel: 0.into(),
                },
            },
        });
        last_tick = end;
    }

    events.push(TrackEvent {
        delta: delta(ticks_at(position, tpq) - last_tick)?.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(events)
}
