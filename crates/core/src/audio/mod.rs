//! Sonification of step events.
//!
//! Each step plays one note whose pitch rises with the bar height. The tone
//! generator needs the `audio` feature and an output device; without either
//! the [`SilentPlayer`] is used and sorting is unaffected.

#[cfg(feature = "audio")]
mod tone;

use std::time::Duration;

#[cfg(feature = "audio")]
pub use tone::ToneSynth;

use crate::{config::AudioConfig, EventSink, StepEvent, VisualizerConfig};

const MAX_MIDI_NOTE: u32 = 127;

/// Maps a bar height in pixels to a MIDI note number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchMap {
    pub base_pitch: u8,
    pub pitch_range: u8,
    pub surface_height: u32,
}

impl PitchMap {
    pub fn new(config: &AudioConfig, surface_height: u32) -> Self {
        Self {
            base_pitch: config.base_pitch,
            pitch_range: config.pitch_range,
            surface_height,
        }
    }

    /// `base + magnitude * range / height`, clamped to the MIDI range.
    pub fn pitch(&self, magnitude: u32) -> u8 {
        let height = u64::from(self.surface_height.max(1));
        let offset = u64::from(magnitude) * u64::from(self.pitch_range) / height;
        let note = (u64::from(self.base_pitch) + offset).min(u64::from(MAX_MIDI_NOTE));
        note as u8
    }
}

/// Equal-tempered frequency of a MIDI note, A4 = 440 Hz.
pub fn note_frequency(note: u8) -> f32 {
    440.0 * 2f32.powf((f32::from(note) - 69.0) / 12.0)
}

/// Plays one note per call. Implementations must cope with being called from
/// the run thread many times per second.
pub trait NotePlayer {
    /// Sounds the pitch for `magnitude`, holds it for `sustain` and releases.
    fn play(&mut self, magnitude: u32, sustain: Duration);
}

/// Player used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl NotePlayer for SilentPlayer {
    fn play(&mut self, _magnitude: u32, _sustain: Duration) {}
}

impl<P: NotePlayer + ?Sized> NotePlayer for Box<P> {
    fn play(&mut self, magnitude: u32, sustain: Duration) {
        (**self).play(magnitude, sustain);
    }
}

/// Adapts a [`NotePlayer`] to the event stream: every step sounds the value
/// it left behind for the length of the pacing delay.
#[derive(Debug)]
pub struct NoteSink<P> {
    player: P,
}

impl<P: NotePlayer> NoteSink<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn into_inner(self) -> P {
        self.player
    }
}

impl<P: NotePlayer> EventSink for NoteSink<P> {
    fn on_step(&mut self, event: &StepEvent, _values: &[u32], pace: Duration) {
        self.player.play(event.value, pace);
    }
}

/// Opens the best available player. Device failures are logged and fall back
/// to silence.
pub fn open_player(config: &VisualizerConfig) -> Box<dyn NotePlayer> {
    if !config.audio.enabled {
        tracing::debug!("sonification disabled by configuration");
        return Box::new(SilentPlayer);
    }

    #[cfg(feature = "audio")]
    match ToneSynth::open(&config.audio, config.surface.height) {
        Ok(synth) => return Box::new(synth),
        Err(err) => tracing::warn!(%err, "continuing without sound"),
    }

    #[cfg(not(feature = "audio"))]
    tracing::debug!("built without the `audio` feature; notes are silent");

    Box::new(SilentPlayer)
}
