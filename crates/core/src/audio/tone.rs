use std::time::Duration;

use rodio::{
    source::{SineWave, Source},
    OutputStream, OutputStreamBuilder,
};

use super::{note_frequency, NotePlayer, PitchMap};
use crate::{config::AudioConfig, Result, SortVizError};

/// Sine-tone note player on the default output device.
pub struct ToneSynth {
    stream: OutputStream,
    pitch: PitchMap,
    gain: f32,
}

impl ToneSynth {
    pub fn open(config: &AudioConfig, surface_height: u32) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| SortVizError::DeviceUnavailable(err.to_string()))?;
        stream.log_on_drop(false);
        tracing::debug!("opened default output stream for notes");

        Ok(Self {
            stream,
            pitch: PitchMap::new(config, surface_height),
            gain: f32::from(config.velocity.min(127)) / 127.0 * 0.25,
        })
    }
}

impl NotePlayer for ToneSynth {
    fn play(&mut self, magnitude: u32, sustain: Duration) {
        if sustain.is_zero() {
            return;
        }
        let frequency = note_frequency(self.pitch.pitch(magnitude));
        let note = SineWave::new(frequency)
            .take_duration(sustain)
            .amplify(self.gain);
        self.stream.mixer().add(note);
    }
}

impl std::fmt::Debug for ToneSynth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneSynth")
            .field("pitch", &self.pitch)
            .field("gain", &self.gain)
            .finish()
    }
}
