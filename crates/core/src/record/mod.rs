use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Algorithm, EventSink, Result, RunStatus, StepEvent};

/// Serialisable trace of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub algorithm: Option<Algorithm>,
    pub initial: Vec<u32>,
    pub events: Vec<StepEvent>,
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default, rename = "final")]
    pub final_values: Vec<u32>,
}

/// Event sink that keeps every step of a run so it can be inspected or
/// written out as JSON.
#[derive(Debug, Default)]
pub struct EventRecorder {
    recording: Recording,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh recording, discarding anything captured before.
    pub fn begin(&mut self, algorithm: Algorithm, initial: Vec<u32>) {
        self.recording = Recording {
            algorithm: Some(algorithm),
            initial,
            ..Recording::default()
        };
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.recording.status = Some(status);
    }

    pub fn events(&self) -> &[StepEvent] {
        &self.recording.events
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.recording)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl EventSink for EventRecorder {
    fn on_step(&mut self, event: &StepEvent, values: &[u32], _pace: Duration) {
        self.recording.events.push(*event);
        self.recording.final_values.clear();
        self.recording.final_values.extend_from_slice(values);
    }
}
