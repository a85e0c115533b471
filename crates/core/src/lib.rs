//! Core library for the Sorting Visualiser application.
//!
//! The crate animates sorting algorithms headlessly: a routine mutates an
//! [`ArrayModel`] on its own thread, reports every observable action as a
//! [`StepEvent`] to an [`EventSink`], sleeps for the pacing delay, and checks
//! the shared [`RunState`] so it can be stopped between steps. Drawing and
//! sound are ordinary sinks, which keeps the algorithms testable without a
//! display or an audio device.

pub mod array;
pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod pacing;
pub mod record;
pub mod render;
pub mod sort;
pub mod state;

pub use array::ArrayModel;
pub use audio::{open_player, NotePlayer, NoteSink, PitchMap, SilentPlayer};
pub use config::{AudioConfig, PacingConfig, VisualizerConfig};
pub use controller::{parse_size, RunController, RunOutcome, RunStart, SharedSink};
pub use error::{Result, SortVizError};
pub use event::{ChannelSink, EventSink, NullSink, SinkSet, StepEvent, StepFrame, StepKind};
pub use pacing::{Pacer, Speed};
pub use record::{EventRecorder, Recording};
pub use render::{Bar, BarColor, Frame, RenderSink, Renderer, TextRenderer};
pub use sort::{execute, is_sorted, Algorithm, Halt, RunStatus, StepContext};
pub use state::{RunPhase, RunState};
