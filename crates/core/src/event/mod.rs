use std::{
    fmt,
    sync::{mpsc::Sender, Arc, Mutex, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};

/// Role of the indices touched by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Elements were read and compared, or an index was visited.
    Compare,
    /// Two slots exchanged values.
    Swap,
    /// A value was written into a slot.
    Place,
    /// Confirmation sweep after a completed sort.
    Finalize,
}

/// One observable action of a sorting routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub kind: StepKind,
    pub primary: usize,
    pub secondary: Option<usize>,
    /// Value at `primary` after the action. Drives the note pitch.
    pub value: u32,
}

impl StepEvent {
    pub fn new(kind: StepKind, primary: usize, value: u32) -> Self {
        Self {
            kind,
            primary,
            secondary: None,
            value,
        }
    }

    pub fn with_secondary(mut self, secondary: usize) -> Self {
        self.secondary = Some(secondary);
        self
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} #{}", self.kind, self.primary)?;
        if let Some(secondary) = self.secondary {
            write!(f, " ~ #{secondary}")?;
        }
        write!(f, " = {}", self.value)
    }
}

/// Consumer of step events. Called synchronously from the run thread, in the
/// order the algorithm produces the events.
pub trait EventSink {
    /// `values` is a consistent snapshot of the array after the step and
    /// `pace` the delay the run will sleep before its next step.
    fn on_step(&mut self, event: &StepEvent, values: &[u32], pace: Duration);

    /// Replays a step that crossed threads through a [`ChannelSink`].
    fn on_frame(&mut self, frame: &StepFrame) {
        self.on_step(&frame.event, &frame.values, frame.pace);
    }
}

/// Lets a sink stay reachable from outside the set or thread it was handed to.
impl<S: EventSink + ?Sized> EventSink for Arc<Mutex<S>> {
    fn on_step(&mut self, event: &StepEvent, values: &[u32], pace: Duration) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_step(event, values, pace);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_step(&mut self, _event: &StepEvent, _values: &[u32], _pace: Duration) {}
}

/// Fans each event out to several sinks in registration order.
///
/// Members need not be `Send`: a set usually lives on the display thread and
/// is fed from a channel.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn EventSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkSet {
    fn on_step(&mut self, event: &StepEvent, values: &[u32], pace: Duration) {
        for sink in &mut self.sinks {
            sink.on_step(event, values, pace);
        }
    }
}

impl fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkSet")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// A step together with the snapshot it was emitted with.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFrame {
    pub event: StepEvent,
    pub values: Vec<u32>,
    pub pace: Duration,
}

/// Forwards steps to another thread, typically the one that owns the display.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<StepFrame>,
}

impl ChannelSink {
    pub fn new(tx: Sender<StepFrame>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn on_step(&mut self, event: &StepEvent, values: &[u32], pace: Duration) {
        // A closed receiver means nobody is watching any more; the run itself
        // carries on until stopped.
        let _ = self.tx.send(StepFrame {
            event: *event,
            values: values.to_vec(),
            pace,
        });
    }
}
