//! Instrumented sorting routines.
//!
//! Every routine works on an [`ArrayModel`] through a [`StepContext`]. Before
//! each comparison or mutation a routine calls [`StepContext::checkpoint`],
//! which bails out with [`Halt::Stopped`] once a stop was requested, and after
//! each observable action it emits exactly one [`StepEvent`]. A stopped
//! routine leaves the array exactly as it was after the last emitted step.

mod bubble;
mod bucket;
mod insertion;
mod merge;
mod quick;
mod random;
mod selection;

use std::{fmt, str::FromStr};

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{
    ArrayModel, EventSink, Pacer, Result, RunState, SortVizError, StepEvent, StepKind,
};

pub use bucket::{bucket_count, bucket_index, BUCKET_WIDTH};

/// The closed set of algorithms the visualiser can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bubble,
    /// Shuffle-until-sorted. Not guaranteed to terminate.
    Random,
    Insertion,
    Selection,
    Merge,
    Quick,
    Bucket,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Bubble,
        Algorithm::Random,
        Algorithm::Insertion,
        Algorithm::Selection,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Bucket,
    ];

    /// Short identifier used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Random => "random",
            Self::Insertion => "insertion",
            Self::Selection => "selection",
            Self::Merge => "merge",
            Self::Quick => "quick",
            Self::Bucket => "bucket",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Random => "Random Sort",
            Self::Insertion => "Insertion Sort",
            Self::Selection => "Selection Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Bucket => "Bucket Sort",
        }
    }

    /// Whether a completed run is guaranteed to happen.
    pub fn converges(self) -> bool {
        self != Self::Random
    }

    fn routine(self) -> fn(&mut StepContext<'_>) -> Step {
        match self {
            Self::Bubble => bubble::bubble_sort,
            Self::Random => random::random_sort,
            Self::Insertion => insertion::insertion_sort,
            Self::Selection => selection::selection_sort,
            Self::Merge => merge::merge_sort,
            Self::Quick => quick::quick_sort,
            Self::Bucket => bucket::bucket_sort,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    /// Accepts the short name (`quick`) as well as the label (`Quick Sort`),
    /// case-insensitively.
    fn from_str(input: &str) -> Result<Self> {
        let wanted = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| {
                wanted == algorithm.name() || wanted == algorithm.label().to_ascii_lowercase()
            })
            .ok_or_else(|| SortVizError::validation(format!("unknown algorithm `{input}`")))
    }
}

/// Why a routine returned before finishing.
#[derive(Debug)]
pub enum Halt {
    /// A stop was requested and observed at a checkpoint.
    Stopped,
    /// The routine hit an error such as an out-of-range index.
    Fault(SortVizError),
}

impl From<SortVizError> for Halt {
    fn from(value: SortVizError) -> Self {
        Self::Fault(value)
    }
}

/// Result type threaded through every routine.
pub type Step<T = ()> = std::result::Result<T, Halt>;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Stopped,
}

/// Everything a routine may touch while it runs.
pub struct StepContext<'a> {
    array: ArrayModel,
    sink: &'a mut dyn EventSink,
    state: RunState,
    pacer: Pacer,
    rng: StdRng,
    len: usize,
    steps: u64,
}

impl<'a> StepContext<'a> {
    pub fn new(
        array: ArrayModel,
        sink: &'a mut dyn EventSink,
        state: RunState,
        pacer: Pacer,
        rng: StdRng,
    ) -> Result<Self> {
        let len = array.len()?;
        Ok(Self {
            array,
            sink,
            state,
            pacer,
            rng,
            len,
            steps: 0,
        })
    }

    /// Length captured when the run began. Fixed for the whole run.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of step events emitted so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn checkpoint(&self) -> Step {
        if self.state.stop_requested() {
            Err(Halt::Stopped)
        } else {
            Ok(())
        }
    }

    pub fn get(&self, index: usize) -> Step<u32> {
        Ok(self.array.get(index)?)
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Step {
        Ok(self.array.swap(i, j)?)
    }

    pub fn set(&mut self, index: usize, value: u32) -> Step {
        Ok(self.array.set(index, value)?)
    }

    pub fn snapshot(&self) -> Step<Vec<u32>> {
        Ok(self.array.snapshot()?)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Writes `value` at `index` and reports it as a [`StepKind::Place`].
    pub fn place(&mut self, index: usize, value: u32) -> Step {
        self.set(index, value)?;
        self.emit_at(StepKind::Place, index, None)
    }

    /// Emits an event carrying the current value at `primary`.
    pub fn emit_at(&mut self, kind: StepKind, primary: usize, secondary: Option<usize>) -> Step {
        let value = self.get(primary)?;
        self.emit(StepEvent {
            kind,
            primary,
            secondary,
            value,
        })
    }

    /// Highlights, notifies the sink and then sleeps for the pacing delay.
    pub fn emit(&mut self, event: StepEvent) -> Step {
        self.array.mark(event.primary, event.secondary);
        let values = self.snapshot()?;
        let pace = self.pacer.delay();
        self.sink.on_step(&event, &values, pace);
        self.steps += 1;
        self.pacer.pause(pace);
        Ok(())
    }
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("len", &self.len)
            .field("steps", &self.steps)
            .field("state", &self.state.phase())
            .finish()
    }
}

/// Runs `algorithm` followed by the finalize sweep.
///
/// The sweep only happens when the routine itself completed.
pub fn execute(algorithm: Algorithm, ctx: &mut StepContext<'_>) -> Result<RunStatus> {
    let outcome = (algorithm.routine())(ctx).and_then(|()| finalize(ctx));
    match outcome {
        Ok(()) => Ok(RunStatus::Completed),
        Err(Halt::Stopped) => Ok(RunStatus::Stopped),
        Err(Halt::Fault(err)) => Err(err),
    }
}

fn finalize(ctx: &mut StepContext<'_>) -> Step {
    for index in 0..ctx.len() {
        ctx.checkpoint()?;
        ctx.emit_at(StepKind::Finalize, index, None)?;
    }
    Ok(())
}

pub fn is_sorted(values: &[u32]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}
