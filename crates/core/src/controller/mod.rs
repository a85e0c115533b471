use std::{
    sync::{Arc, Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    sort, Algorithm, ArrayModel, EventSink, Pacer, Result, RunState, RunStatus, SortVizError,
    Speed, StepContext, VisualizerConfig,
};

/// Event sink shared between the controller and its run threads.
pub type SharedSink = Arc<Mutex<dyn EventSink + Send>>;

/// Answer to a start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStart {
    /// A run thread was spawned over the freshly generated `initial` values.
    Started { initial: Vec<u32> },
    /// Another run is still active; nothing was touched.
    Ignored,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub algorithm: Algorithm,
    pub status: RunStatus,
    pub steps: u64,
    pub values: Vec<u32>,
}

/// Parses the array-size field. Anything but a positive integer is rejected.
pub fn parse_size(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let size: i64 = trimmed
        .parse()
        .map_err(|_| SortVizError::validation(format!("array size `{trimmed}` is not a number")))?;
    if size <= 0 {
        return Err(SortVizError::validation(format!(
            "array size must be positive, got {size}"
        )));
    }
    usize::try_from(size)
        .map_err(|_| SortVizError::validation(format!("array size {size} is too large")))
}

/// Owns the array and the run flag, and runs at most one sort at a time on a
/// dedicated thread.
pub struct RunController {
    config: VisualizerConfig,
    array: ArrayModel,
    state: RunState,
    speed: Speed,
    sink: SharedSink,
    rng: Mutex<StdRng>,
    current: Mutex<Option<JoinHandle<Result<RunOutcome>>>>,
}

impl RunController {
    /// Creates an idle controller. Every run reports its steps to `sink`.
    pub fn new(config: VisualizerConfig, sink: SharedSink) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            speed: Speed::new(&config.pacing),
            config,
            array: ArrayModel::new(),
            state: RunState::new(),
            sink,
            rng: Mutex::new(rng),
            current: Mutex::new(None),
        })
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// The array every run sorts in place.
    pub fn array(&self) -> &ArrayModel {
        &self.array
    }

    /// Live speed handle; changes apply to the active run.
    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    /// Handle that other threads can use to request a stop.
    pub fn state(&self) -> RunState {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.state.is_idle()
    }

    /// Validates the raw size field before starting.
    pub fn start_run_with_input(&self, algorithm: Algorithm, size: &str) -> Result<RunStart> {
        let size = parse_size(size)?;
        self.start_run(algorithm, size)
    }

    /// Regenerates the array and sorts it in the background. Ignored while
    /// another run is active.
    pub fn start_run(&self, algorithm: Algorithm, size: usize) -> Result<RunStart> {
        if size == 0 {
            return Err(SortVizError::validation("array size must be positive"));
        }
        let max_size = self.config.array.max_size;
        if size > max_size {
            return Err(SortVizError::validation(format!(
                "array size {size} exceeds the maximum of {max_size}"
            )));
        }

        let mut current = self.lock_current()?;
        if !self.state.try_begin() {
            tracing::debug!(%algorithm, "run already active, start ignored");
            return Ok(RunStart::Ignored);
        }

        if let Some(previous) = current.take() {
            // Idle implies the previous routine has returned; this only reaps it.
            let _ = previous.join();
        }

        match self.launch(algorithm, size) {
            Ok((handle, initial)) => {
                *current = Some(handle);
                Ok(RunStart::Started { initial })
            }
            Err(err) => {
                self.state.finish();
                Err(err)
            }
        }
    }

    /// Asks the active run to stop at its next checkpoint. Safe to call at any
    /// time; repeated calls behave like one.
    pub fn request_stop(&self) {
        if self.state.request_stop() {
            tracing::debug!("stop requested");
        }
    }

    /// Blocks until the most recent run has returned.
    ///
    /// Returns `None` when no run was started since the last call.
    pub fn wait(&self) -> Result<Option<RunOutcome>> {
        let handle = self.lock_current()?.take();
        match handle {
            Some(handle) => handle
                .join()
                .map_err(|_| SortVizError::msg("sort thread panicked"))?
                .map(Some),
            None => Ok(None),
        }
    }

    fn launch(
        &self,
        algorithm: Algorithm,
        size: usize,
    ) -> Result<(JoinHandle<Result<RunOutcome>>, Vec<u32>)> {
        let run_seed = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| SortVizError::msg("controller rng has been poisoned"))?;
            self.array.reset(
                size,
                self.config.array.min_value,
                self.config.surface.height,
                &mut *rng,
            )?;
            rng.gen::<u64>()
        };
        let initial = self.array.snapshot()?;
        tracing::info!(%algorithm, size, "starting run");

        let array = self.array.clone();
        let state = self.state.clone();
        let sink = Arc::clone(&self.sink);
        let pacer = Pacer::new(self.speed.clone(), self.config.pacing.unit());
        let handle = thread::Builder::new()
            .name(format!("sort-{}", algorithm.name()))
            .spawn(move || {
                let _idle = FinishOnDrop(state.clone());
                run_routine(algorithm, array, &sink, state, pacer, run_seed)
            })?;
        Ok((handle, initial))
    }

    fn lock_current(&self) -> Result<MutexGuard<'_, Option<JoinHandle<Result<RunOutcome>>>>> {
        self.current
            .lock()
            .map_err(|_| SortVizError::msg("run handle has been poisoned"))
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.request_stop();
        if let Ok(Some(handle)) = self.current.get_mut().map(Option::take) {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("array", &self.array)
            .field("state", &self.state.phase())
            .field("speed", &self.speed.get())
            .finish()
    }
}

/// Returns the run state to Idle when the run thread exits, unwinding
/// included.
struct FinishOnDrop(RunState);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

fn run_routine(
    algorithm: Algorithm,
    array: ArrayModel,
    sink: &SharedSink,
    state: RunState,
    pacer: Pacer,
    seed: u64,
) -> Result<RunOutcome> {
    // A sink that panicked during an earlier run poisons the lock; the sink
    // itself is still usable.
    let mut sink = sink.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("event sink panicked during a previous run");
        poisoned.into_inner()
    });
    let mut ctx = StepContext::new(
        array.clone(),
        &mut *sink,
        state,
        pacer,
        StdRng::seed_from_u64(seed),
    )?;

    let status = match sort::execute(algorithm, &mut ctx) {
        Ok(status) => status,
        Err(err) => {
            tracing::error!(%algorithm, %err, "run aborted");
            return Err(err);
        }
    };
    let steps = ctx.steps();
    tracing::info!(%algorithm, ?status, steps, "run finished");

    Ok(RunOutcome {
        algorithm,
        status,
        steps,
        values: array.snapshot()?,
    })
}
