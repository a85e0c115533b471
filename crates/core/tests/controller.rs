use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::Duration,
};

use sorting_visualiser_core::{
    is_sorted, Algorithm, EventRecorder, EventSink, RunController, RunPhase, RunStart, RunStatus,
    SharedSink, StepEvent, StepKind, VisualizerConfig,
};

fn controller(config: VisualizerConfig) -> (RunController, Arc<Mutex<EventRecorder>>) {
    let recorder = Arc::new(Mutex::new(EventRecorder::new()));
    let sink: SharedSink = recorder.clone();
    (RunController::new(config, sink).unwrap(), recorder)
}

fn headless(seed: u64) -> VisualizerConfig {
    VisualizerConfig {
        seed: Some(seed),
        ..VisualizerConfig::headless()
    }
}

/// Speed 1 with a 200 µs unit: 100 ms between steps.
fn slow(seed: u64) -> VisualizerConfig {
    let mut config = headless(seed);
    config.pacing.unit_micros = 200;
    config.pacing.default_speed = 1;
    config
}

fn multiset(values: &[u32]) -> Vec<u32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted
}

#[test]
fn completed_run_sorts_and_returns_to_idle() {
    for algorithm in Algorithm::ALL.into_iter().filter(|a| a.converges()) {
        let (controller, recorder) = controller(headless(17));
        let RunStart::Started { initial } = controller.start_run(algorithm, 40).unwrap() else {
            panic!("{algorithm} did not start");
        };
        assert_eq!(initial.len(), 40);
        assert!(initial.iter().all(|v| (10..=500).contains(v)));

        let outcome = controller.wait().unwrap().expect("run outcome");
        assert_eq!(outcome.status, RunStatus::Completed);
        assert!(is_sorted(&outcome.values), "{algorithm}");
        assert_eq!(multiset(&outcome.values), multiset(&initial));
        assert_eq!(controller.state().phase(), RunPhase::Idle);

        let recorder = recorder.lock().unwrap();
        assert_eq!(recorder.events().len() as u64, outcome.steps);
        let finals = recorder
            .events()
            .iter()
            .filter(|event| event.kind == StepKind::Finalize)
            .count();
        assert_eq!(finals, 40);
    }
}

#[test]
fn invalid_size_fails_before_touching_the_array() {
    let (controller, recorder) = controller(headless(1));
    for bad in ["0", "-4", "many"] {
        let err = controller
            .start_run_with_input(Algorithm::Bubble, bad)
            .unwrap_err();
        assert!(err.is_validation());
    }
    assert!(controller.start_run(Algorithm::Quick, 0).unwrap_err().is_validation());

    assert_eq!(controller.array().len().unwrap(), 0);
    assert!(!controller.is_running());
    assert!(controller.wait().unwrap().is_none());
    assert!(recorder.lock().unwrap().events().is_empty());
}

#[test]
fn oversized_array_is_rejected() {
    let (controller, _recorder) = controller(headless(1));
    let over = (controller.config().array.max_size + 1).to_string();

    for bad in ["100000000000", over.as_str()] {
        let err = controller
            .start_run_with_input(Algorithm::Bucket, bad)
            .unwrap_err();
        assert!(err.is_validation(), "{bad}");
    }
    assert!(controller
        .start_run(Algorithm::Bucket, usize::MAX)
        .unwrap_err()
        .is_validation());
    assert_eq!(controller.array().len().unwrap(), 0);
    assert!(!controller.is_running());
}

/// Panics on the first step it sees, then counts the rest.
#[derive(Default)]
struct PanicOnce {
    tripped: bool,
    seen: u64,
}

impl EventSink for PanicOnce {
    fn on_step(&mut self, _event: &StepEvent, _values: &[u32], _pace: Duration) {
        if !self.tripped {
            self.tripped = true;
            panic!("sink failure");
        }
        self.seen += 1;
    }
}

#[test]
fn panicking_sink_returns_the_controller_to_idle() {
    let sink = Arc::new(Mutex::new(PanicOnce::default()));
    let shared: SharedSink = sink.clone();
    let controller = RunController::new(headless(4), shared).unwrap();

    assert!(matches!(
        controller.start_run(Algorithm::Bubble, 10).unwrap(),
        RunStart::Started { .. }
    ));
    assert!(controller.wait().is_err());
    assert_eq!(controller.state().phase(), RunPhase::Idle);

    assert!(matches!(
        controller.start_run(Algorithm::Bubble, 10).unwrap(),
        RunStart::Started { .. }
    ));
    let outcome = controller.wait().unwrap().expect("run outcome");
    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(is_sorted(&outcome.values));
    let sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(sink.seen, outcome.steps);
}

#[test]
fn start_while_running_is_ignored() {
    let (controller, recorder) = controller(slow(5));
    let RunStart::Started { initial } = controller.start_run(Algorithm::Bubble, 30).unwrap() else {
        panic!("first run did not start");
    };
    assert!(controller.is_running());

    assert_eq!(
        controller.start_run(Algorithm::Quick, 8).unwrap(),
        RunStart::Ignored
    );
    assert_eq!(controller.array().len().unwrap(), 30);

    controller.request_stop();
    let outcome = controller.wait().unwrap().expect("run outcome");
    assert_eq!(outcome.algorithm, Algorithm::Bubble);
    assert_eq!(outcome.status, RunStatus::Stopped);
    assert_eq!(multiset(&outcome.values), multiset(&initial));
    assert_eq!(recorder.lock().unwrap().events().len() as u64, outcome.steps);
}

#[test]
fn stop_keeps_partial_order_without_finalize() {
    let (controller, recorder) = controller(slow(9));
    controller.start_run(Algorithm::Selection, 25).unwrap();
    thread::sleep(Duration::from_millis(250));

    controller.request_stop();
    controller.request_stop();
    let outcome = controller.wait().unwrap().expect("run outcome");
    assert_eq!(outcome.status, RunStatus::Stopped);

    let recorder = recorder.lock().unwrap();
    let recording = recorder.recording();
    assert!(!recording.events.is_empty());
    assert_eq!(recording.events.len() as u64, outcome.steps);
    assert!(recording
        .events
        .iter()
        .all(|event| event.kind != StepKind::Finalize));
    // Nothing moved after the last reported step.
    assert_eq!(recording.final_values, outcome.values);
    assert_eq!(controller.array().snapshot().unwrap(), outcome.values);
}

#[test]
fn stop_when_idle_has_no_effect() {
    let (controller, _recorder) = controller(headless(3));
    controller.request_stop();
    controller.request_stop();
    assert_eq!(controller.state().phase(), RunPhase::Idle);

    assert!(matches!(
        controller.start_run(Algorithm::Insertion, 12).unwrap(),
        RunStart::Started { .. }
    ));
    let outcome = controller.wait().unwrap().expect("run outcome");
    assert_eq!(outcome.status, RunStatus::Completed);
}

#[test]
fn runs_can_follow_each_other() {
    let (controller, _recorder) = controller(headless(21));
    for algorithm in [Algorithm::Merge, Algorithm::Bucket] {
        controller.start_run(algorithm, 16).unwrap();
        let outcome = controller.wait().unwrap().expect("run outcome");
        assert_eq!(outcome.algorithm, algorithm);
        assert_eq!(outcome.status, RunStatus::Completed);
    }
}

#[test]
fn seeded_controllers_replay_identically() {
    let (first, first_events) = controller(headless(99));
    let (second, second_events) = controller(headless(99));
    first.start_run(Algorithm::Quick, 20).unwrap();
    second.start_run(Algorithm::Quick, 20).unwrap();
    first.wait().unwrap();
    second.wait().unwrap();

    assert_eq!(
        first_events.lock().unwrap().events(),
        second_events.lock().unwrap().events()
    );
}
