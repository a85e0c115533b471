use std::{
    io::{self, BufRead, IsTerminal},
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use sorting_visualiser_core::{
    open_player, Algorithm, ChannelSink, EventRecorder, EventSink, Frame, NotePlayer, NoteSink,
    RenderSink, Renderer, RunController, RunStart, RunState, SharedSink, SilentPlayer, SinkSet,
    Speed, TextRenderer, VisualizerConfig,
};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Speed change for one `+` or `-` line.
const SPEED_STEP: i64 = 25;

fn main() -> sorting_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => VisualizerConfig::load(path)?,
        None => VisualizerConfig::default(),
    };

    match cli.command {
        Commands::Run(args) => run_sort(config, args),
        Commands::List => {
            for algorithm in Algorithm::ALL {
                println!("{:<10} {}", algorithm.name(), algorithm.label());
            }
            Ok(())
        }
    }
}

fn run_sort(mut config: VisualizerConfig, args: RunArgs) -> sorting_visualiser_core::Result<()> {
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let size = args
        .size
        .clone()
        .unwrap_or_else(|| config.array.default_size.to_string());

    let (tx, rx) = mpsc::channel();
    let sink: SharedSink = Arc::new(Mutex::new(ChannelSink::new(tx)));
    let controller = RunController::new(config.clone(), sink)?;
    if let Some(speed) = args.speed {
        controller.speed().set(speed)?;
    }

    let renderer = open_renderer(&config, &args);
    let player: Box<dyn NotePlayer> = if args.mute {
        Box::new(SilentPlayer)
    } else {
        open_player(&config)
    };
    let recorder = args
        .record
        .as_ref()
        .map(|_| Arc::new(Mutex::new(EventRecorder::new())));

    let initial = match controller.start_run_with_input(args.algorithm, &size)? {
        RunStart::Started { initial } => initial,
        RunStart::Ignored => {
            tracing::warn!("a run is already active");
            return Ok(());
        }
    };
    tracing::info!(
        algorithm = %args.algorithm,
        size = initial.len(),
        speed = controller.speed().get(),
        "Enter stops; `+`, `-` or a number changes speed"
    );

    let mut display = SinkSet::new();
    if let Some(mut renderer) = renderer {
        let first = Frame::capture(controller.array())?.with_caption(args.algorithm.label());
        if let Err(err) = renderer.draw(&first) {
            tracing::warn!(%err, "failed to draw frame");
        }
        display.push(RenderSink::new(renderer));
    }
    display.push(NoteSink::new(player));
    if let Some(recorder) = &recorder {
        lock(recorder).begin(args.algorithm, initial);
        display.push(Arc::clone(recorder));
    }
    watch_stdin(controller.state(), controller.speed().clone());

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(frame) => display.on_frame(&frame),
            Err(RecvTimeoutError::Timeout) if controller.is_running() => {}
            Err(_) => break,
        }
    }
    for frame in rx.try_iter() {
        display.on_frame(&frame);
    }
    drop(display);

    let Some(outcome) = controller.wait()? else {
        return Ok(());
    };
    println!(
        "{}: {:?} after {} steps",
        outcome.algorithm, outcome.status, outcome.steps
    );
    if let (Some(recorder), Some(path)) = (&recorder, args.record.as_deref()) {
        let mut recorder = lock(recorder);
        recorder.finish(outcome.status);
        write_recording(&recorder, path)?;
    }
    Ok(())
}

fn open_renderer(config: &VisualizerConfig, args: &RunArgs) -> Option<Box<dyn Renderer>> {
    if args.quiet {
        return None;
    }
    let text = TextRenderer::new(io::stdout(), config.render.rows, config.surface.height);
    if args.plain || !io::stdout().is_terminal() {
        Some(Box::new(text))
    } else {
        Some(Box::new(text.interactive()))
    }
}

fn lock(recorder: &Mutex<EventRecorder>) -> MutexGuard<'_, EventRecorder> {
    recorder.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One line typed while a run is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stop,
    Faster,
    Slower,
    Set(u32),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "+" => Command::Faster,
        "-" => Command::Slower,
        other => other.parse().map_or(Command::Stop, Command::Set),
    }
}

/// Reads commands from stdin until a stop or end of input.
fn watch_stdin(state: RunState, speed: Speed) {
    let spawned = thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Command::Stop => {
                        state.request_stop();
                        break;
                    }
                    Command::Faster => {
                        tracing::info!(speed = speed.nudge(SPEED_STEP), "faster");
                    }
                    Command::Slower => {
                        tracing::info!(speed = speed.nudge(-SPEED_STEP), "slower");
                    }
                    Command::Set(value) => match speed.set(value) {
                        Ok(()) => tracing::info!(speed = value, "speed set"),
                        Err(err) => tracing::warn!(%err, "speed unchanged"),
                    },
                }
            }
        });
    if let Err(err) = spawned {
        tracing::warn!(%err, "keyboard control is unavailable");
    }
}

fn write_recording(recorder: &EventRecorder, path: &Path) -> sorting_visualiser_core::Result<()> {
    recorder.write_json(path)?;
    tracing::info!(?path, events = recorder.events().len(), "wrote recording");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated, sonified sorting algorithms", long_about = None)]
struct Cli {
    /// JSON configuration file. Missing fields use built-in defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random array and animate one algorithm over it.
    Run(RunArgs),
    /// Print the available algorithms.
    List,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Algorithm to animate, by short name or label.
    #[arg(short, long, default_value = "bubble")]
    algorithm: Algorithm,
    /// Number of bars. Defaults to the configured size.
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    size: Option<String>,
    /// Playback speed; larger is faster.
    #[arg(short, long)]
    speed: Option<u32>,
    /// Seed for reproducible arrays and Random Sort.
    #[arg(long)]
    seed: Option<u64>,
    /// Write every step event to this JSON file.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Skip drawing.
    #[arg(short, long)]
    quiet: bool,
    /// Scroll plain characters instead of redrawing in colour.
    #[arg(long)]
    plain: bool,
    /// Do not play notes.
    #[arg(long)]
    mute: bool,
}
