#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Starfall experience.

mod config;
mod session;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use starfall_core::{Control, InputState, Tuning, GAME_TITLE};
use starfall_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use starfall_rendering_macroquad::MacroquadBackend;
use tracing_subscriber::EnvFilter;

use self::session::Session;

/// Command-line arguments accepted by the `starfall` binary.
#[derive(Debug, Parser)]
#[command(name = "starfall", version, about = "Arcade shooter: clear the formation before it hits you")]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the enemy cooldown generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Runs the session without a window and prints the result.
    #[arg(long)]
    headless: bool,
    /// Upper bound on frames simulated in headless mode.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Frames per second simulated in headless mode.
    #[arg(long, default_value_t = 60.0)]
    frame_rate: f64,
    /// Controls held for the whole headless session.
    #[arg(long, value_enum, num_args = 1..)]
    hold: Vec<ControlArg>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Draws the frame rate in the window corner.
    #[arg(long)]
    show_fps: bool,
    /// Log filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

/// Logical control names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ControlArg {
    MoveLeft,
    MoveRight,
    Fire,
}

impl From<ControlArg> for Control {
    fn from(value: ControlArg) -> Self {
        match value {
            ControlArg::MoveLeft => Control::MoveLeft,
            ControlArg::MoveRight => Control::MoveRight,
            ControlArg::Fire => Control::Fire,
        }
    }
}

/// Entry point for the Starfall command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref())?;

    let tuning = config::load_tuning(args.config.as_deref(), args.seed)?;
    if args.headless {
        run_headless(&args, tuning)
    } else {
        run_windowed(&args, tuning)
    }
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn held_controls(hold: &[ControlArg]) -> InputState {
    let mut controls = InputState::new();
    for control in hold {
        controls.set_control(Control::from(*control), true);
    }
    controls
}

fn run_windowed(args: &Args, tuning: Tuning) -> Result<()> {
    let scene = Scene::from_tuning(&tuning).context("failed to build scene")?;
    let mut session = Session::start(tuning)?;
    let presentation = Presentation::new(GAME_TITLE, Color::from_rgb_u8(8, 8, 24), scene);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |input, scene| session.frame(input, scene))
}

fn run_headless(args: &Args, tuning: Tuning) -> Result<()> {
    ensure!(
        args.frame_rate.is_finite() && args.frame_rate > 0.0,
        "frame rate must be a positive number (received {})",
        args.frame_rate
    );

    let mut scene = Scene::from_tuning(&tuning).context("failed to build scene")?;
    let mut session = Session::start(tuning)?;
    let controls = held_controls(&args.hold);

    for index in 0..args.frames {
        if session.outcome().is_terminal() {
            break;
        }
        let input = FrameInput {
            timestamp: f64::from(index) / args.frame_rate,
            controls,
        };
        session.frame(input, &mut scene);
    }

    println!(
        "outcome: {:?}, score: {}, elapsed: {:.2}s",
        session.outcome(),
        session.score(),
        session.elapsed_seconds()
    );
    Ok(())
}
