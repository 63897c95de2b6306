//! gaze-calib CLI: inspect the calibration layout and replay pupil traces.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use gaze_calib::session::{replay_trace, TraceEntry};
use gaze_calib::{CalibrationController, SessionParams};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "gaze-calib")]
#[command(about = "Five-point pupil-to-screen gaze calibration tools")]
#[command(version)]
struct Cli {
    /// Log state transitions and sample capture.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the calibration targets and their time windows.
    Targets(ConfigArgs),

    /// Replay a recorded pupil trace (JSON) through a calibration session.
    Replay(ReplayArgs),
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Session config (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Trace file: JSON array of `{ "t", "left", "right", "recalibrate" }`.
    #[arg(long)]
    trace: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    gaze_calib::init_logging(cli.verbose);

    match cli.command {
        Commands::Targets(args) => run_targets(&args),
        Commands::Replay(args) => run_replay(&args),
    }
}

fn load_params(config: Option<&Path>) -> CliResult<SessionParams> {
    match config {
        Some(path) => Ok(SessionParams::load_json(path)?),
        None => Ok(SessionParams::default()),
    }
}

fn run_targets(args: &ConfigArgs) -> CliResult<()> {
    let params = load_params(args.config.as_deref())?;
    let controller = CalibrationController::new(&params)?;
    let sequencer = controller.sequencer();

    println!(
        "screen {}x{}, phase {:.3}s, eye {:?}",
        params.layout.width,
        params.layout.height,
        sequencer.phase_duration().as_secs_f64(),
        controller.eye()
    );
    for target in sequencer.targets() {
        println!(
            "target {}: ({}, {}) active [{:.3}s, {:.3}s)",
            target.index,
            target.position.x,
            target.position.y,
            target.window.start.as_secs_f64(),
            target.window.end.as_secs_f64()
        );
    }
    let fit = sequencer.fit_window();
    println!(
        "fit window: [{:.3}s, {:.3}s)",
        fit.start.as_secs_f64(),
        fit.end.as_secs_f64()
    );
    Ok(())
}

fn run_replay(args: &ReplayArgs) -> CliResult<()> {
    let params = load_params(args.config.config.as_deref())?;
    let trace = TraceEntry::load_trace(&args.trace)?;
    let report = replay_trace(&params, &trace)?;

    match &args.out {
        Some(path) => {
            report.write_json(path)?;
            println!(
                "wrote replay report to {} ({} ticks, final state {:?})",
                path.display(),
                report.summary.ticks,
                report.summary.final_state
            );
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}
