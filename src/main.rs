//! Replays recorded pose landmarks through the workout engine and prints events.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use workout_pose_engine::app::{InputSource, ReplayApp, ReplayConfig};
use workout_pose_engine::config::{Config, EXAMPLE_CONFIG};
use workout_pose_engine::profiles::ExerciseKind;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Exercise to analyze (overrides the configured default)
    #[arg(short, long)]
    exercise: Option<String>,

    /// JSON-lines frame recording, or "-" for standard input
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Rep-channel smoothing filter (none, moving_average, median, exponential, hampel)
    #[arg(short, long)]
    filter: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// List the supported exercises and exit
    #[arg(long)]
    list_exercises: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.list_exercises {
        for kind in ExerciseKind::ALL {
            let mode = if kind.is_isometric() { "hold" } else { "reps" };
            println!("{:<24} {:<28} {}", kind.id(), kind.display_name(), mode);
        }
        return Ok(());
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Workout pose engine - replay");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(filter) = args.filter {
        config.smoothing.filter = filter;
    }
    config.validate().context("invalid configuration")?;

    let mut replay_config = ReplayConfig::new(InputSource::from_arg(&args.input), config);
    if let Some(exercise) = args.exercise {
        replay_config = replay_config.with_exercise(exercise);
    }

    let mut app = ReplayApp::new(replay_config).context("failed to start session")?;
    let summary = app.run().context("replay failed")?;
    if summary.skipped_lines > 0 {
        warn!("{} input lines could not be decoded", summary.skipped_lines);
    }

    Ok(())
}
