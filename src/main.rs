mod animator;
mod calibration;
mod waypoints;
mod web;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::animator::{Animator, AnimatorStatus};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "sat-animator")]
#[command(about = "Two-satellite trajectory animation and attitude control")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the animator and its HTTP API
    Serve {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
    /// Tick the animator headless and print the final state
    Simulate {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
        #[arg(long, default_value_t = 600)]
        ticks: usize,
        /// Real time per tick, scaled by the clock multiplier
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        step: Duration,
    },
    /// Check waypoint timeline files
    Validate { files: Vec<PathBuf> },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Simulate {
            config,
            ticks,
            step,
        } => simulate(&config, ticks, step),
        Commands::Validate { files } => validate(&files),
    }
}

fn load(path: &str) -> Option<(Config, animator::AnimatorContext)> {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error in {}: {}", path, e);
            return None;
        }
    };
    match config.build_context() {
        Ok(context) => Some((config, context)),
        Err(e) => {
            eprintln!("Failed to load satellites: {}", e);
            None
        }
    }
}

async fn serve(path: &str) -> ExitCode {
    let Some((config, context)) = load(path) else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config, context).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn simulate(path: &str, ticks: usize, step: Duration) -> ExitCode {
    let Some((config, context)) = load(path) else {
        return ExitCode::FAILURE;
    };

    let animator = Animator::new(context, config.animation.tick_interval);
    animator.step(ticks, step);
    print_status(&animator.status());
    ExitCode::SUCCESS
}

fn print_status(status: &AnimatorStatus) {
    println!("Clock at {} (x{})", status.clock.current, status.clock.multiplier);
    println!(
        "Selected satellite {}, autopilot {}, attitude override {}",
        u8::from(status.selected),
        if status.autopilot { "on" } else { "off" },
        if status.attitude_override { "on" } else { "off" }
    );
    for sat in &status.satellites {
        let f = &sat.flight;
        println!(
            "  {}: lat {:.4} lng {:.4} alt {:.0} m, hpr ({:.3}, {:.3}, {:.3}), trail {}",
            sat.name,
            f.latitude_deg,
            f.longitude_deg,
            f.altitude_m,
            f.heading,
            f.pitch,
            f.roll,
            sat.history_len
        );
    }
}

fn validate(files: &[PathBuf]) -> ExitCode {
    if files.is_empty() {
        eprintln!("No waypoint files given");
        return ExitCode::FAILURE;
    }

    let mut ok = true;
    for file in files {
        match waypoints::load_timeline(file) {
            Ok(timeline) => {
                let span = match (timeline.first(), timeline.last()) {
                    (Some(first), Some(last)) => format!("{} .. {}", first.time, last.time),
                    _ => "empty".to_string(),
                };
                println!(
                    "{}: {} waypoints ({})",
                    file.display(),
                    timeline.len(),
                    span
                );
            }
            Err(e) => {
                eprintln!("{}: {}", file.display(), e);
                ok = false;
            }
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
