//! Voltaic command-line interface.

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use voltaic_core::units::parse_value;

#[derive(Parser)]
#[command(name = "voltaic")]
#[command(about = "A real-time electrical network simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output (-v for info, -vv for debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a session and run it
    Run {
        /// Session document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of ticks to run
        #[arg(short = 'n', long, default_value_t = 60)]
        ticks: u64,

        /// Ticks per simulated second; SI suffixes allowed (e.g. `1k`)
        #[arg(long, value_name = "HZ", value_parser = parse_rate)]
        tick_rate: Option<f64>,

        /// Print a snapshot every K ticks (0 = final snapshot only)
        #[arg(long, value_name = "K", default_value_t = 0)]
        every: u64,
    },

    /// Load a session and print its topology without running it
    Inspect {
        /// Session document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write a sample session document
    Demo {
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            input,
            ticks,
            tick_rate,
            every,
        } => commands::run::run(&input, ticks, tick_rate, every),
        Command::Inspect { input } => commands::inspect::inspect(&input),
        Command::Demo { out } => commands::demo::demo(out.as_deref()),
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    match parse_value(s) {
        Some(rate) if rate > 0.0 && rate.is_finite() => Ok(rate),
        Some(rate) => Err(format!("tick rate must be positive, got {rate}")),
        None => Err(format!("invalid tick rate: {s}")),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
