//! ## stapel-cli
//! **Operational interface for the arena toolkit**
//!
//! Two entry points: a scripted demo that prints the arena's memory map
//! and usage bar, and a seeded stress driver that saturates the arena
//! across generations. Both are deterministic for a given seed and
//! configuration.

use clap::Parser;
use stapel_telemetry::logging::EventLogger;
use stapel_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli)?;
    EventLogger::init_with_level(&config.telemetry.log_level);
    let metrics = MetricsRecorder::new();

    match cli.command {
        Commands::Demo(args) => commands::run_demo(args, &config, &metrics),
        Commands::Stress(args) => commands::run_stress(args, &config, &metrics),
    }
}
