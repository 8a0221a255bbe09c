use std::alloc::Layout;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use stapel_config::{ConfigError, StapelConfig};
use stapel_core::Arena;
use stapel_telemetry::metrics::MetricsRecorder;

type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file; defaults to the config/ hierarchy
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted mixed-type workload and print the arena reports
    Demo(DemoArgs),
    /// Saturate the arena across generations with a seeded workload
    Stress(StressArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Arena capacity override in bytes
    #[arg(long)]
    pub capacity: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct StressArgs {
    /// Arena capacity override in bytes
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Number of fill/reset generations to run
    #[arg(long, default_value_t = 10)]
    pub generations: u64,
    /// Workload seed; identical seeds replay identical allocations
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Print the Prometheus exposition text when done
    #[arg(long)]
    pub metrics: bool,
    /// Dump the final stats snapshot as YAML
    #[arg(long)]
    pub stats: bool,
}

pub fn load_config(cli: &Cli) -> Result<StapelConfig, ConfigError> {
    match &cli.config {
        Some(path) => StapelConfig::load_from_path(path),
        None => StapelConfig::load(),
    }
}

// Demo payloads, sized to force visible padding in the memory map.
struct FrameHeader {
    frame: u64,
    flags: u8,
}

struct Sample {
    channel: u16,
    value: f32,
}

pub fn run_demo(args: DemoArgs, config: &StapelConfig, metrics: &MetricsRecorder) -> CommandResult {
    let capacity = args.capacity.unwrap_or(config.arena.capacity_bytes);
    let arena = Arena::with_capacity(capacity);
    info!(capacity, "demo arena provisioned");

    // One tag byte up front so the header below needs padding.
    let tag = arena.try_allocate_with(|| 0x5Au8)?;
    metrics.observe_allocation(std::mem::size_of::<u8>());

    let header = arena.try_allocate_with(|| FrameHeader { frame: 1, flags: 0 })?;
    metrics.observe_allocation(std::mem::size_of::<FrameHeader>());

    let mut checksum = 0.0f32;
    for channel in 0..16u16 {
        let sample = arena.try_allocate_with(|| Sample {
            channel,
            value: f32::from(channel) * 0.5,
        })?;
        metrics.observe_allocation(std::mem::size_of::<Sample>());
        checksum += sample.value + f32::from(sample.channel) * 0.001;
    }
    header.flags = 1;

    // Deliberately oversized request to show the rejection path.
    let oversized = Layout::from_size_align(arena.remaining() + 1, 1)?;
    if arena.try_alloc_layout(oversized).is_err() {
        metrics.inc_alloc_failures();
        warn!(
            requested = oversized.size(),
            remaining = arena.remaining(),
            "oversized request rejected, arena untouched"
        );
    }

    println!("{}", arena.memory_map());
    println!("{}", arena.usage_summary_width(config.report.bar_width));

    info!(
        tag = *tag,
        frame = header.frame,
        flags = header.flags,
        checksum,
        used = arena.used(),
        "demo workload complete"
    );
    Ok(())
}

pub fn run_stress(
    args: StressArgs,
    config: &StapelConfig,
    metrics: &MetricsRecorder,
) -> CommandResult {
    let capacity = args.capacity.unwrap_or(config.arena.capacity_bytes);
    let mut arena = Arena::with_capacity(capacity);
    let mut rng = SmallRng::seed_from_u64(args.seed);
    info!(capacity, seed = args.seed, generations = args.generations, "stress run starting");

    for generation in 0..args.generations {
        loop {
            let size = rng.random_range(1..=256usize);
            let align = 1usize << rng.random_range(0..=4u32);
            let layout = Layout::from_size_align(size, align)?;

            match arena.try_alloc_layout(layout) {
                Ok(_) => metrics.observe_allocation(size),
                Err(err) => {
                    metrics.inc_alloc_failures();
                    info!(generation, %err, used = arena.used(), "generation saturated");
                    break;
                }
            }
        }
        arena.reset();
        metrics.inc_resets();
    }

    let stats = arena.stats();
    info!(
        allocations = stats.allocations,
        failures = stats.failed_allocations,
        generations = stats.generation,
        "stress run complete"
    );

    if args.stats {
        println!("{}", serde_yaml::to_string(&stats)?);
    }
    if args.metrics {
        println!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}
