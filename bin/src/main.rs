mod config;
mod simulation;
mod stats;

use std::path::PathBuf;
use clap::Parser;
use log::info;
use crate::config::Config;
use crate::simulation::Simulator;

#[derive(Parser)]
#[command(name = "lathe")]
#[command(about = "Generate cylinder geometry and play a keyframed scene headlessly")]
#[command(version = "1.0")]
struct Args {
    /// Configuration file path (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Output path for the generated cylinder OBJ
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of angular segments for the cylinder
    #[arg(long)]
    segments: Option<u32>,

    /// Nominal cylinder radius
    #[arg(long)]
    radius: Option<f32>,

    /// Scale the cylinder ring by its radius
    #[arg(long)]
    scale_by_radius: Option<bool>,

    /// Milliseconds between simulated ticks
    #[arg(long)]
    tick: Option<u64>,

    /// Stop the simulation after this many milliseconds
    #[arg(long)]
    end: Option<u64>,

    /// Write a JSON-lines trace of animated mesh positions
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle config generation
    if args.generate_config {
        let config_path = args.config.unwrap_or_else(|| PathBuf::from("scene_config.json"));
        Config::save_default(&config_path)?;
        return Ok(());
    }

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Override config with command line arguments
    if let Some(output) = args.output {
        config.cylinder.output = output;
    }
    if let Some(segments) = args.segments {
        config.cylinder.segments = segments;
    }
    if let Some(radius) = args.radius {
        config.cylinder.radius = radius;
    }
    if let Some(scale_by_radius) = args.scale_by_radius {
        config.cylinder.scale_by_radius = scale_by_radius;
    }
    if let Some(tick) = args.tick {
        config.simulation.tick_ms = tick;
    }
    if let Some(end) = args.end {
        config.simulation.end_ms = end;
    }
    if args.trace.is_some() {
        config.simulation.trace = args.trace;
    }
    if args.verbose {
        config.simulation.verbose = true;
    }

    let filter = if config.simulation.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let simulator = Simulator::new(config);
    let mut scene = simulator.build_scene()?;

    info!(
        "Playing {} timeline entries over {} meshes",
        scene.timeline().len(),
        scene.meshes().len()
    );
    let stats = simulator.run(&mut scene)?;

    stats.print_summary(&scene);

    Ok(())
}
