//! Headless Tour Runner
//!
//! Runs the autopilot for a stretch of simulated wall-clock time and
//! prints the event log as it happens, then dumps a final frame
//! snapshot. Useful for smoke-testing a seed or capturing a frame for
//! a frontend without the interactive shell.

use clap::Parser;
use std::path::PathBuf;

use deepfield::core::config::{GenerationConfig, QualityPreset};
use deepfield::core::error::Result;
use deepfield::simulation::{run_sandbox_tick, RenderSnapshot, SandboxEvent, SimulationContext};

/// Frame step for the headless loop
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "deepfield_tour")]
#[command(about = "Run the autopilot tour headless and dump events plus a final snapshot")]
struct Args {
    /// Session seed; overrides the preset's default
    #[arg(long)]
    seed: Option<u64>,

    /// Quality preset: low, medium, high or ultra
    #[arg(long, default_value = "medium")]
    preset: String,

    /// Simulated wall-clock seconds to run
    #[arg(long, default_value_t = 90.0)]
    seconds: f32,

    /// TOML config file; takes precedence over --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final snapshot JSON here instead of summarizing it
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable debug-level tracing
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "deepfield=debug"
    } else {
        "deepfield=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => {
            let preset: QualityPreset = args.preset.parse()?;
            GenerationConfig::preset(preset, GenerationConfig::default().seed)
        }
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    // The tour is pointless without the controller
    config.autopilot = true;

    println!("Deepfield tour: seed {}, {} points", config.seed, config.star_count);
    println!("Running {:.0} seconds of sandbox time...", args.seconds);
    println!();

    let mut ctx = SimulationContext::new(config);

    let frames = (args.seconds / FRAME_DT).ceil() as usize;
    let mut galaxies = 0usize;
    let mut systems = 0usize;
    let mut planets = 0usize;
    for frame in 0..frames {
        let stamp = frame as f32 * FRAME_DT;
        for event in run_sandbox_tick(&mut ctx, FRAME_DT) {
            match &event {
                SandboxEvent::GalaxyRealmBuilt { .. } => galaxies += 1,
                SandboxEvent::SystemRealmBuilt { .. } => systems += 1,
                SandboxEvent::PlanetFocused { .. } => planets += 1,
                _ => {}
            }
            println!("[{:7.2}s] {}", stamp, describe(&event));
        }
    }

    println!();
    println!("--- Tour summary ---");
    println!("  Final scale: {}", ctx.scale.level().label());
    println!("  Universe age: {:.2} Gyr", ctx.clock.universe_age_gyr);
    println!("  Galaxies entered: {}", galaxies);
    println!("  Systems entered: {}", systems);
    println!("  Planets focused: {}", planets);
    println!("  Offset traveled: {:.1} units", ctx.scale.world_offset.length());

    let snapshot = RenderSnapshot::capture(&ctx);
    match &args.snapshot {
        Some(path) => {
            std::fs::write(path, snapshot.to_json()?)?;
            println!("  Snapshot written to {}", path.display());
        }
        None => {
            println!(
                "  Final frame: {} points at {} scale",
                snapshot.point_count(),
                snapshot.level.label()
            );
        }
    }

    Ok(())
}

fn describe(event: &SandboxEvent) -> String {
    match event {
        SandboxEvent::UniverseRegenerated { seed, points } => {
            format!("universe regenerated (seed {}, {} points)", seed, points)
        }
        SandboxEvent::TransitionStarted {
            from,
            to,
            designation,
        } => format!(
            "descending {} -> {} toward {}",
            from.label(),
            to.label(),
            designation
        ),
        SandboxEvent::TransitionCompleted { level, forced } => {
            if *forced {
                format!("arrived at {} scale (watchdog)", level.label())
            } else {
                format!("arrived at {} scale", level.label())
            }
        }
        SandboxEvent::GalaxyRealmBuilt {
            designation,
            morphology,
            points,
            reused,
        } => format!(
            "{} {} ({}, {} stars)",
            if *reused { "resumed" } else { "entered" },
            designation,
            morphology.label(),
            points
        ),
        SandboxEvent::SystemRealmBuilt {
            designation,
            stars,
            planets,
        } => format!("entered {} ({} star(s), {} planet(s))", designation, stars, planets),
        SandboxEvent::PlanetFocused { designation } => format!("focused {}", designation),
        SandboxEvent::EjectStarted { from } => format!("retreating from {} scale", from.label()),
    }
}
