//! Deepfield - Entry Point
//!
//! Interactive shell around the sandbox: advances wall-clock time in
//! fixed frames, prints the events each step produced, and exposes the
//! pick/warp/eject verbs plus config controls. A renderer would sit on
//! `RenderSnapshot`; the shell is the headless stand-in.

use deepfield::catalog::TargetPanel;
use deepfield::core::config::{GenerationConfig, QualityPreset};
use deepfield::core::error::Result;
use deepfield::core::types::ScaleLevel;
use deepfield::simulation::{run_sandbox_tick, RenderSnapshot, SandboxEvent, SimulationContext};

use std::io::{self, Write};

/// Frame step used when the shell advances time
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("deepfield=debug")
        .init();

    tracing::info!("Deepfield starting...");

    let mut ctx = SimulationContext::new(GenerationConfig::default());

    println!("\n=== DEEPFIELD ===");
    println!("A multi-scale procedural astronomy sandbox");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance one second of sandbox time");
    println!("  run <n>         - Advance n seconds");
    println!("  status / s      - Show scale, clocks and the active realms");
    println!("  pick <i>        - Select structure i and show its panel");
    println!("  warp <i>        - Select structure i and fly into it");
    println!("  core            - Fly into the active galaxy's central object");
    println!("  eject / e       - Retreat one scale");
    println!("  auto on|off     - Toggle the autopilot tour");
    println!("  bang [seed]     - Regenerate the universe");
    println!("  preset <name>   - Rebuild with a quality preset (low/medium/high/ultra)");
    println!("  snapshot        - Dump the current frame as JSON");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&ctx);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            let events = advance_seconds(&mut ctx, 1.0);
            print_events(&events);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.trim().parse::<u32>() {
                Ok(n) => {
                    println!("Running {} seconds...", n);
                    let events = advance_seconds(&mut ctx, n as f32);
                    print_events(&events);
                }
                Err(_) => println!("Usage: run <seconds>"),
            }
            continue;
        }

        if input == "status" || input == "s" {
            display_detailed_status(&ctx);
            continue;
        }

        if let Some(rest) = input.strip_prefix("pick ") {
            match rest.trim().parse::<usize>() {
                Ok(index) => {
                    ctx.autopilot.set_enabled(false);
                    match ctx.pick(index) {
                        Ok(descriptor) => print_panel(&descriptor.panel()),
                        Err(err) => println!("Pick failed: {}", err),
                    }
                }
                Err(_) => println!("Usage: pick <index>"),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("warp ") {
            match rest.trim().parse::<usize>() {
                Ok(index) => {
                    ctx.autopilot.set_enabled(false);
                    match ctx.warp(index) {
                        Ok(events) => print_events(&events),
                        Err(err) => println!("Warp failed: {}", err),
                    }
                }
                Err(_) => println!("Usage: warp <index>"),
            }
            continue;
        }

        if input == "core" {
            ctx.autopilot.set_enabled(false);
            match ctx.warp_central() {
                Ok(events) => print_events(&events),
                Err(err) => println!("Warp failed: {}", err),
            }
            continue;
        }

        if input == "eject" || input == "e" {
            ctx.autopilot.set_enabled(false);
            let events = ctx.request_eject();
            if events.is_empty() {
                println!("Nothing to eject from.");
            } else {
                print_events(&events);
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("auto ") {
            match rest.trim() {
                "on" => {
                    ctx.autopilot.set_enabled(true);
                    println!("Autopilot engaged.");
                }
                "off" => {
                    ctx.autopilot.set_enabled(false);
                    println!("Autopilot disengaged.");
                }
                _ => println!("Usage: auto on|off"),
            }
            continue;
        }

        if input == "bang" {
            let events = ctx.big_bang(None);
            print_events(&events);
            continue;
        }

        if let Some(rest) = input.strip_prefix("bang ") {
            match rest.trim().parse::<u64>() {
                Ok(seed) => {
                    let events = ctx.big_bang(Some(seed));
                    print_events(&events);
                }
                Err(_) => println!("Usage: bang [seed]"),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("preset ") {
            match rest.trim().parse::<QualityPreset>() {
                Ok(preset) => {
                    let seed = ctx.config.seed;
                    ctx = SimulationContext::new(GenerationConfig::preset(preset, seed));
                    println!(
                        "Rebuilt at {} quality ({} points).",
                        preset.label(),
                        ctx.universe.len()
                    );
                }
                Err(err) => println!("{}", err),
            }
            continue;
        }

        if input == "snapshot" {
            let snapshot = RenderSnapshot::capture(&ctx);
            println!("{}", snapshot.to_json()?);
            continue;
        }

        println!("Unknown command. Try: tick, run <n>, status, pick <i>, warp <i>, core, eject, auto on|off, bang, preset <name>, snapshot, quit");
    }

    println!(
        "\nGoodbye! Universe age {:.2} Gyr after {:.0} units of offset travel.",
        ctx.clock.universe_age_gyr,
        ctx.scale.world_offset.length()
    );
    Ok(())
}

/// Walk the sandbox forward in frame-sized steps
fn advance_seconds(ctx: &mut SimulationContext, seconds: f32) -> Vec<SandboxEvent> {
    let mut events = Vec::new();
    let frames = (seconds / FRAME_DT).round().max(1.0) as usize;
    for _ in 0..frames {
        events.append(&mut run_sandbox_tick(ctx, FRAME_DT));
    }
    events
}

fn print_events(events: &[SandboxEvent]) {
    for event in events {
        match event {
            SandboxEvent::UniverseRegenerated { seed, points } => {
                println!("* Universe regenerated: seed {}, {} points", seed, points);
            }
            SandboxEvent::TransitionStarted {
                from,
                to,
                designation,
            } => {
                println!(
                    "* Descending {} -> {} toward {}",
                    from.label(),
                    to.label(),
                    designation
                );
            }
            SandboxEvent::TransitionCompleted { level, forced } => {
                let how = if *forced { " (watchdog)" } else { "" };
                println!("* Arrived at {} scale{}", level.label(), how);
            }
            SandboxEvent::GalaxyRealmBuilt {
                designation,
                morphology,
                points,
                reused,
            } => {
                let verb = if *reused { "Resumed" } else { "Entered" };
                println!(
                    "* {} {} ({}, {} stars)",
                    verb,
                    designation,
                    morphology.label(),
                    points
                );
            }
            SandboxEvent::SystemRealmBuilt {
                designation,
                stars,
                planets,
            } => {
                println!(
                    "* Entered {} ({} star(s), {} planet(s))",
                    designation, stars, planets
                );
            }
            SandboxEvent::PlanetFocused { designation } => {
                println!("* Focused {}", designation);
            }
            SandboxEvent::EjectStarted { from } => {
                println!("* Retreating from {} scale", from.label());
            }
        }
    }
}

fn print_panel(panel: &TargetPanel) {
    println!();
    println!("--- {} ({}) ---", panel.designation, panel.kind);
    println!("  Class: {}", panel.class_label);
    println!("  Age: {}", panel.age_label);
    println!("  Mass: {}", panel.mass_label);
    println!("  Radius: {}", panel.radius_label);
    println!("  Luminosity: {}", panel.luminosity_label);
    println!("  Composition: {}", panel.composition);
    let peak = panel
        .spectrum
        .iter()
        .max_by(|a, b| a.intensity.total_cmp(&b.intensity));
    if let Some(sample) = peak {
        println!("  Spectrum peak: {:.2} at band {:.2}", sample.intensity, sample.position);
    }
    println!();
}

/// One-line situation summary printed before each prompt
fn display_status(ctx: &SimulationContext) {
    println!();
    let transition = if ctx.scale.is_transitioning() {
        " [in transit]"
    } else {
        ""
    };
    println!(
        "--- {} scale{} | universe {:.2} Gyr | autopilot {} ---",
        ctx.scale.level().label(),
        transition,
        ctx.clock.universe_age_gyr,
        if ctx.autopilot.enabled() { "on" } else { "off" }
    );
    match ctx.scale.level() {
        ScaleLevel::Universe => {
            println!("  {} galaxies in the field", ctx.universe.len());
        }
        ScaleLevel::Galaxy => {
            if let Some(realm) = &ctx.galaxy {
                println!(
                    "  {} ({}) | {:.2} Gyr | {} stars",
                    realm.info.designation,
                    realm.info.morphology.label(),
                    realm.info.age_gyr,
                    realm.field.len()
                );
            }
        }
        ScaleLevel::System => {
            if let Some(realm) = &ctx.system {
                println!(
                    "  {} | {} | {} planet(s)",
                    realm.info.designation,
                    realm.info.display_class().label(),
                    realm.system.planet_count()
                );
            }
        }
    }
    if let Some(selected) = &ctx.selected {
        println!(
            "  Selected: {} ({})",
            selected.descriptor.designation(),
            selected.descriptor.kind_label()
        );
    }
    println!();
}

/// Full situation dump for the status command
fn display_detailed_status(ctx: &SimulationContext) {
    println!();
    println!("=== Status ===");
    println!("  Scale: {}", ctx.scale.level().label());
    println!("  Universe age: {:.2} Gyr", ctx.clock.universe_age_gyr);
    println!("  Galaxy clock: {:.2} Gyr", ctx.clock.galaxy_age_gyr);
    println!("  Seed: {}", ctx.config.seed);
    println!("  World offset: {:.1} units", ctx.scale.world_offset.length());
    if let Some(state) = ctx.scale.transition() {
        println!(
            "  Transition: {} -> {} ({:.0}%)",
            state.from.label(),
            state.to.label(),
            state.progress() * 100.0
        );
    }
    if let Some(realm) = &ctx.galaxy {
        println!(
            "  Galaxy: {} ({}, {:.2} Gyr, {} stars, {} nebulae)",
            realm.info.designation,
            realm.info.morphology.label(),
            realm.info.age_gyr,
            realm.field.len(),
            realm.field.nebula.len()
        );
    }
    if let Some(realm) = &ctx.system {
        println!(
            "  System: {} ({} star(s), {} planet(s))",
            realm.info.designation,
            realm.info.star_count,
            realm.system.planet_count()
        );
        for body in &realm.system.bodies {
            println!(
                "    {} at r={:.1} |v|={:.2}",
                body.designation,
                body.position.length(),
                body.velocity.length()
            );
        }
    }
    if let Some(panel) = ctx.target_panel() {
        print_panel(&panel);
    }
    println!();
}
