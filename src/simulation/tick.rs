//! Tick system - orchestrates sandbox updates
//!
//! One frame of the sandbox, in a fixed order:
//! 1. Clocks advance (each age only at the scale that owns it)
//! 2. The autopilot decides and the context applies its move
//! 3. The in-flight transition advances and maybe lands a realm swap
//! 4. Orbital physics integrates the active system
//! 5. The selection is re-glued to its orbiting body
//!
//! Returns the events that occurred, for display in the shell log.

use crate::core::types::ScaleLevel;
use crate::procgen::galaxy::Morphology;
use crate::simulation::context::SimulationContext;

/// Events generated during a sandbox tick
#[derive(Debug, Clone)]
pub enum SandboxEvent {
    /// A fresh universe field replaced everything
    UniverseRegenerated { seed: u64, points: usize },
    /// A drill-down toward a picked structure began
    TransitionStarted {
        from: ScaleLevel,
        to: ScaleLevel,
        designation: String,
    },
    /// The in-flight transition landed and the level flipped
    TransitionCompleted {
        level: ScaleLevel,
        /// True when the watchdog landed it rather than the easing
        forced: bool,
    },
    /// A galaxy realm became active
    GalaxyRealmBuilt {
        designation: String,
        morphology: Morphology,
        points: usize,
        /// True when a cached realm was resumed instead of regenerated
        reused: bool,
    },
    /// A star system realm became active
    SystemRealmBuilt {
        designation: String,
        stars: u32,
        planets: usize,
    },
    /// The camera moved to a planet at system scale
    PlanetFocused { designation: String },
    /// A retreat to the next wider scale began
    EjectStarted { from: ScaleLevel },
}

/// Run a single sandbox tick
///
/// `dt` is wall-clock seconds since the previous call. Ages freeze
/// while a transition is in flight, so drilling around never costs
/// simulated time.
pub fn run_sandbox_tick(ctx: &mut SimulationContext, dt: f32) -> Vec<SandboxEvent> {
    let mut events = Vec::new();

    if !ctx.scale.is_transitioning() {
        ctx.clock.advance(ctx.scale.level(), dt);
        if ctx.scale.level() == ScaleLevel::Galaxy {
            if let Some(realm) = &mut ctx.galaxy {
                realm.info.age_gyr = ctx.clock.galaxy_age_gyr;
            }
        }
    }

    let view = ctx.autopilot_view();
    if let Some(choice) = ctx.autopilot.tick(&view, dt) {
        match ctx.apply_choice(choice) {
            Ok(mut applied) => events.append(&mut applied),
            Err(err) => tracing::warn!(%err, "autopilot move rejected"),
        }
    }

    if let Some(done) = ctx.scale.advance(dt) {
        events.append(&mut ctx.complete_transition(done));
    }

    if ctx.scale.level() == ScaleLevel::System {
        if let Some(realm) = &mut ctx.system {
            ctx.integrator.step(&mut realm.system, dt);
        }
    }

    ctx.refresh_selected();

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GenerationConfig;
    use crate::core::types::{GALAXY_AGE_RATE, UNIVERSE_AGE_RATE};

    const FRAME: f32 = 1.0 / 60.0;

    fn test_context(autopilot: bool) -> SimulationContext {
        let config = GenerationConfig {
            star_count: 2_000,
            cluster_count: 8,
            autopilot,
            ..GenerationConfig::default()
        };
        SimulationContext::new(config)
    }

    fn run_seconds(ctx: &mut SimulationContext, seconds: f32) -> Vec<SandboxEvent> {
        let mut events = Vec::new();
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            events.append(&mut run_sandbox_tick(ctx, FRAME));
        }
        events
    }

    #[test]
    fn test_universe_age_accrues_at_universe_scale() {
        let mut ctx = test_context(false);
        run_seconds(&mut ctx, 2.0);
        let expected = 2.0 * UNIVERSE_AGE_RATE;
        assert!((ctx.clock.universe_age_gyr - expected).abs() < 0.05);
    }

    #[test]
    fn test_ages_freeze_during_transitions() {
        let mut ctx = test_context(false);
        run_seconds(&mut ctx, 1.0);
        let before = ctx.clock.universe_age_gyr;

        ctx.warp(0).unwrap();
        // Mid-flight frames must not advance the clock
        run_sandbox_tick(&mut ctx, FRAME);
        assert!(ctx.scale.is_transitioning());
        assert_eq!(ctx.clock.universe_age_gyr, before);
    }

    #[test]
    fn test_galaxy_age_advances_while_inside() {
        let mut ctx = test_context(false);
        ctx.clock.universe_age_gyr = 6.0;
        ctx.warp(0).unwrap();
        run_seconds(&mut ctx, 4.0);
        assert_eq!(ctx.scale.level(), ScaleLevel::Galaxy);

        let described = ctx.galaxy.as_ref().unwrap().info.age_gyr;
        run_seconds(&mut ctx, 3.0);
        let aged = ctx.galaxy.as_ref().unwrap().info.age_gyr;
        let gained = aged - described;
        assert!(
            (gained - 3.0 * GALAXY_AGE_RATE).abs() < 0.05,
            "gained {gained}"
        );
        // The wider clock stayed frozen the whole visit
        assert_eq!(ctx.clock.universe_age_gyr, 6.0);
    }

    #[test]
    fn test_autopilot_tours_down_to_a_system() {
        let mut ctx = test_context(true);
        // Give the gate an aged universe right away
        ctx.clock.universe_age_gyr = 5.0;

        let mut saw_galaxy = false;
        let mut saw_system = false;
        let mut saw_planet = false;
        let mut saw_eject = false;
        // Cadence is 5s; a couple of minutes covers the full loop
        for _ in 0..(120.0 / FRAME) as usize {
            for event in run_sandbox_tick(&mut ctx, FRAME) {
                match event {
                    SandboxEvent::GalaxyRealmBuilt { .. } => saw_galaxy = true,
                    SandboxEvent::SystemRealmBuilt { .. } => saw_system = true,
                    SandboxEvent::PlanetFocused { .. } => saw_planet = true,
                    SandboxEvent::EjectStarted { .. } => saw_eject = true,
                    _ => {}
                }
            }
            if saw_eject {
                break;
            }
        }
        assert!(saw_galaxy, "autopilot never entered a galaxy");
        assert!(saw_system, "autopilot never entered a system");
        assert!(saw_planet, "autopilot never toured a planet");
        assert!(saw_eject, "autopilot never ejected");
    }

    #[test]
    fn test_autopilot_visits_central_object_first() {
        let mut ctx = test_context(true);
        ctx.clock.universe_age_gyr = 5.0;

        let mut first_system: Option<String> = None;
        for _ in 0..(60.0 / FRAME) as usize {
            for event in run_sandbox_tick(&mut ctx, FRAME) {
                if let SandboxEvent::SystemRealmBuilt { designation, .. } = event {
                    first_system = Some(designation);
                }
            }
            if first_system.is_some() {
                break;
            }
        }
        let designation = first_system.expect("autopilot never built a system");
        assert!(
            designation.ends_with('*'),
            "first system was {designation}, not the central object"
        );
    }

    #[test]
    fn test_disabled_autopilot_stays_put() {
        let mut ctx = test_context(false);
        ctx.clock.universe_age_gyr = 5.0;
        let events = run_seconds(&mut ctx, 20.0);
        assert!(events.is_empty(), "unexpected events: {events:?}");
        assert_eq!(ctx.scale.level(), ScaleLevel::Universe);
    }
}
