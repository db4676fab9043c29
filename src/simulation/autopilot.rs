//! Time-driven tour controller
//!
//! The autopilot decides, it never applies. Every few seconds it emits
//! one `AutopilotChoice` describing the next move for the current
//! scale; the context turns that choice into the same pick and warp
//! calls a user would make. Keeping the controller side-effect free
//! makes the tour order testable without building any realm.

use std::collections::VecDeque;

use glam::Vec3;

use crate::catalog::Descriptor;
use crate::core::rng::SeededStream;
use crate::core::types::{PointId, ScaleLevel};

/// Seconds between autopilot actions
pub const ACTION_DELAY: f32 = 5.0;

/// The universe must reach this age before the first drill-down
///
/// Early structure is still forming; diving in sooner would land in a
/// field of protostars with nothing to tour.
pub const MIN_UNIVERSE_AGE_GYR: f32 = 1.0;

/// A must-visit structure, served before random field picks
#[derive(Debug, Clone)]
pub struct PriorityTarget {
    pub position: Vec3,
    pub descriptor: Descriptor,
}

/// One decided move, to be applied by the context
#[derive(Debug, Clone)]
pub enum AutopilotChoice {
    /// Enter the universe point at this index
    DrillUniverse(PointId),
    /// Enter a queued priority structure
    DrillPriority(PriorityTarget),
    /// Enter the galaxy field point at this index
    DrillGalaxyPoint(PointId),
    /// Focus the planet at this tour position
    FocusPlanet(usize),
    /// Retreat one scale
    Eject,
}

/// Everything the controller is allowed to see
#[derive(Debug, Clone, Copy)]
pub struct AutopilotView {
    pub level: ScaleLevel,
    pub transitioning: bool,
    pub universe_age_gyr: f32,
    pub universe_points: usize,
    pub galaxy_points: usize,
    pub planet_count: usize,
}

#[derive(Debug)]
pub struct AutopilotController {
    enabled: bool,
    timer: f32,
    stream: SeededStream,
    queue: VecDeque<PriorityTarget>,
    tour_index: usize,
}

impl AutopilotController {
    pub fn new(stream: SeededStream, enabled: bool) -> Self {
        AutopilotController {
            enabled,
            timer: 0.0,
            stream,
            queue: VecDeque::new(),
            tour_index: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the controller; enabling restarts the cadence
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            tracing::info!(enabled, "autopilot toggled");
        }
        self.enabled = enabled;
        self.timer = 0.0;
    }

    /// Seed the priority queue for a freshly built galaxy realm
    ///
    /// Cached realms keep their visit history, so re-entering one does
    /// not refill the queue and the tour moves on to field stars.
    pub fn on_galaxy_entered(&mut self, targets: Vec<PriorityTarget>) {
        self.queue = targets.into();
    }

    /// Restart the planet tour for a freshly entered system
    pub fn on_system_entered(&mut self) {
        self.tour_index = 0;
    }

    /// Advance the cadence and maybe emit the next move
    ///
    /// The timer pauses while a transition is in flight. The
    /// young-universe gate blocks firing without pausing the cadence,
    /// so maturity releases a held action on the next frame.
    pub fn tick(&mut self, view: &AutopilotView, dt: f32) -> Option<AutopilotChoice> {
        if !self.enabled || view.transitioning {
            return None;
        }

        self.timer += dt;
        if self.timer < ACTION_DELAY {
            return None;
        }
        if view.level == ScaleLevel::Universe && view.universe_age_gyr < MIN_UNIVERSE_AGE_GYR {
            return None;
        }
        self.timer = 0.0;

        let choice = match view.level {
            ScaleLevel::Universe => {
                if view.universe_points == 0 {
                    None
                } else {
                    let index = self.stream.index(view.universe_points);
                    Some(AutopilotChoice::DrillUniverse(PointId(index as u32)))
                }
            }
            ScaleLevel::Galaxy => {
                if let Some(target) = self.queue.pop_front() {
                    Some(AutopilotChoice::DrillPriority(target))
                } else if view.galaxy_points > 0 {
                    let index = self.stream.index(view.galaxy_points);
                    Some(AutopilotChoice::DrillGalaxyPoint(PointId(index as u32)))
                } else {
                    None
                }
            }
            ScaleLevel::System => {
                if self.tour_index < view.planet_count {
                    let stop = self.tour_index;
                    self.tour_index += 1;
                    Some(AutopilotChoice::FocusPlanet(stop))
                } else {
                    self.tour_index = 0;
                    Some(AutopilotChoice::Eject)
                }
            }
        };

        if let Some(choice) = &choice {
            tracing::debug!(?choice, level = view.level.label(), "autopilot move");
        }
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{SeededStream, STREAM_AUTOPILOT};

    fn controller() -> AutopilotController {
        AutopilotController::new(SeededStream::new(42).derive(STREAM_AUTOPILOT), true)
    }

    fn universe_view() -> AutopilotView {
        AutopilotView {
            level: ScaleLevel::Universe,
            transitioning: false,
            universe_age_gyr: 5.0,
            universe_points: 1_000,
            galaxy_points: 0,
            planet_count: 0,
        }
    }

    #[test]
    fn test_disabled_controller_never_acts() {
        let mut pilot = controller();
        pilot.set_enabled(false);
        let view = universe_view();
        for _ in 0..1_000 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
    }

    #[test]
    fn test_cadence_waits_full_delay() {
        let mut pilot = controller();
        let view = universe_view();
        let mut elapsed = 0.0;
        while elapsed + 0.1 < ACTION_DELAY {
            assert!(pilot.tick(&view, 0.1).is_none(), "fired early at {elapsed}");
            elapsed += 0.1;
        }
        assert!(matches!(
            pilot.tick(&view, 0.2),
            Some(AutopilotChoice::DrillUniverse(_))
        ));
    }

    #[test]
    fn test_young_universe_blocks_firing_not_the_timer() {
        let mut pilot = controller();
        let mut view = universe_view();
        view.universe_age_gyr = 0.4;
        // Bank well over one full delay while the gate holds
        for _ in 0..60 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        // Maturity releases the held action at once
        view.universe_age_gyr = MIN_UNIVERSE_AGE_GYR;
        assert!(matches!(
            pilot.tick(&view, 0.1),
            Some(AutopilotChoice::DrillUniverse(_))
        ));
    }

    #[test]
    fn test_first_drill_fires_at_the_cadence_mark() {
        let mut pilot = controller();
        let mut view = universe_view();
        view.universe_age_gyr = 0.4;
        // 2.5 s of protostar haze before maturity
        for _ in 0..25 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        // The cadence counts from enable, not from maturity
        view.universe_age_gyr = MIN_UNIVERSE_AGE_GYR;
        for _ in 0..24 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        assert!(pilot.tick(&view, 0.2).is_some());
    }

    #[test]
    fn test_timer_pauses_during_transitions() {
        let mut pilot = controller();
        let mut view = universe_view();
        for _ in 0..45 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        view.transitioning = true;
        for _ in 0..100 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        view.transitioning = false;
        // Only half a second of eligible time remains
        for _ in 0..4 {
            assert!(pilot.tick(&view, 0.1).is_none());
        }
        assert!(pilot.tick(&view, 0.2).is_some());
    }

    #[test]
    fn test_priority_targets_served_before_field_points() {
        let mut pilot = controller();
        let central = PriorityTarget {
            position: Vec3::ZERO,
            descriptor: Descriptor::Galaxy(crate::procgen::galaxy::describe_galaxy(1, 6.0)),
        };
        pilot.on_galaxy_entered(vec![central]);

        let view = AutopilotView {
            level: ScaleLevel::Galaxy,
            transitioning: false,
            universe_age_gyr: 6.0,
            universe_points: 1_000,
            galaxy_points: 500,
            planet_count: 0,
        };
        assert!(matches!(
            pilot.tick(&view, ACTION_DELAY),
            Some(AutopilotChoice::DrillPriority(_))
        ));
        // Queue drained; next pick is a random field point
        assert!(matches!(
            pilot.tick(&view, ACTION_DELAY),
            Some(AutopilotChoice::DrillGalaxyPoint(_))
        ));
    }

    #[test]
    fn test_planet_tour_ascends_then_ejects_once() {
        let mut pilot = controller();
        pilot.on_system_entered();
        let view = AutopilotView {
            level: ScaleLevel::System,
            transitioning: false,
            universe_age_gyr: 6.0,
            universe_points: 0,
            galaxy_points: 0,
            planet_count: 3,
        };

        for expected in 0..3 {
            match pilot.tick(&view, ACTION_DELAY) {
                Some(AutopilotChoice::FocusPlanet(i)) => assert_eq!(i, expected),
                other => panic!("expected planet focus, got {other:?}"),
            }
        }
        assert!(matches!(
            pilot.tick(&view, ACTION_DELAY),
            Some(AutopilotChoice::Eject)
        ));
        // Tour restarts rather than ejecting twice
        assert!(matches!(
            pilot.tick(&view, ACTION_DELAY),
            Some(AutopilotChoice::FocusPlanet(0))
        ));
    }

    #[test]
    fn test_same_seed_same_tour() {
        let mut a = controller();
        let mut b = controller();
        let view = universe_view();
        for _ in 0..10 {
            let ca = a.tick(&view, ACTION_DELAY);
            let cb = b.tick(&view, ACTION_DELAY);
            match (ca, cb) {
                (
                    Some(AutopilotChoice::DrillUniverse(pa)),
                    Some(AutopilotChoice::DrillUniverse(pb)),
                ) => assert_eq!(pa, pb),
                other => panic!("tours diverged: {other:?}"),
            }
        }
    }
}
