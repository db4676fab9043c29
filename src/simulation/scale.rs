//! Scale state machine
//!
//! One machine owns which scale is active and the single in-flight
//! transition. The active level only changes when a transition lands,
//! so every realm swap happens at one well-defined instant. Requests
//! made while a transition is running are dropped; a watchdog completes
//! any transition that outlives its window even if the camera easing
//! has not converged.

use glam::Vec3;

use crate::catalog::Descriptor;
use crate::core::types::{PointId, ScaleLevel};

/// Seconds a transition may run before the watchdog lands it
pub const TRANSITION_TIMEOUT: f32 = 3.0;

/// Exponential approach rate for the focus point during a transition
///
/// Chosen so a full-universe hop converges just inside the watchdog
/// window; anything farther is landed by the timeout instead.
const FOCUS_DAMPING: f32 = 4.0;

/// Focus distance below which a transition counts as arrived
const ARRIVAL_EPSILON: f32 = 0.5;

/// An in-flight transition between two adjacent scales
#[derive(Debug, Clone)]
pub struct TransitionState {
    pub from: ScaleLevel,
    pub to: ScaleLevel,
    /// Where the camera is heading, in current world coordinates
    pub target: Vec3,
    /// Field point being entered, if the transition is a drill-down
    pub source_point: Option<PointId>,
    /// Descriptor of whatever is being entered
    pub payload: Option<Descriptor>,
    pub elapsed: f32,
    /// Damped focus position, updated every frame
    pub eased_focus: Vec3,
}

impl TransitionState {
    pub fn progress(&self) -> f32 {
        (self.elapsed / TRANSITION_TIMEOUT).min(1.0)
    }
}

/// Returned by `advance` exactly once per transition, when it lands
#[derive(Debug, Clone)]
pub struct CompletedTransition {
    pub from: ScaleLevel,
    pub to: ScaleLevel,
    pub target: Vec3,
    pub source_point: Option<PointId>,
    pub payload: Option<Descriptor>,
    /// True when the watchdog landed it rather than the easing
    pub forced: bool,
}

#[derive(Debug)]
pub struct ScaleMachine {
    level: ScaleLevel,
    transition: Option<TransitionState>,
    /// Sum of every drill-down re-centering shift since the last bang
    pub world_offset: Vec3,
}

impl Default for ScaleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleMachine {
    pub fn new() -> Self {
        ScaleMachine {
            level: ScaleLevel::Universe,
            transition: None,
            world_offset: Vec3::ZERO,
        }
    }

    pub fn level(&self) -> ScaleLevel {
        self.level
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&TransitionState> {
        self.transition.as_ref()
    }

    /// Start descending into the structure at `target`
    ///
    /// Ignored when a transition is already running or the machine is
    /// at the deepest scale; returns whether the request was taken.
    pub fn request_drill_down(
        &mut self,
        target: Vec3,
        source_point: Option<PointId>,
        payload: Option<Descriptor>,
        current_focus: Vec3,
    ) -> bool {
        if self.transition.is_some() {
            tracing::debug!("drill-down ignored, transition in flight");
            return false;
        }
        let Some(to) = self.level.deeper() else {
            tracing::debug!(level = self.level.label(), "drill-down ignored at deepest scale");
            return false;
        };
        tracing::debug!(
            from = self.level.label(),
            to = to.label(),
            ?target,
            "drill-down started"
        );
        self.transition = Some(TransitionState {
            from: self.level,
            to,
            target,
            source_point,
            payload,
            elapsed: 0.0,
            eased_focus: current_focus,
        });
        true
    }

    /// Start retreating to the next wider scale
    ///
    /// `retreat` is where the camera ends up in the wider frame. Same
    /// rejection rules as drill-down.
    pub fn request_eject(&mut self, retreat: Vec3, current_focus: Vec3) -> bool {
        if self.transition.is_some() {
            tracing::debug!("eject ignored, transition in flight");
            return false;
        }
        let Some(to) = self.level.wider() else {
            tracing::debug!("eject ignored at widest scale");
            return false;
        };
        tracing::debug!(from = self.level.label(), to = to.label(), "eject started");
        self.transition = Some(TransitionState {
            from: self.level,
            to,
            target: retreat,
            source_point: None,
            payload: None,
            elapsed: 0.0,
            eased_focus: current_focus,
        });
        true
    }

    /// Advance the in-flight transition, if any
    ///
    /// The focus eases toward the target with frame-rate-independent
    /// damping. A transition lands when the focus is within the arrival
    /// epsilon or the watchdog window closes, whichever comes first;
    /// the active level flips only at that moment.
    pub fn advance(&mut self, dt: f32) -> Option<CompletedTransition> {
        let (arrived, timed_out) = {
            let state = self.transition.as_mut()?;
            state.elapsed += dt;
            let alpha = 1.0 - (-FOCUS_DAMPING * dt).exp();
            state.eased_focus = state.eased_focus.lerp(state.target, alpha);
            (
                state.eased_focus.distance(state.target) <= ARRIVAL_EPSILON,
                state.elapsed >= TRANSITION_TIMEOUT,
            )
        };

        if !arrived && !timed_out {
            return None;
        }

        self.transition.take().map(|state| {
            let forced = timed_out && !arrived;
            if forced {
                tracing::debug!(
                    to = state.to.label(),
                    elapsed = state.elapsed,
                    "transition landed by watchdog"
                );
            }
            self.level = state.to;
            CompletedTransition {
                from: state.from,
                to: state.to,
                target: state.target,
                source_point: state.source_point,
                payload: state.payload,
                forced,
            }
        })
    }

    /// Drop back to the widest scale with no animation, for a new bang
    pub fn reset(&mut self) {
        self.level = ScaleLevel::Universe;
        self.transition = None;
        self.world_offset = Vec3::ZERO;
    }
}
