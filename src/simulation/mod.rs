pub mod autopilot;
pub mod context;
pub mod output;
pub mod physics;
pub mod scale;
pub mod tick;

pub use autopilot::{AutopilotChoice, AutopilotController, AutopilotView, PriorityTarget};
pub use context::{GalaxyRealm, SelectedTarget, SimulationContext, SystemRealm};
pub use output::RenderSnapshot;
pub use physics::OrbitalIntegrator;
pub use scale::{CompletedTransition, ScaleMachine, TransitionState, TRANSITION_TIMEOUT};
pub use tick::{run_sandbox_tick, SandboxEvent};
