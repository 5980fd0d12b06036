//! Single-target steering for 2D agents: seek with smooth arrival, evade, flee and brake
//!
//! Stateless per tick. The host owns each agent's velocity and feeds it back in every tick.

pub use behaviour::{Behaviour, MotionState};
pub use controller::{AgentKinematics, SteeringController, SteeringOutput};
pub use debug::{DebugDraw, DebugShape, SteeringDebugRenderer};
pub use params::{ConfigurationError, SteeringParameters};

mod behaviour;
mod controller;
mod debug;
mod params;
