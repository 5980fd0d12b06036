use common::*;
use derive_more::Display;
use steering::{AgentKinematics, Behaviour, MotionState};

/// Index into the simulation's agents, stable for its lifetime
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Display)]
#[display(fmt = "A{}", _0)]
pub struct AgentId(pub(crate) usize);

slog_value_display!(AgentId);

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Target {
    /// Fixed point in the world
    Point(Vector2),

    /// Another agent's position at the start of the tick
    Agent(AgentId),
}

slog_value_debug!(Target);

#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    pub(crate) behaviour: Behaviour,
    pub(crate) target: Option<Target>,
    pub(crate) kinematics: AgentKinematics,

    /// As of the last tick
    pub(crate) state: MotionState,
}

impl Agent {
    pub(crate) fn new(name: String, kinematics: AgentKinematics, behaviour: Behaviour) -> Self {
        Self {
            name,
            behaviour,
            target: None,
            kinematics,
            state: MotionState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn kinematics(&self) -> &AgentKinematics {
        &self.kinematics
    }

    pub fn position(&self) -> Vector2 {
        self.kinematics.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.kinematics.velocity
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Text shown above the agent
    pub fn label(&self) -> String {
        self.state.to_string()
    }
}

impl AgentId {
    pub fn index(self) -> usize {
        self.0
    }
}
