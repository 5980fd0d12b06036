use serde::Deserialize;
use steering::{Behaviour, SteeringParameters};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub steering: SteeringParameters,

    #[serde(default)]
    pub simulation: Simulation,

    #[serde(default)]
    pub agents: Vec<AgentDescriptor>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Simulation {
    /// Fixed tick duration in seconds
    pub tick_duration: f32,

    /// Number of ticks to run for
    pub ticks: u32,

    /// Sleep for a tick duration after each tick
    pub realtime: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AgentDescriptor {
    pub name: String,
    pub position: (f32, f32),

    #[serde(default)]
    pub velocity: (f32, f32),

    #[serde(default)]
    pub behaviour: Behaviour,

    #[serde(default)]
    pub target: Option<TargetDescriptor>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum TargetDescriptor {
    /// Fixed point in the world
    Point(f32, f32),

    /// Another agent by name, followed as it moves
    Agent(String),
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            tick_duration: 0.02,
            ticks: 500,
            realtime: false,
        }
    }
}
