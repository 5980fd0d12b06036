pub use agent::{Agent, AgentId, Target};
pub use simulation::{current_tick, Simulation, SimulationError, StateChange};

mod agent;
mod simulation;
