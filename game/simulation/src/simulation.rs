use std::sync::atomic::{AtomicU32, Ordering};

use common::*;
use config::{Config, TargetDescriptor};
use steering::{
    AgentKinematics, Behaviour, ConfigurationError, DebugDraw, MotionState, SteeringController,
    SteeringDebugRenderer, SteeringParameters,
};
use thiserror::Error;

use crate::agent::{Agent, AgentId, Target};

/// Last completed tick of the most recently ticked simulation, for log timestamps
static CURRENT_TICK: AtomicU32 = AtomicU32::new(0);

pub fn current_tick() -> u32 {
    CURRENT_TICK.load(Ordering::Relaxed)
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid steering configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Agent {agent:?} targets unknown agent {target:?}")]
    UnknownTarget { agent: String, target: String },

    #[error("Duplicate agent name {0:?}")]
    DuplicateName(String),

    #[error("No such agent {0}")]
    NoSuchAgent(AgentId),
}

/// An agent's displayed state changed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub agent: AgentId,
    pub from: MotionState,
    pub to: MotionState,
}

/// Host loop around a [SteeringController], integrating kinematic bodies at a fixed tick rate
pub struct Simulation {
    controller: SteeringController,
    agents: Vec<Agent>,
    tick: u32,

    /// Last reloaded parameters that failed validation, so they are only reported once
    rejected_params: Option<SteeringParameters>,
}

impl Simulation {
    pub fn new(params: SteeringParameters, tick_duration: f32) -> Result<Self, SimulationError> {
        let controller = SteeringController::new(params, tick_duration)?;
        Ok(Self {
            controller,
            agents: Vec::new(),
            tick: 0,
            rejected_params: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SimulationError> {
        let mut sim = Self::new(config.steering, config.simulation.tick_duration)?;

        for desc in &config.agents {
            let kinematics = AgentKinematics::new(
                Vector2::from(desc.position),
                Vector2::from(desc.velocity),
            );
            sim.add_agent(desc.name.clone(), kinematics, desc.behaviour)?;
        }

        // resolve targets once all names are known
        for (idx, desc) in config.agents.iter().enumerate() {
            let target = match &desc.target {
                None => None,
                Some(TargetDescriptor::Point(x, y)) => Some(Target::Point(Vector2::new(*x, *y))),
                Some(TargetDescriptor::Agent(name)) => {
                    let id = sim.find_agent(name).ok_or_else(|| {
                        SimulationError::UnknownTarget {
                            agent: desc.name.clone(),
                            target: name.clone(),
                        }
                    })?;
                    Some(Target::Agent(id))
                }
            };

            sim.set_target(AgentId(idx), target)?;
        }

        debug!("created simulation from config"; "agents" => sim.agents.len());
        Ok(sim)
    }

    pub fn add_agent(
        &mut self,
        name: String,
        kinematics: AgentKinematics,
        behaviour: Behaviour,
    ) -> Result<AgentId, SimulationError> {
        if self.find_agent(&name).is_some() {
            return Err(SimulationError::DuplicateName(name));
        }

        let id = AgentId(self.agents.len());
        debug!("adding agent"; "agent" => id, "name" => &name, "behaviour" => behaviour);
        self.agents.push(Agent::new(name, kinematics, behaviour));
        Ok(id)
    }

    pub fn set_target(
        &mut self,
        id: AgentId,
        target: Option<Target>,
    ) -> Result<(), SimulationError> {
        if let Some(Target::Agent(other)) = target {
            self.agent(other).ok_or(SimulationError::NoSuchAgent(other))?;
        }

        self.agent_mut(id)?.target = target;
        Ok(())
    }

    pub fn set_behaviour(
        &mut self,
        id: AgentId,
        behaviour: Behaviour,
    ) -> Result<(), SimulationError> {
        self.agent_mut(id)?.behaviour = behaviour;
        Ok(())
    }

    /// Replaces steering parameters from the next tick onwards. Invalid parameters are rejected
    /// and the current ones kept
    pub fn set_parameters(&mut self, params: SteeringParameters) -> Result<(), SimulationError> {
        let controller = SteeringController::new(params, self.controller.tick_duration())?;
        self.controller = controller;
        info!("updated steering parameters"; "params" => ?params);
        Ok(())
    }

    /// Applies parameters from a reloaded config if they differ from the current ones. Invalid
    /// parameters are logged and ignored until they change again. Returns true if applied
    pub fn reload_parameters(&mut self, params: SteeringParameters) -> bool {
        if params == *self.parameters() || self.rejected_params == Some(params) {
            return false;
        }

        match self.set_parameters(params) {
            Ok(()) => {
                self.rejected_params = None;
                true
            }
            Err(e) => {
                warn!("ignoring reloaded steering parameters"; "error" => %e);
                self.rejected_params = Some(params);
                false
            }
        }
    }

    pub fn parameters(&self) -> &SteeringParameters {
        self.controller.parameters()
    }

    pub fn tick_duration(&self) -> f32 {
        self.controller.tick_duration()
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent, SimulationError> {
        self.agents
            .get_mut(id.0)
            .ok_or(SimulationError::NoSuchAgent(id))
    }

    pub fn find_agent(&self, name: &str) -> Option<AgentId> {
        self.agents
            .iter()
            .position(|a| a.name() == name)
            .map(AgentId)
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &Agent)> + '_ {
        self.agents
            .iter()
            .enumerate()
            .map(|(idx, agent)| (AgentId(idx), agent))
    }

    /// Steers and moves every agent once. Targets are read from positions at the start of the
    /// tick, so agent order doesn't matter
    pub fn tick(&mut self) -> Vec<StateChange> {
        let positions = self
            .agents
            .iter()
            .map(|a| a.kinematics.position)
            .collect::<Vec<_>>();

        let controller = &self.controller;
        let dt = controller.tick_duration();
        let mut changes = Vec::new();

        for (idx, agent) in self.agents.iter_mut().enumerate() {
            let id = AgentId(idx);
            let target = agent.target.and_then(|target| match target {
                Target::Point(pos) => Some(pos),
                Target::Agent(other) => positions.get(other.0).copied(),
            });

            let change = log_scope(o!("agent" => agent.name().to_owned()), || {
                let output = controller.step(agent.behaviour, agent.kinematics, target);

                // kinematic body, so integrate directly
                agent.kinematics.velocity = output.velocity;
                agent.kinematics.position += output.velocity * dt;

                trace!("steered";
                    "target" => agent.target,
                    "state" => output.state,
                    "velocity" => ?output.velocity,
                    "position" => ?agent.kinematics.position
                );

                let prev = std::mem::replace(&mut agent.state, output.state);
                if prev != output.state {
                    debug!("state changed"; "from" => prev, "to" => output.state);
                    Some(StateChange {
                        agent: id,
                        from: prev,
                        to: output.state,
                    })
                } else {
                    None
                }
            });

            changes.extend(change);
        }

        self.tick += 1;
        CURRENT_TICK.store(self.tick, Ordering::Relaxed);
        changes
    }

    /// Radii and target lines for every agent
    pub fn render_debug<D: DebugDraw>(&self, draw: &mut D) {
        let renderer = SteeringDebugRenderer;
        let params = self.controller.parameters();
        for agent in &self.agents {
            let target = agent.target.and_then(|target| match target {
                Target::Point(pos) => Some(pos),
                Target::Agent(other) => self.agent(other).map(|a| a.position()),
            });

            renderer.render(draw, params, agent.behaviour, agent.position(), target);
        }
    }
}
