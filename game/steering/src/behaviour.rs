use common::*;
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

use crate::SteeringParameters;

/// Movement policy selected by the owner of an agent
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, EnumIter, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Behaviour {
    /// Brake to a standstill, regardless of any target
    Idle,

    /// Head towards the target at full speed, slowing down on approach
    #[default]
    Seek,

    /// Steer away from the target while it is within the evade radius
    Evade,

    /// Steer away from the target while it is within the flee radius
    Flee,
}

/// What an agent is visibly doing this tick. Derived fresh every tick and never fed back
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum MotionState {
    #[default]
    Idle,
    Arrive,
    Seek,
    Evade,
    /// Never produced by distance classification, far-range flight shows as [MotionState::Evade]
    Flee,
}

slog_value_display!(Behaviour);
slog_value_display!(MotionState);

impl Behaviour {
    /// Radius the target must be within for this behaviour to steer at all. `None` means always
    /// active (or, for idle, never)
    pub fn trigger_radius(self, params: &SteeringParameters) -> Option<f32> {
        match self {
            Behaviour::Idle | Behaviour::Seek => None,
            Behaviour::Evade => Some(params.evade_radius),
            Behaviour::Flee => Some(params.flee_radius),
        }
    }
}

impl MotionState {
    /// Classifies the distance to the target against the stop and arrive radii
    pub fn classify(params: &SteeringParameters, behaviour: Behaviour, distance: f32) -> Self {
        if distance < params.stop_radius {
            MotionState::Idle
        } else if distance < params.arrive_radius {
            MotionState::Arrive
        } else {
            match behaviour {
                Behaviour::Idle => MotionState::Idle,
                Behaviour::Seek => MotionState::Seek,
                Behaviour::Evade | Behaviour::Flee => MotionState::Evade,
            }
        }
    }
}
