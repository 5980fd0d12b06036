use serde::Deserialize;
use thiserror::Error;

/// Smoothing applied at exactly the stop radius, so arrival never stalls completely
const ARRIVE_FACTOR_FLOOR: f32 = 0.01;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Max speed must be positive and finite, not {0}")]
    MaxSpeed(f32),

    #[error("Deceleration factor must be within (0, 1), not {0}")]
    DecelerationFactor(f32),

    #[error("{name} radius must be non-negative and finite, not {radius}")]
    Radius { name: &'static str, radius: f32 },

    #[error("Arrive radius {arrive} must be greater than stop radius {stop}")]
    ArriveWithinStop { arrive: f32, stop: f32 },

    #[error("Tick duration must be positive and finite, not {0}")]
    TickDuration(f32),
}

/// Tuning for a steering controller, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SteeringParameters {
    /// Speed is clamped to this after every tick
    pub max_speed: f32,

    /// Velocity multiplier per tick while braking
    pub deceleration_factor: f32,

    /// Arrival smoothing starts within this distance of the target
    pub arrive_radius: f32,

    /// Within this distance of the target the agent brakes
    pub stop_radius: f32,

    pub evade_radius: f32,
    pub flee_radius: f32,
}

impl Default for SteeringParameters {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            deceleration_factor: 0.75,
            arrive_radius: 1.2,
            stop_radius: 0.5,
            evade_radius: 5.0,
            flee_radius: 5.0,
        }
    }
}

impl SteeringParameters {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ConfigurationError::MaxSpeed(self.max_speed));
        }

        if !(self.deceleration_factor > 0.0 && self.deceleration_factor < 1.0) {
            return Err(ConfigurationError::DecelerationFactor(
                self.deceleration_factor,
            ));
        }

        for (name, radius) in [
            ("Arrive", self.arrive_radius),
            ("Stop", self.stop_radius),
            ("Evade", self.evade_radius),
            ("Flee", self.flee_radius),
        ] {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(ConfigurationError::Radius { name, radius });
            }
        }

        if self.arrive_radius <= self.stop_radius {
            return Err(ConfigurationError::ArriveWithinStop {
                arrive: self.arrive_radius,
                stop: self.stop_radius,
            });
        }

        Ok(())
    }

    /// Proportion of steering applied while arriving, ramping from ~0.01 at the stop radius to
    /// ~1.0 at the arrive radius
    pub fn arrive_factor(&self, distance: f32) -> f32 {
        ARRIVE_FACTOR_FLOOR
            + (distance - self.stop_radius) / (self.arrive_radius - self.stop_radius)
    }
}

pub(crate) fn validate_tick_duration(dt: f32) -> Result<(), ConfigurationError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::TickDuration(dt))
    }
}
