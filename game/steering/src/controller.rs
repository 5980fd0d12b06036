use common::*;

use crate::params::validate_tick_duration;
use crate::{Behaviour, ConfigurationError, MotionState, SteeringParameters};

/// Body state read from the host every tick. Velocity is the only state carried between ticks,
/// and the host owns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentKinematics {
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Result of a single tick, to be written back to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringOutput {
    /// Already clamped to max speed
    pub velocity: Vector2,

    /// For display only
    pub state: MotionState,
}

/// What the current behaviour wants from the body this tick
#[derive(Debug, Clone, Copy)]
enum Steering {
    /// Decelerate towards rest, ignoring the target
    Brake,

    /// Velocity change to apply, scaled by how the target distance classifies
    Steer { force: Vector2, distance: f32 },
}

/// Computes per-tick velocity changes for one behaviour towards a single target. Holds no state
/// between ticks, so one controller can drive any number of agents
#[derive(Debug, Clone)]
pub struct SteeringController {
    params: SteeringParameters,
    dt: f32,
}

impl AgentKinematics {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self { position, velocity }
    }

    pub fn at_rest(position: Vector2) -> Self {
        Self::new(position, Vector2::zero())
    }
}

impl SteeringController {
    /// `dt` is the fixed tick duration in seconds
    pub fn new(params: SteeringParameters, dt: f32) -> Result<Self, ConfigurationError> {
        params.validate()?;
        validate_tick_duration(dt)?;
        Ok(Self { params, dt })
    }

    pub fn parameters(&self) -> &SteeringParameters {
        &self.params
    }

    pub fn tick_duration(&self) -> f32 {
        self.dt
    }

    /// Advances one tick. A missing target is not an error, the agent just brakes
    pub fn step(
        &self,
        behaviour: Behaviour,
        kinematics: AgentKinematics,
        target: Option<Vector2>,
    ) -> SteeringOutput {
        let steering = match target {
            None => Steering::Brake,
            Some(target) => self.steering(behaviour, &kinematics, target),
        };

        let (velocity, state) = self.apply(behaviour, steering, kinematics.velocity);
        SteeringOutput {
            velocity: velocity.clamp_magnitude(self.params.max_speed),
            state,
        }
    }

    fn steering(
        &self,
        behaviour: Behaviour,
        kinematics: &AgentKinematics,
        target: Vector2,
    ) -> Steering {
        let distance = kinematics.position.distance(target);
        let seek = self.desired_velocity(kinematics.position, target) - kinematics.velocity;

        match behaviour {
            Behaviour::Idle => Steering::Brake,
            Behaviour::Seek => Steering::Steer {
                force: seek,
                distance,
            },
            Behaviour::Evade | Behaviour::Flee => {
                let within = behaviour
                    .trigger_radius(&self.params)
                    .map_or(false, |radius| distance < radius);

                if within {
                    Steering::Steer {
                        force: -seek,
                        distance,
                    }
                } else {
                    Steering::Brake
                }
            }
        }
    }

    /// Full speed straight at the target. Zero if already there
    fn desired_velocity(&self, position: Vector2, target: Vector2) -> Vector2 {
        (target - position).normalize_or_zero() * self.params.max_speed
    }

    fn apply(
        &self,
        behaviour: Behaviour,
        steering: Steering,
        velocity: Vector2,
    ) -> (Vector2, MotionState) {
        let (force, distance) = match steering {
            Steering::Brake => {
                return (
                    velocity * self.params.deceleration_factor,
                    MotionState::Idle,
                )
            }
            Steering::Steer { force, distance } => (force, distance),
        };

        // distance overrides whatever the behaviour implied
        let state = MotionState::classify(&self.params, behaviour, distance);
        let velocity = match state {
            MotionState::Idle => velocity * self.params.deceleration_factor,
            MotionState::Arrive => {
                let factor = self.params.arrive_factor(distance);
                velocity + force * (factor * self.dt)
            }
            MotionState::Seek | MotionState::Evade | MotionState::Flee => {
                velocity + force * self.dt
            }
        };

        (velocity, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const DT: f32 = 0.02;

    fn controller() -> SteeringController {
        SteeringController::new(SteeringParameters::default(), DT).expect("valid params")
    }

    fn at(x: f32, y: f32) -> Vector2 {
        Vector2::new(x, y)
    }

    fn assert_close(actual: Vector2, expected: Vector2) {
        assert!(
            (actual - expected).magnitude() < 1e-4,
            "expected {:?} but got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn bad_construction() {
        assert_eq!(
            SteeringController::new(SteeringParameters::default(), 0.0).unwrap_err(),
            ConfigurationError::TickDuration(0.0)
        );

        let params = SteeringParameters {
            max_speed: 0.0,
            ..SteeringParameters::default()
        };
        assert!(SteeringController::new(params, DT).is_err());
    }

    #[test]
    fn no_target_brakes() {
        let controller = controller();
        for behaviour in Behaviour::iter() {
            let kinematics = AgentKinematics::new(at(2.0, 2.0), at(1.0, -2.0));
            let output = controller.step(behaviour, kinematics, None);

            assert_eq!(output.state, MotionState::Idle);
            assert_close(output.velocity, at(0.75, -1.5));
        }
    }

    #[test]
    fn idle_decays_monotonically() {
        let controller = controller();
        let mut kinematics = AgentKinematics::new(Vector2::zero(), at(3.0, 2.0));
        let target = Some(at(10.0, 0.0));

        let mut last = kinematics.velocity.magnitude();
        for _ in 0..50 {
            let output = controller.step(Behaviour::Idle, kinematics, target);
            assert_eq!(output.state, MotionState::Idle);

            let speed = output.velocity.magnitude();
            assert!(speed < last, "{} not less than {}", speed, last);
            assert!(speed.approx_eq(last * 0.75, (f32::EPSILON, 4)));

            last = speed;
            kinematics.velocity = output.velocity;
        }

        assert!(last < 1e-4);
    }

    #[test]
    fn idle_brakes_at_zero_stop_radius() {
        let params = SteeringParameters {
            stop_radius: 0.0,
            ..SteeringParameters::default()
        };
        let controller = SteeringController::new(params, DT).unwrap();

        let kinematics = AgentKinematics::new(Vector2::zero(), at(2.0, 0.0));
        let output = controller.step(Behaviour::Idle, kinematics, Some(at(0.0, 3.0)));
        assert_eq!(output.state, MotionState::Idle);
        assert_close(output.velocity, at(1.5, 0.0));
    }

    #[test]
    fn seek_at_full_strength() {
        let controller = controller();
        let kinematics = AgentKinematics::at_rest(Vector2::zero());

        let output = controller.step(Behaviour::Seek, kinematics, Some(at(10.0, 0.0)));
        assert_eq!(output.state, MotionState::Seek);
        assert_close(output.velocity, at(4.0 * DT, 0.0));
    }

    #[test]
    fn arrive_scenario() {
        let controller = controller();
        let kinematics = AgentKinematics::new(Vector2::zero(), at(4.0, 0.0));

        let output = controller.step(Behaviour::Seek, kinematics, Some(at(0.0, 1.0)));
        assert_eq!(output.state, MotionState::Arrive);

        // desired (0,4) - current (4,0) = (-4,4), scaled by ~0.724 and dt
        let factor = 0.01 + (1.0 - 0.5) / (1.2 - 0.5);
        let expected = at(4.0, 0.0) + at(-4.0, 4.0) * (factor * DT);
        assert_close(output.velocity, expected);
        assert_close(output.velocity, at(3.94206, 0.05794));
        assert!(output.velocity.magnitude() <= 4.0);
    }

    #[test]
    fn arrive_transitions() {
        let controller = controller();
        let kinematics = AgentKinematics::at_rest(Vector2::zero());
        let state_at = |distance: f32| {
            controller
                .step(Behaviour::Seek, kinematics, Some(at(distance, 0.0)))
                .state
        };

        assert_eq!(state_at(0.49), MotionState::Idle);
        assert_eq!(state_at(0.5), MotionState::Arrive);
        assert_eq!(state_at(1.19), MotionState::Arrive);
        assert_eq!(state_at(1.2), MotionState::Seek);

        // barely any steering just past the stop radius
        let output = controller.step(Behaviour::Seek, kinematics, Some(at(0.5001, 0.0)));
        let applied = output.velocity.x / (4.0 * DT);
        assert!((applied - 0.01).abs() < 1e-3, "applied {}", applied);

        // nearly full steering just inside the arrive radius
        let output = controller.step(Behaviour::Seek, kinematics, Some(at(1.1999, 0.0)));
        let applied = output.velocity.x / (4.0 * DT);
        assert!((applied - 1.01).abs() < 1e-3, "applied {}", applied);
    }

    #[test]
    fn evade_gating() {
        let controller = controller(); // evade radius 5
        let kinematics = AgentKinematics::new(Vector2::zero(), at(0.0, 1.0));

        // outside: brake
        let output = controller.step(Behaviour::Evade, kinematics, Some(at(6.0, 0.0)));
        assert_eq!(output.state, MotionState::Idle);
        assert_close(output.velocity, at(0.0, 0.75));

        // inside: away from the seek direction
        let output = controller.step(Behaviour::Evade, kinematics, Some(at(3.0, 0.0)));
        assert_eq!(output.state, MotionState::Evade);
        let seek = at(4.0, 0.0) - at(0.0, 1.0);
        assert_close(output.velocity, at(0.0, 1.0) - seek * DT);
        assert!(output.velocity.x < 0.0);
    }

    #[test]
    fn flee_gating_and_label() {
        let params = SteeringParameters {
            flee_radius: 2.0,
            ..SteeringParameters::default()
        };
        let controller = SteeringController::new(params, DT).unwrap();
        let kinematics = AgentKinematics::at_rest(Vector2::zero());

        let output = controller.step(Behaviour::Flee, kinematics, Some(at(0.0, 2.5)));
        assert_eq!(output.state, MotionState::Idle);
        assert_eq!(output.velocity, Vector2::zero());

        // far-range flight shows as evasion
        let output = controller.step(Behaviour::Flee, kinematics, Some(at(0.0, 1.5)));
        assert_eq!(output.state, MotionState::Evade);
        assert_close(output.velocity, at(0.0, -4.0 * DT));

        // close enough to arrive, so the ramp applies to fleeing too
        let output = controller.step(Behaviour::Flee, kinematics, Some(at(0.0, 1.0)));
        assert_eq!(output.state, MotionState::Arrive);
        assert!(output.velocity.y < 0.0 && output.velocity.y > -4.0 * DT);
    }

    #[test]
    fn zero_distance_is_finite() {
        let params = SteeringParameters {
            stop_radius: 0.0,
            ..SteeringParameters::default()
        };
        let zero_stop = SteeringController::new(params, DT).unwrap();
        let here = at(1.0, 1.0);
        let kinematics = AgentKinematics::new(here, at(2.0, -1.0));

        for behaviour in Behaviour::iter() {
            let output = zero_stop.step(behaviour, kinematics, Some(here));
            assert!(output.velocity.x.is_finite() && output.velocity.y.is_finite());
        }

        // seek onto itself arrives with no desired velocity, so only damps current velocity
        let output = zero_stop.step(Behaviour::Seek, kinematics, Some(here));
        assert_eq!(output.state, MotionState::Arrive);
        assert_close(output.velocity, at(2.0, -1.0) * (1.0 - 0.01 * DT));

        // default stop radius just brakes
        let output = controller().step(Behaviour::Seek, kinematics, Some(here));
        assert_eq!(output.state, MotionState::Idle);
        assert_close(output.velocity, at(1.5, -0.75));
    }

    #[test]
    fn speed_is_always_bounded() {
        let controller = controller();
        let max = controller.parameters().max_speed + 1e-5;

        let velocities = [at(0.0, 0.0), at(10.0, 0.0), at(-30.0, 25.0), at(3.9, 3.9)];
        let targets = [
            None,
            Some(at(0.0, 0.0)),
            Some(at(0.3, 0.0)),
            Some(at(0.0, 1.0)),
            Some(at(-4.0, 3.0)),
            Some(at(50.0, -50.0)),
        ];

        for behaviour in Behaviour::iter() {
            for &velocity in &velocities {
                for &target in &targets {
                    let mut kinematics = AgentKinematics::new(Vector2::zero(), velocity);
                    for _ in 0..20 {
                        let output = controller.step(behaviour, kinematics, target);
                        assert!(
                            output.velocity.magnitude() <= max,
                            "{:?} with {:?} towards {:?} gave {:?}",
                            behaviour,
                            velocity,
                            target,
                            output.velocity
                        );
                        kinematics.velocity = output.velocity;
                    }
                }
            }
        }
    }

    #[test]
    fn overspeed_is_clamped() {
        let controller = controller();
        let kinematics = AgentKinematics::new(Vector2::zero(), at(10.0, 0.0));

        let output = controller.step(Behaviour::Seek, kinematics, Some(at(20.0, 0.0)));
        assert_close(output.velocity, at(4.0, 0.0));

        // far too fast to square, still scaled down in the same direction
        let kinematics = AgentKinematics::new(Vector2::zero(), at(3e19, 0.0));
        let output = controller.step(Behaviour::Seek, kinematics, Some(at(10.0, 0.0)));
        assert_close(output.velocity, at(4.0, 0.0));
    }
}
