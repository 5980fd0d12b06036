use std::fmt::{Display, Formatter};

use color::ColorRgb;
use common::*;

use crate::{Behaviour, SteeringParameters};

/// Somewhere to draw debug shapes, in world coordinates
pub trait DebugDraw {
    fn debug_add_circle(&mut self, centre: Vector2, radius: f32, color: ColorRgb);

    fn debug_add_line(&mut self, from: Vector2, to: Vector2, color: ColorRgb);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    Circle {
        centre: Vector2,
        radius: f32,
        color: ColorRgb,
    },
    Line {
        from: Vector2,
        to: Vector2,
        color: ColorRgb,
    },
}

slog_value_display!(DebugShape);

impl Display for DebugShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugShape::Circle {
                centre,
                radius,
                color,
            } => write!(
                f,
                "circle {} at ({:.2}, {:.2}) r={:.2}",
                color, centre.x, centre.y, radius
            ),
            DebugShape::Line { from, to, color } => write!(
                f,
                "line {} ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                color, from.x, from.y, to.x, to.y
            ),
        }
    }
}

/// Radii around the agent and a line to its target. Purely cosmetic
#[derive(Default)]
pub struct SteeringDebugRenderer;

impl SteeringDebugRenderer {
    pub fn render<D: DebugDraw>(
        &self,
        draw: &mut D,
        params: &SteeringParameters,
        behaviour: Behaviour,
        position: Vector2,
        target: Option<Vector2>,
    ) {
        // nothing to show without a target
        let target = match target {
            Some(t) => t,
            None => return,
        };

        draw.debug_add_circle(position, params.arrive_radius, ColorRgb::WHITE);
        draw.debug_add_circle(position, params.stop_radius, ColorRgb::GREEN);

        if let Some(radius) = behaviour.trigger_radius(params) {
            let color = if let Behaviour::Flee = behaviour {
                ColorRgb::BLUE
            } else {
                ColorRgb::RED
            };
            draw.debug_add_circle(position, radius, color);
        }

        draw.debug_add_line(position, target, ColorRgb::GREY);
    }
}

/// Collects shapes for later, e.g. to hand to a renderer on another thread
impl DebugDraw for Vec<DebugShape> {
    fn debug_add_circle(&mut self, centre: Vector2, radius: f32, color: ColorRgb) {
        self.push(DebugShape::Circle {
            centre,
            radius,
            color,
        });
    }

    fn debug_add_line(&mut self, from: Vector2, to: Vector2, color: ColorRgb) {
        self.push(DebugShape::Line { from, to, color });
    }
}
