pub use cgmath;
pub use cgmath::{InnerSpace, MetricSpace, VectorSpace, Zero};
pub use derive_more;
pub use float_cmp::ApproxEq;
pub use logging::prelude::*;
pub use logging::{log_scope, slog_value_debug, slog_value_display};
pub use strum;
pub use thiserror::{self, Error};

pub use vector::Vector2Ext;

pub type F = f32;
pub type Vector2 = cgmath::Vector2<F>;

pub type BoxedResult<T> = Result<T, Box<dyn std::error::Error>>;

mod vector;
