pub mod models;
pub mod points;

pub use models::*;
pub use points::{format_points, parse_points, ParsedPoints, PointsPolicy};
