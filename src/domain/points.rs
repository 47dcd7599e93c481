use crate::errors::PointsError;

use super::models::present;

/// How unparseable point values are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsPolicy {
    pub coerce_invalid_points_to_zero: bool,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            coerce_invalid_points_to_zero: true,
        }
    }
}

/// Outcome of reading one points cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedPoints {
    Missing,
    Valid(f64),
    Invalid,
}

impl PointsPolicy {
    /// Resolve a raw cell to a number. Missing cells are always zero.
    pub fn resolve(&self, row: usize, raw: Option<&str>) -> Result<f64, PointsError> {
        match parse_points(raw) {
            ParsedPoints::Missing => Ok(0.0),
            ParsedPoints::Valid(value) => Ok(value),
            ParsedPoints::Invalid if self.coerce_invalid_points_to_zero => Ok(0.0),
            ParsedPoints::Invalid => Err(PointsError::Invalid {
                row,
                value: raw.unwrap_or_default().to_string(),
            }),
        }
    }
}

pub fn parse_points(raw: Option<&str>) -> ParsedPoints {
    let Some(text) = present(raw) else {
        return ParsedPoints::Missing;
    };

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => ParsedPoints::Valid(value),
        _ => ParsedPoints::Invalid,
    }
}

/// Integral totals print without a fractional part
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{:.0}", points)
    } else {
        format!("{}", points)
    }
}
