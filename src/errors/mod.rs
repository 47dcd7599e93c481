use std::path::Path;

use thiserror::Error;

/// Validation failures for league management
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("League name must not be empty")]
    BlankName,
    #[error("League '{0}' already exists")]
    Duplicate(String),
    #[error("League '{0}' does not exist")]
    Unknown(String),
}

/// Raised only when invalid points are not coerced to zero
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointsError {
    #[error("Row {row}: invalid points value {value:?}")]
    Invalid { row: usize, value: String },
}

/// Add context to file read errors
pub fn read_context(path: &Path) -> String {
    format!("Failed to read {}", path.display())
}

/// Add context to file write errors
pub fn write_context(path: &Path) -> String {
    format!("Failed to write {}", path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str, path: &Path) -> String {
    format!("Failed to parse {} from {}", data_type, path.display())
}
