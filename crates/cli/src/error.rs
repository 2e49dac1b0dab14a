use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error opening file: {}", .0.display())]
    OpenFile(PathBuf),

    #[error("Error writing file: {}", .0.display())]
    WriteFile(PathBuf),

    #[error("Error creating parent directory: {}", .0.display())]
    ParentDir(PathBuf),

    #[error("Error parsing configuration: {0}")]
    Parse(String),

    #[error("Error serializing configuration: {0}")]
    ToToml(String),

    #[error("Cannot determine home directory")]
    HomeDir,

    #[error("Invalid {field} endpoint {value:?}: {reason}")]
    InvalidEndpoint { field: &'static str, value: String, reason: String },

    #[error("JWT secret at {} {reason}", .path.display())]
    InvalidJwt { path: PathBuf, reason: String },
}
