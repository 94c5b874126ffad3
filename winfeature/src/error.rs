//! Error types for feature management operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("PowerShell command failed: {0}")]
    PowerShell(String),

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("Malformed response from {operation}: missing field '{field}'")]
    ContractViolation {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Invalid feature name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("ServerManager PowerShell module is not available")]
    ModuleUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl Error {
    pub(crate) fn missing(operation: &'static str, field: &'static str) -> Self {
        Error::ContractViolation { operation, field }
    }
}
