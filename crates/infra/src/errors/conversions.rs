//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use fids_domain::FidsError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FidsError);

impl From<InfraError> for FidsError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FidsError> for InfraError {
    fn from(value: FidsError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFidsError {
    fn into_fids(self) -> FidsError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → FidsError */
/* -------------------------------------------------------------------------- */

impl IntoFidsError for IoError {
    fn into_fids(self) -> FidsError {
        match self.kind() {
            ErrorKind::NotFound => FidsError::Config(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                FidsError::Config(format!("permission denied reading file: {self}"))
            }
            ErrorKind::InvalidData => FidsError::Config(format!("file is not valid UTF-8: {self}")),
            _ => FidsError::Internal(format!("I/O error: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_fids())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → FidsError */
/* -------------------------------------------------------------------------- */

impl IntoFidsError for JsonError {
    fn into_fids(self) -> FidsError {
        use serde_json::error::Category;

        match self.classify() {
            Category::Syntax | Category::Eof => FidsError::Config(format!(
                "Invalid JSON format at line {} column {}: {self}",
                self.line(),
                self.column()
            )),
            Category::Data => FidsError::Config(format!("Invalid JSON value: {self}")),
            Category::Io => FidsError::Internal(format!("JSON I/O error: {self}")),
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_fids())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → FidsError */
/* -------------------------------------------------------------------------- */

impl IntoFidsError for TomlError {
    fn into_fids(self) -> FidsError {
        FidsError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_fids())
    }
}
