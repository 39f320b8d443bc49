//! Error types for buildcfg-meta

use crate::registry::GroupId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Target identity is missing required field '{field}'")]
    MissingIdentityField { field: &'static str },

    #[error("Invalid target name '{name}': {reason}")]
    InvalidTargetName { name: String, reason: &'static str },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Architecture '{architecture}' is not valid for platform {platform}")]
    InvalidArchitecture {
        architecture: String,
        platform: String,
    },

    #[error("Target type {target_type} is not supported on platform {platform}")]
    UnsupportedTargetType {
        target_type: String,
        platform: String,
    },

    #[error("Value '{raw}' for field '{field}' is not a valid {expected}")]
    InvalidValue {
        field: String,
        expected: String,
        raw: String,
    },

    #[error("Field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown field '{field}' in group '{group}'")]
    UnknownField { group: GroupId, field: String },

    #[error("Computed field '{field}' depends on itself through '{via}'")]
    DependencyCycle { field: String, via: String },

    #[error("Invalid descriptor for field '{field}': {reason}")]
    InvalidDescriptor { field: String, reason: String },
}
