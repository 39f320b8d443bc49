//! Error types for buildcfg-core

use std::path::PathBuf;

use buildcfg_meta::{GroupId, TargetType};

use crate::config::{ResolutionStage, ValueOrigin};
use crate::environment::ConsistencyReport;

/// Result type for buildcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or checking target configurations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source value could not be coerced to the field's declared type
    #[error("Invalid {origin} value '{raw}' for {group}.{field}: expected {expected}")]
    InvalidSourceValue {
        group: GroupId,
        field: String,
        origin: ValueOrigin,
        raw: String,
        expected: String,
    },

    /// A value-taking flag appeared without a value
    #[error("Flag '-{flag}' for field '{field}' requires a value")]
    MissingFlagValue { flag: String, field: String },

    /// Operation attempted on a configuration at the wrong resolution stage
    #[error("Cannot {operation} target '{target}': configuration is {actual}, needs {required}")]
    Stage {
        target: String,
        operation: &'static str,
        required: ResolutionStage,
        actual: ResolutionStage,
    },

    /// The stored target type differs from the type being finalized
    #[error(
        "Cannot finalize target '{target}' as {requested}: target type is {recorded} (set by {origin})"
    )]
    TargetTypeConflict {
        target: String,
        requested: TargetType,
        recorded: TargetType,
        origin: ValueOrigin,
    },

    /// Write to a deprecated read-only alias
    #[error("Field '{field}' is a read-only alias of '{replacement}'")]
    ReadOnlyAlias { field: String, replacement: String },

    /// Targets sharing a build environment disagree on sensitive fields
    #[error(
        "Targets '{}' and '{}' cannot share a build environment: {} field(s) differ",
        .report.target_a,
        .report.target_b,
        .report.mismatches.len()
    )]
    InconsistentEnvironment { report: Box<ConsistencyReport> },

    /// Config file could not be parsed
    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A worker thread resolving a target panicked
    #[error("Resolution of target '{target}' panicked")]
    WorkerPanicked { target: String },

    // Transparent wrappers for underlying crate errors
    /// Identity, registry or value error from buildcfg-meta
    #[error(transparent)]
    Meta(#[from] buildcfg_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
