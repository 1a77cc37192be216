//! Unified error types for the wireplan workspace.
//!
//! Every fallible operation in the workspace returns [`WireplanError`].
//! Ambiguous alias resolutions and logical constraint violations are
//! deliberately absent: those are reported as values, not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum WireplanError {
    /// An active profile set could not be constructed.
    #[error("invalid profiles: {message}")]
    InvalidProfiles {
        /// Description of the invalid profile set.
        message: String,
    },

    /// A type declaration or type composition is malformed.
    #[error("invalid type: {message}")]
    InvalidType {
        /// Description of the malformed type.
        message: String,
    },

    /// A definition violates a structural invariant of the data model.
    #[error("invalid definition: {message}")]
    InvalidDefinition {
        /// Description of the broken invariant.
        message: String,
    },

    /// Two inject definitions tie for the highest priority on one parameter.
    #[error(
        "multiple inject definitions share the highest priority for {service}::{method}(${parameter})"
    )]
    MultipleInjectOnSameParameter {
        /// Service type owning the method.
        service: String,
        /// Method name.
        method: String,
        /// Parameter or property name.
        parameter: String,
    },

    /// An inject definition names a parameter store that was not configured.
    #[error("parameter store \"{store}\" not found")]
    ParameterStoreNotFound {
        /// Name of the missing store.
        store: String,
    },

    /// An inject value cannot be used the way its definition requires.
    #[error("invalid inject value for {service}::{method}(${parameter}): {message}")]
    InvalidInjectValue {
        /// Service type owning the method.
        service: String,
        /// Method name.
        method: String,
        /// Parameter or property name.
        parameter: String,
        /// Description of the problem.
        message: String,
    },

    /// Services depend on each other in a cycle.
    #[error("circular dependency detected between services: {}", .services.join(", "))]
    CircularDependency {
        /// Services that take part in the cycle.
        services: Vec<String>,
    },

    /// A cached definition was written by another serializer version.
    #[error("mismatched container definition serializer versions: expected {expected}, got {actual}")]
    MismatchedSerializerVersions {
        /// Version of the running serializer.
        expected: String,
        /// Version recorded in the document.
        actual: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, WireplanError>;
