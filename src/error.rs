//! Error types for watertight.
//!
//! Every fallible operation in the crate returns [`Result`]. Input validation
//! errors are raised before any spatial-index work starts, so a failed call
//! never leaves partial output behind.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ManifoldError`].
pub type Result<T> = std::result::Result<T, ManifoldError>;

/// Errors that can occur while loading, repairing or saving a mesh.
#[derive(Error, Debug)]
pub enum ManifoldError {
    /// The input has no vertices.
    #[error("input mesh has no vertices")]
    EmptyVertices,

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The offending index as given by the caller (may be negative).
        vertex: i64,
    },

    /// A flat buffer does not hold whole rows of three values.
    #[error("{name} buffer of length {len} is not a multiple of 3")]
    InvalidDimension {
        /// Which buffer was malformed.
        name: &'static str,
        /// Its length.
        len: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// The requested subdivision would exceed the memory budget.
    #[error("resource exhausted: {what} needs {requested}, limit is {limit}")]
    ResourceExhausted {
        /// What ran out.
        what: &'static str,
        /// How much was requested.
        requested: usize,
        /// The configured or hard limit.
        limit: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl ManifoldError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ManifoldError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error was caused by malformed caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ManifoldError::EmptyVertices
                | ManifoldError::InvalidVertexIndex { .. }
                | ManifoldError::InvalidDimension { .. }
                | ManifoldError::NonFiniteVertex { .. }
                | ManifoldError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = ManifoldError::invalid_param("depth", -2, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: depth = -2 (must be non-negative)"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_resource_error_is_not_input() {
        let err = ManifoldError::ResourceExhausted {
            what: "octree cells",
            requested: 10,
            limit: 5,
        };
        assert!(!err.is_invalid_input());
    }
}
