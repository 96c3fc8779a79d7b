//! Error types for the clustering core

use thiserror::Error;

/// Fatal errors raised by the clustering and reconciliation core.
///
/// Any of these aborts the run before output is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HomologyError {
    /// A pair or source-cluster row is malformed
    #[error("malformed input row {row}: {reason}")]
    InputShape { row: usize, reason: String },

    /// A required column is absent from an input table
    #[error("input is missing required column '{column}'")]
    MissingColumn { column: String },

    /// Traversal invariant violated; indicates a defect
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

impl HomologyError {
    pub fn input_shape(row: usize, reason: impl Into<String>) -> Self {
        Self::InputShape {
            row,
            reason: reason.into(),
        }
    }
}

/// Non-fatal finding reported by collaborators: one identifier is claimed by
/// several clusters of the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousResolutionWarning {
    pub source: String,
    pub identifier: String,
    pub cluster_keys: Vec<String>,
}

impl std::fmt::Display for AmbiguousResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} identifier {} belongs to clusters {}",
            self.source,
            self.identifier,
            self.cluster_keys.join(", ")
        )
    }
}
