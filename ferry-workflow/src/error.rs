//! Error types for ferry-workflow.

use std::path::PathBuf;

use thiserror::Error;

use ferry_core::{RepositoryError, TreeError, ValidationError};
use ferry_transform::TransformError;

/// All errors that can end a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Bad configuration, glob, or non-reversible pipeline.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Origin or destination access failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A transformation failed for the current unit.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The operator declined to continue.
    #[error("{message}")]
    ChangeRejected { message: String },

    /// The destination refused a unit that would change nothing.
    #[error("empty change: migrating {reference} would not change the destination")]
    EmptyChange { reference: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<TreeError> for WorkflowError {
    fn from(e: TreeError) -> Self {
        WorkflowError::Io {
            path: e.path,
            source: e.source,
        }
    }
}

/// Convenience constructor for [`WorkflowError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WorkflowError {
    WorkflowError::Io {
        path: path.into(),
        source,
    }
}
