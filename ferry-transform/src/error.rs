//! Error types for ferry-transform.

use std::path::PathBuf;

use thiserror::Error;

use ferry_core::{TreeError, ValidationError};

/// All errors that can arise while applying or reversing a transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The step changed nothing and no-op steps are not being ignored.
    #[error("transformation '{transform}' was a no-op: {reason}")]
    Noop { transform: String, reason: String },

    /// The step has no inverse.
    #[error("transformation '{transform}' is not reversible")]
    NotReversible { transform: String },

    /// A move would overwrite an existing path.
    #[error("cannot move '{before}' to '{after}': destination already exists")]
    MoveCollision { before: PathBuf, after: PathBuf },

    /// A step was configured with invalid arguments.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A custom step reported a failure.
    #[error("transformation '{transform}' failed: {message}")]
    Failed { transform: String, message: String },
}

impl From<TreeError> for TransformError {
    fn from(e: TreeError) -> Self {
        TransformError::Io {
            path: e.path,
            source: e.source,
        }
    }
}

/// Convenience constructor for [`TransformError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TransformError {
    TransformError::Io {
        path: path.into(),
        source,
    }
}
