//! Error types for ferry-folder.

use std::path::PathBuf;

use thiserror::Error;

use ferry_core::{RepositoryError, TreeError};
use ferry_workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum FolderError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `changes.yaml` is not a list of change entries.
    #[error("failed to parse change manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `.ferry/history.json` is corrupt.
    #[error("failed to parse destination history {path}: {source}")]
    History {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no changes listed in {path}")]
    EmptyManifest { path: PathBuf },
}

impl From<TreeError> for FolderError {
    fn from(e: TreeError) -> Self {
        FolderError::Io {
            path: e.path,
            source: e.source,
        }
    }
}

impl From<FolderError> for RepositoryError {
    fn from(e: FolderError) -> Self {
        match e {
            FolderError::Io { path, source } => RepositoryError::Io { path, source },
            other => RepositoryError::Backend {
                repository: "folder".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<FolderError> for WorkflowError {
    fn from(e: FolderError) -> Self {
        WorkflowError::Repository(e.into())
    }
}

/// Convenience constructor for [`FolderError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> FolderError {
    FolderError::Io {
        path: path.into(),
        source,
    }
}
