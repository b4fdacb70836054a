//! Error types for ferry-core.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or missing configuration. Always reported to the operator, never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A glob pattern failed to compile.
    #[error("Cannot create a glob from: include='{include}' and exclude='{exclude}': {source}")]
    InvalidGlob {
        include: String,
        exclude: String,
        #[source]
        source: globset::Error,
    },

    /// A glob pattern resolved against a checkout root contains `.` or `..`.
    #[error("path has unexpected . or .. components: {pattern}")]
    UnexpectedPathComponents { pattern: String },

    /// A mandatory workflow field was not configured.
    #[error("missing mandatory field '{field}'")]
    MissingField { field: &'static str },

    /// The transformation pipeline cannot be reverted.
    #[error("Workflow '{workflow}' is not reversible")]
    NotReversible { workflow: String },

    /// An author string not in `Name <email>` form.
    #[error("invalid author '{value}': expected 'Name <email>'")]
    InvalidAuthor { value: String },

    /// The configuration file did not exist.
    #[error("configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// YAML parse error on load, with file path and serde_yaml line context.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file exists but could not be read.
    #[error("I/O error reading configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other semantic problem in the configuration.
    #[error("{0}")]
    Invalid(String),
}

/// Failures talking to an origin or destination. Fatal for the run.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// `--last-rev` override could not be resolved against the origin.
    #[error("Could not resolve --last-rev flag. Please make sure it exists in the origin: {reference}")]
    InvalidLastRev { reference: String },

    /// The destination carries no record of a previously migrated revision.
    #[error("Previous revision label {label} could not be found")]
    LabelNotFound { label: String },

    /// A reference is unknown to the repository.
    #[error("reference '{reference}' not found in {repository}")]
    ReferenceNotFound {
        reference: String,
        repository: String,
    },

    /// Underlying I/O failure inside a backend.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure that has no better variant.
    #[error("{repository}: {message}")]
    Backend { repository: String, message: String },
}

impl From<TreeError> for RepositoryError {
    fn from(e: TreeError) -> Self {
        RepositoryError::Io {
            path: e.path,
            source: e.source,
        }
    }
}

/// I/O failure inside a checkout tree, annotated with the offending path.
#[derive(Debug, Error)]
#[error("I/O error at {path}: {source}")]
pub struct TreeError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Convenience constructor for [`TreeError`].
pub(crate) fn tree_err(path: impl Into<PathBuf>, source: std::io::Error) -> TreeError {
    TreeError {
        path: path.into(),
        source,
    }
}
