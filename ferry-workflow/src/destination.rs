//! The write side of a migration.

use chrono::{DateTime, Utc};

use ferry_core::tree::FileTree;
use ferry_core::{Author, Glob, Reference, RepositoryError};

use crate::error::WorkflowError;

/// Everything a destination needs to record one migrated unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteUnit {
    /// Transformed checkout content, keyed by relative path.
    pub files: FileTree,
    pub message: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    /// Origin revision this unit was built from.
    pub origin_ref: Reference,
    /// Label under which `origin_ref` should be recorded.
    pub origin_label: String,
    /// Parent revision in the destination (CHANGE_REQUEST only).
    pub baseline: Option<String>,
    /// Destination paths owned by the workflow; others must be left alone.
    pub destination_files: Glob,
}

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterResult {
    Ok,
    /// The write happened, but the operator must confirm before the next unit.
    PromptToContinue,
}

/// A repository that migrated units are written to.
pub trait Destination: Send + Sync {
    /// Record one unit. Returns [`WorkflowError::EmptyChange`] when the unit
    /// would not change the destination and empty changes are refused.
    fn write(&self, unit: &WriteUnit) -> Result<WriterResult, WorkflowError>;

    /// Most recent value recorded for `label`, if any.
    fn previous_ref(&self, label: &str) -> Result<Option<Reference>, RepositoryError>;

    /// Label name used for baseline discovery when this destination's
    /// history is read back as an origin.
    fn label_name_when_origin(&self) -> String;
}
