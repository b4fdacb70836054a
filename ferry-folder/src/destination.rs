//! A destination that mirrors migrated trees into a local directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ferry_core::tree;
use ferry_core::{Reference, RepositoryError};
use ferry_workflow::{Destination, WorkflowError, WriteUnit, WriterResult};

use crate::error::io_err;
use crate::history::{self, HistoryRecord, STATE_DIR};

pub const LABEL: &str = "FolderDestination-RevId";

#[derive(Debug, Clone)]
pub struct FolderDestination {
    root: PathBuf,
    confirm: bool,
}

impl FolderDestination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            confirm: false,
        }
    }

    /// Ask the operator to confirm after every write.
    pub fn with_confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop every destination-owned file so the unit's tree replaces it.
    fn clear_owned_files(&self, unit: &WriteUnit) -> Result<usize, WorkflowError> {
        let matcher = unit.destination_files.relative_to(&self.root)?;
        let mut removed = 0;
        for rel in tree::list_files(&self.root)? {
            if rel.starts_with(STATE_DIR) {
                continue;
            }
            let path = self.root.join(&rel);
            if matcher.matches(&path) {
                std::fs::remove_file(&path).map_err(|e| WorkflowError::from(io_err(&path, e)))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl Destination for FolderDestination {
    fn write(&self, unit: &WriteUnit) -> Result<WriterResult, WorkflowError> {
        let mut history = history::load_at(&self.root)?;
        let digest = tree::digest(&unit.files);
        if history.last().is_some_and(|last| last.digest == digest) {
            return Err(WorkflowError::EmptyChange {
                reference: unit.origin_ref.to_string(),
            });
        }

        let removed = self.clear_owned_files(unit)?;
        tree::write_tree(&self.root, &unit.files)?;
        tracing::debug!(
            "replaced {removed} file(s) with {} in {}",
            unit.files.len(),
            self.root.display()
        );

        history.records.push(HistoryRecord {
            origin_ref: unit.origin_ref.to_string(),
            message: unit.message.clone(),
            author: unit.author.clone(),
            timestamp: unit.timestamp,
            baseline: unit.baseline.clone(),
            labels: BTreeMap::from([(unit.origin_label.clone(), unit.origin_ref.to_string())]),
            digest,
        });
        history::save_at(&self.root, &history)?;
        tracing::info!("recorded {} in {}", unit.origin_ref, self.root.display());

        Ok(if self.confirm {
            WriterResult::PromptToContinue
        } else {
            WriterResult::Ok
        })
    }

    fn previous_ref(&self, label: &str) -> Result<Option<Reference>, RepositoryError> {
        let history = history::load_at(&self.root)?;
        Ok(history.latest(label).map(Reference::from))
    }

    fn label_name_when_origin(&self) -> String {
        LABEL.to_string()
    }
}
