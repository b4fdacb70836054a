//! An origin backed by snapshot directories and a YAML manifest.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use ferry_core::tree;
use ferry_core::{Author, Change, Reference, RepositoryError};
use ferry_workflow::Origin;

use crate::error::{io_err, FolderError};

pub const MANIFEST: &str = "changes.yaml";
pub const LABEL: &str = "FolderOrigin-RevId";

/// One manifest entry. `path` is the snapshot directory, relative to the root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeEntry {
    #[serde(rename = "ref")]
    pub reference: String,
    pub message: String,
    pub author: Author,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FolderOrigin {
    root: PathBuf,
}

impl FolderOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Manifest entries, oldest first.
    pub fn entries(&self) -> Result<Vec<ChangeEntry>, FolderError> {
        let path = self.root.join(MANIFEST);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let entries: Vec<ChangeEntry> = serde_yaml::from_str(&contents)
            .map_err(|source| FolderError::Manifest { path: path.clone(), source })?;
        if entries.is_empty() {
            return Err(FolderError::EmptyManifest { path });
        }
        Ok(entries)
    }

    fn load(&self, entry: &ChangeEntry) -> Result<Change, FolderError> {
        let snapshot = self.root.join(&entry.path);
        let mut change = Change::new(
            entry.reference.as_str(),
            entry.author.clone(),
            entry.message.as_str(),
            entry.timestamp,
        );
        change.files = tree::read_tree(&snapshot)?;
        tracing::debug!(
            "loaded {} file(s) for {} from {}",
            change.files.len(),
            entry.reference,
            snapshot.display()
        );
        Ok(change)
    }

    fn position(&self, entries: &[ChangeEntry], reference: &str) -> Result<usize, RepositoryError> {
        entries
            .iter()
            .position(|e| e.reference == reference)
            .ok_or_else(|| RepositoryError::ReferenceNotFound {
                reference: reference.to_string(),
                repository: self.root.display().to_string(),
            })
    }
}

impl Origin for FolderOrigin {
    fn resolve(&self, reference: Option<&str>) -> Result<Change, RepositoryError> {
        let entries = self.entries()?;
        let index = match reference {
            Some(reference) => self.position(&entries, reference)?,
            None => entries.len() - 1,
        };
        Ok(self.load(&entries[index])?)
    }

    fn changes(
        &self,
        previous: Option<&Reference>,
        target: &Reference,
    ) -> Result<Vec<Change>, RepositoryError> {
        let entries = self.entries()?;
        let end = self.position(&entries, target.as_str())?;
        let start = match previous {
            Some(previous) => self.position(&entries, previous.as_str())? + 1,
            None => 0,
        };
        if start > end {
            return Ok(Vec::new());
        }
        entries[start..=end]
            .iter()
            .map(|entry| self.load(entry).map_err(RepositoryError::from))
            .collect()
    }

    fn label_name(&self) -> String {
        LABEL.to_string()
    }
}
