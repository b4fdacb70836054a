//! Destination history: one JSON record per write.
//!
//! Persists a `HistoryFile` document at `<root>/.ferry/history.json`.
//! Writes go to `history.json.tmp` first and are renamed into place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ferry_core::Author;

use crate::error::{io_err, FolderError};

/// Directory, relative to the destination root, that ferry owns.
pub const STATE_DIR: &str = ".ferry";

/// One destination write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub origin_ref: String,
    pub message: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
    /// `label -> value` pairs, e.g. `FolderOrigin-RevId -> 3`.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Digest of the written tree, used to refuse empty changes.
    pub digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub records: Vec<HistoryRecord>,
}

impl HistoryFile {
    /// Newest value recorded under `label`.
    pub fn latest(&self, label: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find_map(|record| record.labels.get(label).map(String::as_str))
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }
}

/// `<root>/.ferry/history.json`
pub fn history_path_at(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("history.json")
}

/// Load the history under `root`. A missing file is an empty history.
pub fn load_at(root: &Path) -> Result<HistoryFile, FolderError> {
    let path = history_path_at(root);
    if !path.exists() {
        return Ok(HistoryFile::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|source| FolderError::History { path, source })
}

/// Save atomically: write `<path>.tmp`, then rename over `<path>`.
pub fn save_at(root: &Path, history: &HistoryFile) -> Result<(), FolderError> {
    let path = history_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid history path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(history)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
