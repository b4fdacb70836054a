//! Domain types for history migration.
//!
//! All file-state keys are relative `PathBuf`s; contents are raw bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An opaque revision identifier. Ordered only by the origin's own sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference(pub String);

impl Reference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Reference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Reference {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A change author: display name plus email.
///
/// Serializes as the `Name <email>` string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl FromStr for Author {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAuthor {
            value: s.to_owned(),
        };
        let trimmed = s.trim();
        let open = trimmed.find('<').ok_or_else(invalid)?;
        if !trimmed.ends_with('>') {
            return Err(invalid());
        }
        let name = trimmed[..open].trim();
        let email = trimmed[open + 1..trimmed.len() - 1].trim();
        if email.is_empty() || email.contains(['<', '>']) {
            return Err(invalid());
        }
        Ok(Author::new(name, email))
    }
}

impl TryFrom<String> for Author {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Author> for String {
    fn from(a: Author) -> Self {
        a.to_string()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a workflow turns origin history into destination writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowMode {
    /// Collapse the whole pending range into one destination write.
    #[default]
    Squash,
    /// Replay each origin change as its own destination write.
    Iterative,
    /// Migrate a single change on top of a destination baseline.
    ChangeRequest,
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowMode::Squash => write!(f, "SQUASH"),
            WorkflowMode::Iterative => write!(f, "ITERATIVE"),
            WorkflowMode::ChangeRequest => write!(f, "CHANGE_REQUEST"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One unit of origin history. Immutable once read from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub reference: Reference,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub author: Author,
    /// Complete file state at this revision, keyed by relative path.
    pub files: BTreeMap<PathBuf, Vec<u8>>,
}

impl Change {
    /// Create a change with no files. A missing timestamp defaults to now.
    pub fn new(
        reference: impl Into<Reference>,
        author: Author,
        message: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            reference: reference.into(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            message: message.into(),
            author,
            files: BTreeMap::new(),
        }
    }

    /// Builder-style helper adding one file to the change's state.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// First line of the message, used in release notes.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
