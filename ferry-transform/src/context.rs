//! Migration context — the mutable state a pipeline sees for one unit.

use std::path::{Path, PathBuf};

use ferry_core::{Author, Change, Console};

use crate::error::TransformError;

/// Changes visible to transformations while a unit is processed.
#[derive(Debug, Clone, Default)]
pub struct Changes {
    current: Vec<Change>,
    migrated: Vec<Change>,
}

impl Changes {
    pub fn new(current: Vec<Change>, migrated: Vec<Change>) -> Self {
        Self { current, migrated }
    }

    /// Changes in the unit being processed, oldest first.
    pub fn current(&self) -> &[Change] {
        &self.current
    }

    /// Changes already migrated earlier in this run, oldest first.
    pub fn migrated(&self) -> &[Change] {
        &self.migrated
    }
}

/// Per-unit state handed to every [`crate::Transformation`].
///
/// `message` and `author` start from the unit and may be replaced by any
/// step; later steps observe the updated values.
pub struct MigrationContext<'a> {
    checkout: PathBuf,
    message: String,
    author: Author,
    changes: Changes,
    console: &'a dyn Console,
    ignore_noop: bool,
}

impl<'a> MigrationContext<'a> {
    pub fn new(
        checkout: impl Into<PathBuf>,
        message: impl Into<String>,
        author: Author,
        changes: Changes,
        console: &'a dyn Console,
    ) -> Self {
        Self {
            checkout: checkout.into(),
            message: message.into(),
            author,
            changes,
            console,
            ignore_noop: false,
        }
    }

    pub fn with_ignore_noop(mut self, ignore_noop: bool) -> Self {
        self.ignore_noop = ignore_noop;
        self
    }

    /// Same message, author and changes, operating on another directory.
    pub fn for_checkout(&self, checkout: impl Into<PathBuf>) -> MigrationContext<'a> {
        MigrationContext {
            checkout: checkout.into(),
            message: self.message.clone(),
            author: self.author.clone(),
            changes: self.changes.clone(),
            console: self.console,
            ignore_noop: self.ignore_noop,
        }
    }

    pub fn checkout(&self) -> &Path {
        &self.checkout
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn set_author(&mut self, author: Author) {
        self.author = author;
    }

    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    pub fn console(&self) -> &'a dyn Console {
        self.console
    }

    pub fn ignore_noop(&self) -> bool {
        self.ignore_noop
    }

    /// A step changed nothing: warn when no-ops are ignored, fail otherwise.
    pub fn report_noop(&self, transform: &str, reason: &str) -> Result<(), TransformError> {
        if self.ignore_noop {
            self.console
                .warn(&format!("Ignored no-op transformation '{transform}': {reason}"));
            Ok(())
        } else {
            Err(TransformError::Noop {
                transform: transform.to_string(),
                reason: reason.to_string(),
            })
        }
    }

    /// Consume the context, returning the final message and author.
    pub fn into_metadata(self) -> (String, Author) {
        (self.message, self.author)
    }
}
