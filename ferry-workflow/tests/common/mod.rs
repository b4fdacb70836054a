//! In-memory origin and destination used by the workflow integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use ferry_core::tree::FileTree;
use ferry_core::{Author, Authoring, Change, Reference, RepositoryError};
use ferry_transform::{FnTransform, Replace, Transformation};
use ferry_workflow::{Destination, Origin, WorkflowBuilder, WorkflowError, WriteUnit, WriterResult};

pub const PREFIX: &str = "TRANSFORMED";
pub const ORIGIN_LABEL: &str = "MemoryOrigin-RevId";
pub const DESTINATION_LABEL: &str = "RecordingDestination-RevId";

pub fn original_author() -> Author {
    Author::new("Foo Bar", "foo@bar.com")
}

pub fn not_whitelisted_author() -> Author {
    Author::new("Secret Coder", "secret@coder.com")
}

pub fn default_author() -> Author {
    Author::new("Ferry", "no-reply@ferry.dev")
}

// ---------------------------------------------------------------------------
// MemoryOrigin
// ---------------------------------------------------------------------------

/// Linear history; the reference of each change is its index.
pub struct MemoryOrigin {
    state: Mutex<OriginState>,
}

struct OriginState {
    changes: Vec<Change>,
    author: Author,
}

impl MemoryOrigin {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(OriginState {
                changes: Vec::new(),
                author: original_author(),
            }),
        })
    }

    /// Author of every change added from now on.
    pub fn set_author(&self, author: Author) -> &Self {
        self.state.lock().expect("origin lock").author = author;
        self
    }

    /// Message `"<ts> change"`.
    pub fn add_simple_change(&self, timestamp: i64) -> &Self {
        self.add_simple_change_with_message(timestamp, &format!("{timestamp} change"))
    }

    /// `file.txt` holds the change's own reference.
    pub fn add_simple_change_with_message(&self, timestamp: i64, message: &str) -> &Self {
        let reference = self.state.lock().expect("origin lock").changes.len();
        let files = FileTree::from([("file.txt".into(), reference.to_string().into_bytes())]);
        self.add_change(timestamp, files, message)
    }

    pub fn single_file_change(&self, timestamp: i64, message: &str, path: &str, content: &str) -> &Self {
        let files = FileTree::from([(path.into(), content.as_bytes().to_vec())]);
        self.add_change(timestamp, files, message)
    }

    pub fn add_change(&self, timestamp: i64, files: FileTree, message: &str) -> &Self {
        let mut state = self.state.lock().expect("origin lock");
        let reference = state.changes.len().to_string();
        let mut change = Change::new(
            reference.as_str(),
            state.author.clone(),
            message,
            Utc.timestamp_opt(timestamp, 0).single(),
        );
        change.files = files;
        state.changes.push(change);
        drop(state);
        self
    }

    pub fn head(&self) -> String {
        let state = self.state.lock().expect("origin lock");
        (state.changes.len().saturating_sub(1)).to_string()
    }

    fn index_of(changes: &[Change], reference: &str) -> Result<usize, RepositoryError> {
        changes
            .iter()
            .position(|c| c.reference.as_str() == reference)
            .ok_or_else(|| RepositoryError::ReferenceNotFound {
                reference: reference.to_string(),
                repository: "memory origin".to_string(),
            })
    }
}

impl Origin for MemoryOrigin {
    fn resolve(&self, reference: Option<&str>) -> Result<Change, RepositoryError> {
        let state = self.state.lock().expect("origin lock");
        match reference {
            Some(reference) => Ok(state.changes[Self::index_of(&state.changes, reference)?].clone()),
            None => state.changes.last().cloned().ok_or_else(|| RepositoryError::Backend {
                repository: "memory origin".to_string(),
                message: "empty history".to_string(),
            }),
        }
    }

    fn changes(
        &self,
        previous: Option<&Reference>,
        target: &Reference,
    ) -> Result<Vec<Change>, RepositoryError> {
        let state = self.state.lock().expect("origin lock");
        let end = Self::index_of(&state.changes, target.as_str())?;
        let start = match previous {
            Some(previous) => Self::index_of(&state.changes, previous.as_str())? + 1,
            None => 0,
        };
        if start > end {
            return Ok(Vec::new());
        }
        Ok(state.changes[start..=end].to_vec())
    }

    fn label_name(&self) -> String {
        ORIGIN_LABEL.to_string()
    }
}

// ---------------------------------------------------------------------------
// RecordingDestination
// ---------------------------------------------------------------------------

/// Records every unit; answers with scripted results, then `Ok`.
pub struct RecordingDestination {
    processed: Mutex<Vec<WriteUnit>>,
    results: Mutex<VecDeque<WriterResult>>,
    fail_on_empty_change: bool,
}

impl RecordingDestination {
    pub fn new() -> Arc<Self> {
        Self::with_results([])
    }

    pub fn with_results(results: impl IntoIterator<Item = WriterResult>) -> Arc<Self> {
        Arc::new(Self {
            processed: Mutex::new(Vec::new()),
            results: Mutex::new(results.into_iter().collect()),
            fail_on_empty_change: false,
        })
    }

    pub fn failing_on_empty_change() -> Arc<Self> {
        Arc::new(Self {
            processed: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            fail_on_empty_change: true,
        })
    }

    pub fn processed(&self) -> Vec<WriteUnit> {
        self.processed.lock().expect("destination lock").clone()
    }
}

impl Destination for RecordingDestination {
    fn write(&self, unit: &WriteUnit) -> Result<WriterResult, WorkflowError> {
        let mut processed = self.processed.lock().expect("destination lock");
        if self.fail_on_empty_change && processed.last().map(|last| &last.files) == Some(&unit.files) {
            return Err(WorkflowError::EmptyChange {
                reference: unit.origin_ref.to_string(),
            });
        }
        processed.push(unit.clone());
        Ok(self
            .results
            .lock()
            .expect("results lock")
            .pop_front()
            .unwrap_or(WriterResult::Ok))
    }

    fn previous_ref(&self, label: &str) -> Result<Option<Reference>, RepositoryError> {
        let processed = self.processed.lock().expect("destination lock");
        Ok(processed
            .iter()
            .rev()
            .find(|unit| unit.origin_label == label)
            .map(|unit| unit.origin_ref.clone()))
    }

    fn label_name_when_origin(&self) -> String {
        DESTINATION_LABEL.to_string()
    }
}

// ---------------------------------------------------------------------------
// Workflow helpers
// ---------------------------------------------------------------------------

/// Prefixes every number at the start of a line with [`PREFIX`].
pub fn prefix_numbers() -> Arc<dyn Transformation> {
    Arc::new(
        Replace::new(
            "${linestart}${number}",
            format!("${{linestart}}{PREFIX}${{number}}"),
            BTreeMap::from([
                ("number".to_string(), "[0-9]+".to_string()),
                ("linestart".to_string(), "^".to_string()),
            ]),
            true,
            ferry_core::Glob::all(),
        )
        .expect("valid replace"),
    )
}

/// Named `default`, overwrite authoring, no transformations.
pub fn bare_workflow(origin: &Arc<MemoryOrigin>, destination: &Arc<RecordingDestination>) -> WorkflowBuilder {
    WorkflowBuilder::new("default")
        .origin(origin.clone())
        .destination(destination.clone())
        .authoring(Authoring::overwrite(default_author()))
}

/// [`bare_workflow`] plus [`prefix_numbers`].
pub fn workflow(origin: &Arc<MemoryOrigin>, destination: &Arc<RecordingDestination>) -> WorkflowBuilder {
    bare_workflow(origin, destination).transformation(prefix_numbers())
}

pub fn content(unit: &WriteUnit, path: &str) -> String {
    String::from_utf8_lossy(&unit.files[std::path::Path::new(path)]).into_owned()
}

pub fn whitelisted() -> Authoring {
    Authoring::whitelisted(default_author(), [original_author().email])
}

/// Hands out the same fakes for every backend entry in a config.
pub struct Fakes {
    pub origin: Arc<MemoryOrigin>,
    pub destination: Arc<RecordingDestination>,
}

impl ferry_workflow::BackendFactory for Fakes {
    fn origin(
        &self,
        _config: &ferry_core::config::BackendConfig,
    ) -> Result<Arc<dyn Origin>, ferry_core::ValidationError> {
        Ok(self.origin.clone())
    }

    fn destination(
        &self,
        _config: &ferry_core::config::BackendConfig,
    ) -> Result<Arc<dyn Destination>, ferry_core::ValidationError> {
        Ok(self.destination.clone())
    }
}

// ---------------------------------------------------------------------------
// Message rewriting fixtures
// ---------------------------------------------------------------------------

/// `first` renders release notes for the current changes, `second` appends
/// a trailer and swaps the author, `third` lists the migrated changes.
pub fn message_transforms(with_migrated: bool) -> Vec<FnTransform> {
    let mut steps = vec![
        FnTransform::metadata("first", |ctx| {
            let message: String = ctx
                .changes()
                .current()
                .iter()
                .rev()
                .map(|c| format!("CHANGE: {} ({}) by {}\n", c.message, c.reference, c.author.name))
                .collect();
            ctx.set_message(message);
            Ok(())
        }),
        FnTransform::metadata("second", |ctx| {
            let message = format!("{}\nBAR = foo\n", ctx.message());
            ctx.set_message(message);
            ctx.set_author(Author::new("Someone", "someone@somewhere.com"));
            Ok(())
        }),
    ];
    if with_migrated {
        steps.push(FnTransform::metadata("third", |ctx| {
            let previous: String = ctx
                .changes()
                .migrated()
                .iter()
                .map(|c| format!("PREV: {} ({}) by {}\n", c.message, c.reference, c.author.name))
                .collect();
            let message = format!("{}\nPREVIOUS CHANGES:\n{previous}", ctx.message());
            ctx.set_message(message);
            Ok(())
        }));
    }
    steps
}

pub fn message_origin() -> Arc<MemoryOrigin> {
    let origin = MemoryOrigin::new();
    origin
        .add_simple_change_with_message(0, "first commit")
        .set_author(Author::new("Foo Bar", "foo@bar.com"))
        .add_simple_change_with_message(1, "second commit")
        .set_author(Author::new("Foo Baz", "foo@baz.com"))
        .add_simple_change_with_message(2, "third commit");
    origin
}
