//! Ferry core library — domain types, authoring, globs, console, config, errors.
//!
//! Public API surface:
//! - [`types`] — [`Change`], [`Author`], [`Reference`], [`WorkflowMode`]
//! - [`authoring`] — [`Authoring`] policy
//! - [`glob`] — [`Glob`] / [`PathMatcher`]
//! - [`console`] — operator messages and yes/no prompts
//! - [`config`] — YAML workflow configuration
//! - [`tree`] — checkout directory helpers
//! - [`error`] — [`ValidationError`], [`RepositoryError`]

pub mod authoring;
pub mod config;
pub mod console;
pub mod error;
pub mod glob;
pub mod tree;
pub mod types;

pub use authoring::Authoring;
pub use console::{Console, LogConsole, Message, MessageKind, RecordingConsole};
pub use error::{RepositoryError, TreeError, ValidationError};
pub use glob::{Glob, PathMatcher};
pub use types::{Author, Change, Reference, WorkflowMode};
