//! YAML workflow configuration.
//!
//! # File layout
//!
//! ```yaml
//! workflows:
//!   - name: default
//!     mode: ITERATIVE
//!     origin: { folder: { path: ./upstream } }
//!     destination: { folder: { path: ./mirror } }
//!     authoring:
//!       overwrite: { default: "Ferry <no-reply@ferry.dev>" }
//!     origin_files: { include: ["**"], exclude: ["internal/**"] }
//!     transformations:
//!       - replace: { before: "acme", after: "example" }
//!       - move: { before: docs, after: documentation }
//! ```
//!
//! Mandatory workflow fields are `Option`s here so that their absence is
//! reported as a [`ValidationError::MissingField`] when the workflow is
//! built, rather than as an opaque YAML error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::authoring::Authoring;
use crate::error::ValidationError;
use crate::glob::Glob;
use crate::types::WorkflowMode;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Root of a ferry configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub workflows: Vec<WorkflowConfig>,
}

/// Declarative description of one workflow, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_workflow_name")]
    pub name: String,
    #[serde(default)]
    pub mode: WorkflowMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<BackendConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<BackendConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authoring: Option<Authoring>,
    #[serde(default)]
    pub transformations: Vec<TransformConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_files: Option<GlobConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_files: Option<GlobConfig>,
    /// Deprecated: use `origin_files` excludes instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_in_origin: Option<GlobConfig>,
    /// Deprecated: use `destination_files` excludes instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_in_destination: Option<GlobConfig>,
    #[serde(default)]
    pub include_changelist_notes: bool,
}

pub fn default_workflow_name() -> String {
    "default".to_string()
}

/// Uncompiled include/exclude pattern lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobConfig {
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl GlobConfig {
    pub fn compile(&self) -> Result<Glob, ValidationError> {
        Glob::new(self.include.clone(), self.exclude.clone())
    }
}

/// Where an origin or destination lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendConfig {
    /// A local directory (see the `ferry-folder` crate).
    Folder {
        path: PathBuf,
        /// Destination only: ask for confirmation after every write.
        #[serde(default)]
        confirm: bool,
    },
}

/// One step of the transformation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformConfig {
    /// Regex-backed text replacement with `${group}` placeholders.
    Replace {
        before: String,
        after: String,
        #[serde(default)]
        regex_groups: BTreeMap<String, String>,
        #[serde(default)]
        multiline: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        paths: Option<GlobConfig>,
    },
    /// Rename a file or directory inside the checkout.
    Move { before: String, after: String },
    /// Nested pipeline, optionally with an explicit reversal.
    Sequence {
        steps: Vec<TransformConfig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reversal: Option<Vec<TransformConfig>>,
    },
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Parse configuration text. `path` is only used for error context.
pub fn parse(path: &Path, contents: &str) -> Result<ConfigFile, ValidationError> {
    let config: ConfigFile =
        serde_yaml::from_str(contents).map_err(|e| ValidationError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a configuration file.
///
/// Returns `ValidationError::ConfigNotFound` if absent,
/// `ValidationError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<ConfigFile, ValidationError> {
    if !path.exists() {
        return Err(ValidationError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ValidationError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("loaded configuration from {}", path.display());
    parse(path, &contents)
}

impl ConfigFile {
    /// Workflow names must be unique within a file.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = BTreeSet::new();
        for workflow in &self.workflows {
            if !seen.insert(workflow.name.as_str()) {
                return Err(ValidationError::Invalid(format!(
                    "duplicate workflow name '{}'",
                    workflow.name
                )));
            }
        }
        Ok(())
    }

    pub fn workflow(&self, name: &str) -> Result<&WorkflowConfig, ValidationError> {
        self.workflows
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| {
                let known: Vec<&str> = self.workflows.iter().map(|w| w.name.as_str()).collect();
                ValidationError::Invalid(format!(
                    "no workflow named '{name}' (known: {})",
                    known.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
