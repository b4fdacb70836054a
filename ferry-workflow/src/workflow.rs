//! Workflow descriptor, builder, and the run entry point.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ferry_core::config::{BackendConfig, GlobConfig, WorkflowConfig};
use ferry_core::{Authoring, Console, Glob, PathMatcher, ValidationError, WorkflowMode};
use ferry_transform::{build, Sequence, Transformation};

use crate::destination::Destination;
use crate::error::WorkflowError;
use crate::mode;
use crate::origin::Origin;

/// Directory under the workdir that holds the materialized checkout.
pub const CHECKOUT_DIR: &str = "checkout";
/// Scratch directory for the CHANGE_REQUEST reversibility replay.
pub const REVERSE_DIR: &str = "reverse";

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

/// Per-run knobs supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Explicit previous revision (`--last-rev`).
    pub last_revision: Option<String>,
    /// Explicit CHANGE_REQUEST baseline (`--change-baseline`).
    pub change_baseline: Option<String>,
    /// Treat no-op transformations as warnings and skip no-op units.
    pub ignore_noop: bool,
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Turns backend configuration into live origins and destinations.
pub trait BackendFactory {
    fn origin(&self, config: &BackendConfig) -> Result<Arc<dyn Origin>, ValidationError>;
    fn destination(&self, config: &BackendConfig) -> Result<Arc<dyn Destination>, ValidationError>;
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// An immutable, fully resolved migration.
pub struct Workflow {
    name: String,
    mode: WorkflowMode,
    origin: Arc<dyn Origin>,
    destination: Arc<dyn Destination>,
    authoring: Authoring,
    transformation: Sequence,
    origin_files: Glob,
    destination_files: Glob,
    exclude_in_origin: Option<Glob>,
    exclude_in_destination: Option<Glob>,
    include_changelist_notes: bool,
}

impl Workflow {
    pub fn builder(name: impl Into<String>) -> WorkflowBuilder {
        WorkflowBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    pub fn authoring(&self) -> &Authoring {
        &self.authoring
    }

    pub fn transformation(&self) -> &Sequence {
        &self.transformation
    }

    pub fn origin_files(&self) -> &Glob {
        &self.origin_files
    }

    pub fn destination_files(&self) -> &Glob {
        &self.destination_files
    }

    pub fn include_changelist_notes(&self) -> bool {
        self.include_changelist_notes
    }

    pub(crate) fn origin(&self) -> &dyn Origin {
        self.origin.as_ref()
    }

    pub(crate) fn destination(&self) -> &dyn Destination {
        self.destination.as_ref()
    }

    /// Migrate `source_ref` (or the origin head) using `workdir` as scratch.
    ///
    /// Validation failures are reported on `console` at ERROR level before
    /// they are returned.
    pub fn run(
        &self,
        workdir: &Path,
        source_ref: Option<&str>,
        options: &RunOptions,
        console: &dyn Console,
    ) -> Result<(), WorkflowError> {
        tracing::info!("running workflow '{}' in {} mode", self.name, self.mode);
        let result = self.run_mode(workdir, source_ref, options, console);
        if let Err(WorkflowError::Validation(e)) = &result {
            console.error(&e.to_string());
        }
        result
    }

    fn run_mode(
        &self,
        workdir: &Path,
        source_ref: Option<&str>,
        options: &RunOptions,
        console: &dyn Console,
    ) -> Result<(), WorkflowError> {
        let run = self.prepare(workdir, options, console)?;
        let target = self.origin.resolve(source_ref)?;
        tracing::debug!("resolved {} to {}", source_ref.unwrap_or("<head>"), target.reference);
        match self.mode {
            WorkflowMode::Squash => mode::squash(&run, &target),
            WorkflowMode::Iterative => mode::iterative(&run, &target),
            WorkflowMode::ChangeRequest => mode::change_request(&run, &target),
        }
    }

    /// Shared preamble: deprecation warnings, legacy glob merge, root binding.
    fn prepare<'a>(
        &'a self,
        workdir: &Path,
        options: &'a RunOptions,
        console: &'a dyn Console,
    ) -> Result<Run<'a>, WorkflowError> {
        let mut origin_files = self.origin_files.clone();
        if let Some(legacy) = &self.exclude_in_origin {
            console.warn("'exclude_in_origin' arg is deprecated. Use origin_files instead");
            origin_files = origin_files.merge_excludes(legacy)?;
        }
        let mut destination_files = self.destination_files.clone();
        if let Some(legacy) = &self.exclude_in_destination {
            console.warn("'exclude_in_destination' arg is deprecated. Use destination_files instead");
            destination_files = destination_files.merge_excludes(legacy)?;
        }

        let checkout = workdir.join(CHECKOUT_DIR);
        let origin_files = origin_files.relative_to(&checkout)?;
        Ok(Run {
            workflow: self,
            options,
            console,
            checkout,
            scratch: workdir.join(REVERSE_DIR),
            origin_files,
            destination_files,
        })
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("authoring", &self.authoring)
            .field("transformation", &self.transformation)
            .field("origin_files", &self.origin_files)
            .field("destination_files", &self.destination_files)
            .field("include_changelist_notes", &self.include_changelist_notes)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Workflow{{name: {}, mode: {}, origin_files: {}, destination_files: {}, authoring: {}, steps: {}}}",
            self.name,
            self.mode,
            self.origin_files,
            self.destination_files,
            self.authoring,
            self.transformation.steps().len(),
        )
    }
}

/// State shared by every unit of one run.
pub(crate) struct Run<'a> {
    pub(crate) workflow: &'a Workflow,
    pub(crate) options: &'a RunOptions,
    pub(crate) console: &'a dyn Console,
    pub(crate) checkout: PathBuf,
    pub(crate) scratch: PathBuf,
    pub(crate) origin_files: PathMatcher,
    pub(crate) destination_files: Glob,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`Workflow`]; `build` rejects missing mandatory fields.
pub struct WorkflowBuilder {
    name: String,
    mode: WorkflowMode,
    origin: Option<Arc<dyn Origin>>,
    destination: Option<Arc<dyn Destination>>,
    authoring: Option<Authoring>,
    transformations: Vec<Arc<dyn Transformation>>,
    origin_files: Glob,
    destination_files: Glob,
    exclude_in_origin: Option<Glob>,
    exclude_in_destination: Option<Glob>,
    include_changelist_notes: bool,
}

impl WorkflowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: WorkflowMode::default(),
            origin: None,
            destination: None,
            authoring: None,
            transformations: Vec::new(),
            origin_files: Glob::all(),
            destination_files: Glob::all(),
            exclude_in_origin: None,
            exclude_in_destination: None,
            include_changelist_notes: false,
        }
    }

    /// Resolve a parsed configuration entry.
    pub fn from_config(
        config: &WorkflowConfig,
        backends: &dyn BackendFactory,
    ) -> Result<Self, ValidationError> {
        let compile = |glob: &Option<GlobConfig>| glob.as_ref().map(GlobConfig::compile).transpose();

        let mut builder = WorkflowBuilder::new(config.name.clone())
            .mode(config.mode)
            .include_changelist_notes(config.include_changelist_notes);
        if let Some(origin) = &config.origin {
            builder = builder.origin(backends.origin(origin)?);
        }
        if let Some(destination) = &config.destination {
            builder = builder.destination(backends.destination(destination)?);
        }
        if let Some(authoring) = &config.authoring {
            builder = builder.authoring(authoring.clone());
        }
        if let Some(glob) = compile(&config.origin_files)? {
            builder = builder.origin_files(glob);
        }
        if let Some(glob) = compile(&config.destination_files)? {
            builder = builder.destination_files(glob);
        }
        builder.exclude_in_origin = compile(&config.exclude_in_origin)?;
        builder.exclude_in_destination = compile(&config.exclude_in_destination)?;
        builder.transformations = build::pipeline(&config.transformations)?.steps().to_vec();
        Ok(builder)
    }

    pub fn mode(mut self, mode: WorkflowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn origin(mut self, origin: Arc<dyn Origin>) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn destination(mut self, destination: Arc<dyn Destination>) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn authoring(mut self, authoring: Authoring) -> Self {
        self.authoring = Some(authoring);
        self
    }

    pub fn transformation(mut self, step: Arc<dyn Transformation>) -> Self {
        self.transformations.push(step);
        self
    }

    pub fn origin_files(mut self, glob: Glob) -> Self {
        self.origin_files = glob;
        self
    }

    pub fn destination_files(mut self, glob: Glob) -> Self {
        self.destination_files = glob;
        self
    }

    /// Deprecated: prefer excludes on [`Self::origin_files`].
    pub fn exclude_in_origin(mut self, glob: Glob) -> Self {
        self.exclude_in_origin = Some(glob);
        self
    }

    /// Deprecated: prefer excludes on [`Self::destination_files`].
    pub fn exclude_in_destination(mut self, glob: Glob) -> Self {
        self.exclude_in_destination = Some(glob);
        self
    }

    pub fn include_changelist_notes(mut self, include: bool) -> Self {
        self.include_changelist_notes = include;
        self
    }

    pub fn build(self) -> Result<Workflow, ValidationError> {
        let origin = self.origin.ok_or(ValidationError::MissingField { field: "origin" })?;
        let destination = self
            .destination
            .ok_or(ValidationError::MissingField { field: "destination" })?;
        let authoring = self
            .authoring
            .ok_or(ValidationError::MissingField { field: "authoring" })?;
        Ok(Workflow {
            name: self.name,
            mode: self.mode,
            origin,
            destination,
            authoring,
            transformation: Sequence::new(self.transformations),
            origin_files: self.origin_files,
            destination_files: self.destination_files,
            exclude_in_origin: self.exclude_in_origin,
            exclude_in_destination: self.exclude_in_destination,
            include_changelist_notes: self.include_changelist_notes,
        })
    }
}
