//! `ferry run` — migrate one workflow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ferry_folder::FolderBackends;
use ferry_workflow::{RunOptions, WorkflowBuilder};

use crate::commands::load_config;
use crate::console::TerminalConsole;

/// Arguments for `ferry run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML configuration file.
    pub config: PathBuf,

    /// Workflow to run.
    #[arg(default_value = "default")]
    pub workflow: String,

    /// Origin revision to migrate; defaults to the origin head.
    #[arg(long = "ref")]
    pub source_ref: Option<String>,

    /// Scratch directory for the checkout; a temporary one when omitted.
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Last migrated origin revision, overriding the destination's record.
    #[arg(long)]
    pub last_rev: Option<String>,

    /// Destination revision a change request is based on.
    #[arg(long)]
    pub change_baseline: Option<String>,

    /// Warn instead of failing when a transformation changes nothing.
    #[arg(long)]
    pub ignore_noop: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let (config, base) = load_config(&self.config)?;
        let entry = config.workflow(&self.workflow)?;
        let workflow = WorkflowBuilder::from_config(entry, &FolderBackends::new(base))
            .and_then(|builder| builder.build())
            .with_context(|| format!("invalid workflow '{}'", self.workflow))?;
        tracing::debug!("{workflow}");

        // Keeps the temporary workdir alive until the run ends.
        let scratch;
        let workdir = match self.workdir {
            Some(dir) => dir,
            None => {
                scratch = tempfile::Builder::new()
                    .prefix("ferry-")
                    .tempdir()
                    .context("could not create a temporary workdir")?;
                scratch.path().to_path_buf()
            }
        };

        let options = RunOptions {
            last_revision: self.last_rev,
            change_baseline: self.change_baseline,
            ignore_noop: self.ignore_noop,
        };
        workflow
            .run(&workdir, self.source_ref.as_deref(), &options, &TerminalConsole)
            .with_context(|| format!("workflow '{}' failed", self.workflow))?;

        println!(
            "{} '{}' migrated ({} mode)",
            "✓".green(),
            workflow.name(),
            workflow.mode()
        );
        Ok(())
    }
}
