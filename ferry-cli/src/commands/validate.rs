//! `ferry validate` — build every workflow without touching any repository.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use ferry_core::WorkflowMode;
use ferry_folder::FolderBackends;
use ferry_workflow::{Workflow, WorkflowBuilder};

use crate::commands::load_config;

/// Arguments for `ferry validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file.
    pub config: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct WorkflowSummary {
    name: String,
    mode: WorkflowMode,
    steps: usize,
    origin_files: String,
    destination_files: String,
}

impl From<&Workflow> for WorkflowSummary {
    fn from(workflow: &Workflow) -> Self {
        Self {
            name: workflow.name().to_string(),
            mode: workflow.mode(),
            steps: workflow.transformation().steps().len(),
            origin_files: workflow.origin_files().to_string(),
            destination_files: workflow.destination_files().to_string(),
        }
    }
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let (config, base) = load_config(&self.config)?;
        let backends = FolderBackends::new(base);

        let mut valid = Vec::new();
        let mut failures = 0usize;
        for entry in &config.workflows {
            match WorkflowBuilder::from_config(entry, &backends).and_then(|b| b.build()) {
                Ok(workflow) => valid.push(workflow),
                Err(e) => {
                    failures += 1;
                    eprintln!("{} '{}': {e}", "✗".red(), entry.name);
                }
            }
        }

        if self.json {
            let summaries: Vec<WorkflowSummary> = valid.iter().map(WorkflowSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for workflow in &valid {
                println!("{} {workflow}", "✓".green());
            }
        }

        if failures > 0 {
            bail!("{failures} workflow(s) failed validation");
        }
        if valid.is_empty() {
            println!("No workflows defined in {}", self.config.display());
        }
        Ok(())
    }
}
