//! SQUASH, ITERATIVE and CHANGE_REQUEST execution.

use ferry_core::tree::{self, FileTree};
use ferry_core::{Author, Change, ValidationError};
use ferry_transform::{Changes, MigrationContext, Transformation};

use crate::baseline;
use crate::checkout;
use crate::confirm::ConfirmationController;
use crate::destination::WriteUnit;
use crate::error::WorkflowError;
use crate::reversible;
use crate::walker;
use crate::workflow::Run;

// ---------------------------------------------------------------------------
// Shared unit processing
// ---------------------------------------------------------------------------

impl<'a> Run<'a> {
    /// Check out `change`, then run the pipeline over it.
    ///
    /// The returned context still points at the checkout so callers can read
    /// the transformed tree and final metadata.
    fn transform_unit(
        &self,
        change: &Change,
        message: String,
        author: Author,
        changes: Changes,
    ) -> Result<MigrationContext<'a>, WorkflowError> {
        checkout::prepare(&self.checkout, &change.files, &self.origin_files, self.console)?;
        let mut ctx = MigrationContext::new(&self.checkout, message, author, changes, self.console)
            .with_ignore_noop(self.options.ignore_noop);
        self.workflow.transformation().transform(&mut ctx)?;
        Ok(ctx)
    }

    fn unit(
        &self,
        ctx: MigrationContext<'_>,
        files: FileTree,
        change: &Change,
        baseline: Option<String>,
    ) -> WriteUnit {
        let (message, author) = ctx.into_metadata();
        WriteUnit {
            files,
            message,
            author,
            timestamp: change.timestamp,
            origin_ref: change.reference.clone(),
            origin_label: self.workflow.origin().label_name(),
            baseline,
            destination_files: self.destination_files.clone(),
        }
    }
}

/// `CHANGE: <summary> (<ref>) by <author name>` per change, newest first.
///
/// Only the first line of each change message is kept; bodies are dropped.
pub fn release_notes(changes: &[Change]) -> String {
    changes
        .iter()
        .rev()
        .map(|c| format!("CHANGE: {} ({}) by {}\n", c.summary(), c.reference, c.author.name))
        .collect()
}

// ---------------------------------------------------------------------------
// SQUASH
// ---------------------------------------------------------------------------

pub(crate) fn squash(run: &Run<'_>, target: &Change) -> Result<(), WorkflowError> {
    let workflow = run.workflow;
    let mut changes = walker::walk(
        workflow.origin(),
        workflow.destination(),
        run.options.last_revision.as_deref(),
        &target.reference,
        false,
    )?;
    if changes.is_empty() {
        changes.push(target.clone());
    }

    let message = if workflow.include_changelist_notes() {
        release_notes(&changes)
    } else {
        target.message.clone()
    };
    let author = workflow.authoring().resolve(&target.author);
    run.console.progress(&format!(
        "Squashing {} change(s) up to {}",
        changes.len(),
        target.reference
    ));

    let ctx = run.transform_unit(target, message, author, Changes::new(changes, Vec::new()))?;
    let files = tree::read_tree(&run.checkout)?;
    let unit = run.unit(ctx, files, target, None);
    let result = workflow.destination().write(&unit)?;

    ConfirmationController::new(1).single(&target.reference, result, run.console)
}

// ---------------------------------------------------------------------------
// ITERATIVE
// ---------------------------------------------------------------------------

pub(crate) fn iterative(run: &Run<'_>, target: &Change) -> Result<(), WorkflowError> {
    let workflow = run.workflow;
    let changes = walker::walk(
        workflow.origin(),
        workflow.destination(),
        run.options.last_revision.as_deref(),
        &target.reference,
        true,
    )?;
    let total = changes.len();
    let mut controller = ConfirmationController::new(total);
    let mut migrated: Vec<Change> = Vec::new();
    let mut last_digest: Option<String> = None;

    for (index, change) in changes.iter().enumerate() {
        let position = index + 1;
        run.console.progress(&format!(
            "Migrating change {position} of {total} ({})",
            change.reference
        ));
        let author = workflow.authoring().resolve(&change.author);
        let ctx = run.transform_unit(
            change,
            change.message.clone(),
            author,
            Changes::new(vec![change.clone()], migrated.clone()),
        )?;
        let files = tree::read_tree(&run.checkout)?;
        let digest = tree::digest(&files);

        let noop = run.options.ignore_noop && last_digest.as_deref() == Some(digest.as_str());
        if noop {
            run.console.info(&format!(
                "Skipping change {} because it produces no changes in the destination",
                change.reference
            ));
        } else {
            let unit = run.unit(ctx, files, change, None);
            match workflow.destination().write(&unit) {
                Ok(result) => controller.after_write(position, &change.reference, result, run.console)?,
                Err(WorkflowError::EmptyChange { reference }) => run.console.warn(&format!(
                    "Migration of origin revision '{reference}' resulted in an empty change in the destination"
                )),
                Err(e) => return Err(e),
            }
        }

        last_digest = Some(digest);
        migrated.push(change.clone());
    }

    controller.finish();
    tracing::info!("migrated {} change(s) iteratively", migrated.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// CHANGE_REQUEST
// ---------------------------------------------------------------------------

pub(crate) fn change_request(run: &Run<'_>, target: &Change) -> Result<(), WorkflowError> {
    let workflow = run.workflow;
    run.console
        .progress("Checking that the transformations can be reverted");
    let reverse = workflow.transformation().reverse().map_err(|e| {
        tracing::debug!("reverse pipeline unavailable: {e}");
        ValidationError::NotReversible {
            workflow: workflow.name().to_string(),
        }
    })?;

    let mut history = workflow.origin().changes(None, &target.reference)?;
    history.reverse();
    let baseline = baseline::resolve(
        &history,
        run.options.change_baseline.as_deref(),
        &workflow.destination().label_name_when_origin(),
    );
    match &baseline {
        Some(b) => tracing::debug!("change request baseline: {b}"),
        None => tracing::debug!("change request has no baseline"),
    }

    let author = workflow.authoring().resolve(&target.author);
    let original: FileTree = target
        .files
        .iter()
        .filter(|(path, _)| run.origin_files.matches(&run.checkout.join(path)))
        .map(|(path, bytes)| (path.clone(), bytes.clone()))
        .collect();
    let ctx = run.transform_unit(
        target,
        target.message.clone(),
        author,
        Changes::new(vec![target.clone()], Vec::new()),
    )?;
    reversible::verify(workflow.name(), reverse.as_ref(), &ctx, &original, &run.scratch)?;

    let files = tree::read_tree(&run.checkout)?;
    let unit = run.unit(ctx, files, target, baseline);
    let result = workflow.destination().write(&unit)?;

    ConfirmationController::new(1).single(&target.reference, result, run.console)
}
