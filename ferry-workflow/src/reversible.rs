//! Content-level reversibility check for CHANGE_REQUEST runs.
//!
//! A pipeline whose steps all have inverses can still lose information (a
//! replacement whose output already existed in the input, for instance). The
//! check replays the reverse pipeline on a copy of the transformed tree and
//! compares the result with the tree the forward pipeline started from.

use std::collections::BTreeSet;
use std::path::Path;

use similar::TextDiff;

use ferry_core::tree::{self, FileTree};
use ferry_core::ValidationError;
use ferry_transform::{MigrationContext, Transformation};

use crate::error::WorkflowError;

/// Fail with [`ValidationError::NotReversible`] unless `reverse` turns the
/// transformed checkout in `ctx` back into `original`.
pub fn verify(
    workflow: &str,
    reverse: &dyn Transformation,
    ctx: &MigrationContext<'_>,
    original: &FileTree,
    scratch: &Path,
) -> Result<(), WorkflowError> {
    let transformed = tree::read_tree(ctx.checkout())?;
    tree::reset_dir(scratch)?;
    tree::write_tree(scratch, &transformed)?;

    let mut reverse_ctx = ctx.for_checkout(scratch).with_ignore_noop(true);
    if let Err(e) = reverse.transform(&mut reverse_ctx) {
        ctx.console()
            .error(&format!("Reverse transformation failed: {e}"));
        return Err(not_reversible(workflow));
    }

    let restored = tree::read_tree(scratch)?;
    if &restored == original {
        tracing::debug!("reverse pipeline restored {} file(s)", original.len());
        return Ok(());
    }
    ctx.console().error(&format!(
        "Non reversible transformations:\n{}",
        render_diff(original, &restored)
    ));
    Err(not_reversible(workflow))
}

fn not_reversible(workflow: &str) -> WorkflowError {
    ValidationError::NotReversible {
        workflow: workflow.to_string(),
    }
    .into()
}

/// Unified diff of every path whose content differs, `a/` being the original.
pub fn render_diff(original: &FileTree, restored: &FileTree) -> String {
    let paths: BTreeSet<_> = original.keys().chain(restored.keys()).collect();
    let mut out = String::new();
    for path in paths {
        let before = original.get(path).map(|b| String::from_utf8_lossy(b)).unwrap_or_default();
        let after = restored.get(path).map(|b| String::from_utf8_lossy(b)).unwrap_or_default();
        let presence = (original.contains_key(path), restored.contains_key(path));
        if before == after {
            match presence {
                (true, false) => out.push_str(&format!("deleted: {}\n", path.display())),
                (false, true) => out.push_str(&format!("added: {}\n", path.display())),
                _ => {}
            }
            continue;
        }
        let old_header = format!("a/{}", path.display());
        let new_header = format!("b/{}", path.display());
        out.push_str(
            &TextDiff::from_lines(&*before, &*after)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string(),
        );
    }
    out
}
