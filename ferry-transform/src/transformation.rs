//! The [`Transformation`] trait and leaf flattening.

use std::fmt;
use std::sync::Arc;

use crate::context::MigrationContext;
use crate::error::TransformError;

/// One step of a migration pipeline.
///
/// Implementations hold no shared mutable state; the same instance may be
/// applied to many units.
pub trait Transformation: fmt::Debug + Send + Sync {
    /// Apply the step to the checkout and metadata in `ctx`.
    fn transform(&self, ctx: &mut MigrationContext<'_>) -> Result<(), TransformError>;

    /// Build the inverse step, or fail with [`TransformError::NotReversible`].
    fn reverse(&self) -> Result<Arc<dyn Transformation>, TransformError>;

    /// Human-readable summary used in progress lines.
    fn describe(&self) -> String;

    /// Composite steps expose their children so progress can be numbered
    /// over leaves.
    fn children(&self) -> Option<&[Arc<dyn Transformation>]> {
        None
    }
}

/// Depth-first list of the leaf steps under `steps`, in application order.
pub fn flatten(steps: &[Arc<dyn Transformation>]) -> Vec<Arc<dyn Transformation>> {
    let mut leaves = Vec::new();
    collect_leaves(steps, &mut leaves);
    leaves
}

fn collect_leaves(steps: &[Arc<dyn Transformation>], out: &mut Vec<Arc<dyn Transformation>>) {
    for step in steps {
        match step.children() {
            Some(children) => collect_leaves(children, out),
            None => out.push(Arc::clone(step)),
        }
    }
}

/// A step that declines reversal, naming itself in the error.
pub(crate) fn not_reversible(step: &dyn Transformation) -> TransformError {
    TransformError::NotReversible {
        transform: step.describe(),
    }
}
