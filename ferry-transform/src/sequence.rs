//! Structural composition of transformations.

use std::sync::Arc;

use crate::context::MigrationContext;
use crate::error::TransformError;
use crate::transformation::{flatten, Transformation};

/// Ordered list of child steps, applied first to last.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    steps: Vec<Arc<dyn Transformation>>,
    reversal: Option<Vec<Arc<dyn Transformation>>>,
}

impl Sequence {
    pub fn new(steps: Vec<Arc<dyn Transformation>>) -> Self {
        Self {
            steps,
            reversal: None,
        }
    }

    /// A sequence whose reverse is `reversal` rather than the derived inverse.
    pub fn with_reversal(
        steps: Vec<Arc<dyn Transformation>>,
        reversal: Vec<Arc<dyn Transformation>>,
    ) -> Self {
        Self {
            steps,
            reversal: Some(reversal),
        }
    }

    pub fn steps(&self) -> &[Arc<dyn Transformation>] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformation for Sequence {
    fn transform(&self, ctx: &mut MigrationContext<'_>) -> Result<(), TransformError> {
        let leaves = flatten(&self.steps);
        let total = leaves.len();
        for (i, leaf) in leaves.iter().enumerate() {
            ctx.console()
                .progress(&format!("[{:2}/{}] Transform {}", i + 1, total, leaf.describe()));
            leaf.transform(ctx)?;
        }
        Ok(())
    }

    fn reverse(&self) -> Result<Arc<dyn Transformation>, TransformError> {
        if let Some(reversal) = &self.reversal {
            return Ok(Arc::new(Sequence::with_reversal(
                reversal.clone(),
                self.steps.clone(),
            )));
        }
        let reversed = self
            .steps
            .iter()
            .rev()
            .map(|step| step.reverse())
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("reversed sequence of {} step(s)", reversed.len());
        Ok(Arc::new(Sequence::new(reversed)))
    }

    fn describe(&self) -> String {
        format!("sequence of {} step(s)", self.steps.len())
    }

    fn children(&self) -> Option<&[Arc<dyn Transformation>]> {
        Some(&self.steps)
    }
}
