//! Closure-backed transformations for message and author rewriting in code.

use std::fmt;
use std::sync::Arc;

use crate::context::MigrationContext;
use crate::error::TransformError;
use crate::transformation::{not_reversible, Transformation};

type StepFn = dyn Fn(&mut MigrationContext<'_>) -> Result<(), TransformError> + Send + Sync;

/// A named closure.
///
/// Built with [`FnTransform::new`] it is never reversible. Built with
/// [`FnTransform::metadata`] it promises not to touch the checkout, so its
/// reverse leaves files alone.
#[derive(Clone)]
pub struct FnTransform {
    name: String,
    func: Arc<StepFn>,
    metadata_only: bool,
}

impl FnTransform {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut MigrationContext<'_>) -> Result<(), TransformError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
            metadata_only: false,
        }
    }

    /// A closure that only rewrites message or author.
    pub fn metadata<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut MigrationContext<'_>) -> Result<(), TransformError> + Send + Sync + 'static,
    {
        Self {
            metadata_only: true,
            ..Self::new(name, func)
        }
    }
}

impl fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .field("metadata_only", &self.metadata_only)
            .finish()
    }
}

impl Transformation for FnTransform {
    fn transform(&self, ctx: &mut MigrationContext<'_>) -> Result<(), TransformError> {
        (self.func)(ctx)
    }

    fn reverse(&self) -> Result<Arc<dyn Transformation>, TransformError> {
        if !self.metadata_only {
            return Err(not_reversible(self));
        }
        Ok(Arc::new(FnTransform::metadata(
            format!("Reverting {}", self.name),
            |_| Ok(()),
        )))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
