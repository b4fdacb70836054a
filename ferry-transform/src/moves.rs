//! Rename a file or directory inside the checkout.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ferry_core::ValidationError;

use crate::context::MigrationContext;
use crate::error::{io_err, TransformError};
use crate::transformation::Transformation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    before: PathBuf,
    after: PathBuf,
}

impl Move {
    /// Both paths are relative to the checkout root and may not escape it.
    pub fn new(before: impl Into<PathBuf>, after: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        let before = before.into();
        let after = after.into();
        check_relative(&before)?;
        check_relative(&after)?;
        if before == after {
            return Err(ValidationError::Invalid(format!(
                "Moving '{}' onto itself",
                before.display()
            )));
        }
        Ok(Self { before, after })
    }

    pub fn before(&self) -> &Path {
        &self.before
    }

    pub fn after(&self) -> &Path {
        &self.after
    }
}

fn check_relative(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::Invalid("move paths cannot be empty".to_string()));
    }
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(ValidationError::UnexpectedPathComponents {
            pattern: path.display().to_string(),
        });
    }
    Ok(())
}

impl Transformation for Move {
    fn transform(&self, ctx: &mut MigrationContext<'_>) -> Result<(), TransformError> {
        let src = ctx.checkout().join(&self.before);
        let dst = ctx.checkout().join(&self.after);
        if !src.exists() {
            return ctx.report_noop(
                &self.describe(),
                &format!("'{}' does not exist", self.before.display()),
            );
        }
        if dst.exists() {
            return Err(TransformError::MoveCollision {
                before: self.before.clone(),
                after: self.after.clone(),
            });
        }
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::rename(&src, &dst).map_err(|e| io_err(&src, e))?;
        tracing::debug!("moved {} to {}", self.before.display(), self.after.display());
        Ok(())
    }

    fn reverse(&self) -> Result<Arc<dyn Transformation>, TransformError> {
        Ok(Arc::new(Move {
            before: self.after.clone(),
            after: self.before.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!("Moving {}", self.before.display())
    }
}
