//! Resolve `folder:` backend entries of a configuration file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ferry_core::config::BackendConfig;
use ferry_core::ValidationError;
use ferry_workflow::{BackendFactory, Destination, Origin};

use crate::destination::FolderDestination;
use crate::origin::FolderOrigin;

/// Relative backend paths are resolved against `base`, normally the
/// directory holding the configuration file.
#[derive(Debug, Clone)]
pub struct FolderBackends {
    base: PathBuf,
}

impl FolderBackends {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

impl BackendFactory for FolderBackends {
    fn origin(&self, config: &BackendConfig) -> Result<Arc<dyn Origin>, ValidationError> {
        match config {
            BackendConfig::Folder { path, confirm } => {
                if *confirm {
                    tracing::warn!("'confirm' has no effect on an origin folder");
                }
                Ok(Arc::new(FolderOrigin::new(self.resolve(path))))
            }
        }
    }

    fn destination(&self, config: &BackendConfig) -> Result<Arc<dyn Destination>, ValidationError> {
        match config {
            BackendConfig::Folder { path, confirm } => Ok(Arc::new(
                FolderDestination::new(self.resolve(path)).with_confirm(*confirm),
            )),
        }
    }
}
