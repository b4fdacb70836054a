pub mod run;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ferry_core::config::{self, ConfigFile};

/// Load `path` and return it with the directory relative backend paths
/// are resolved against.
pub(crate) fn load_config(path: &Path) -> Result<(ConfigFile, PathBuf)> {
    let config = config::load_at(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    let base = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((config, base))
}
