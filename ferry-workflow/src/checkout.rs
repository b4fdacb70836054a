//! Materialize a change into the shared checkout directory.

use std::path::Path;

use ferry_core::tree::{self, FileTree};
use ferry_core::{Console, PathMatcher};

use crate::error::{io_err, WorkflowError};

/// Empty `dir`, write `files` into it, then drop every file the origin
/// matcher rejects. Directories are left in place.
pub fn prepare(
    dir: &Path,
    files: &FileTree,
    origin_files: &PathMatcher,
    console: &dyn Console,
) -> Result<(), WorkflowError> {
    tree::reset_dir(dir)?;
    tree::write_tree(dir, files)?;

    let mut removed = 0usize;
    for rel in tree::list_files(dir)? {
        let path = dir.join(&rel);
        if !origin_files.matches(&path) {
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
            removed += 1;
        }
    }
    if removed > 0 {
        console.info(&format!(
            "Removed {removed} files from workdir that do not match origin_files"
        ));
    }
    tracing::debug!("checked out {} file(s) into {}", files.len(), dir.display());
    Ok(())
}
