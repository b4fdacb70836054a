//! Checkout directory helpers: list, read, write, and hash file trees.
//!
//! A tree is a `BTreeMap` from relative path to bytes, so iteration order and
//! digests are deterministic.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{tree_err, TreeError};

/// In-memory file tree keyed by relative path.
pub type FileTree = BTreeMap<PathBuf, Vec<u8>>;

/// Every regular file under `root`, as sorted relative paths.
///
/// A missing `root` yields an empty list. Symlinks are not followed and are
/// left out with a warning.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, TreeError> {
    let mut out = Vec::new();
    if !root.exists() {
        return Ok(out);
    }
    collect_files(root, root, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), TreeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| tree_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| tree_err(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| tree_err(&path, e))?;
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let rel = path.strip_prefix(root).unwrap_or(path.as_path());
            out.push(rel.to_path_buf());
        } else if file_type.is_symlink() {
            tracing::warn!("skipping symlink {}", path.display());
        }
    }
    Ok(())
}

/// Read every file under `root` into memory.
pub fn read_tree(root: &Path) -> Result<FileTree, TreeError> {
    let mut tree = FileTree::new();
    for rel in list_files(root)? {
        let path = root.join(&rel);
        let bytes = std::fs::read(&path).map_err(|e| tree_err(&path, e))?;
        tree.insert(rel, bytes);
    }
    Ok(tree)
}

/// Materialize `files` under `root`, creating parent directories.
///
/// Keys must be plain relative paths; `..`, `.` or absolute keys are refused.
pub fn write_tree(root: &Path, files: &FileTree) -> Result<(), TreeError> {
    for (rel, bytes) in files {
        if !is_plain_relative(rel) {
            return Err(tree_err(
                rel,
                std::io::Error::new(ErrorKind::InvalidInput, "path escapes the tree root"),
            ));
        }
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| tree_err(parent, e))?;
        }
        std::fs::write(&path, bytes).map_err(|e| tree_err(&path, e))?;
    }
    Ok(())
}

/// Remove `dir` and everything under it, then recreate it empty.
pub fn reset_dir(dir: &Path) -> Result<(), TreeError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(tree_err(dir, e)),
    }
    std::fs::create_dir_all(dir).map_err(|e| tree_err(dir, e))
}

/// SHA-256 over every (path, content) pair, hex encoded.
pub fn digest(files: &FileTree) -> String {
    let mut h = Sha256::new();
    for (path, bytes) in files {
        let key = path.to_string_lossy();
        h.update((key.len() as u64).to_le_bytes());
        h.update(key.as_bytes());
        h.update((bytes.len() as u64).to_le_bytes());
        h.update(bytes);
    }
    hex::encode(h.finalize())
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
        && path.components().next().is_some()
}
