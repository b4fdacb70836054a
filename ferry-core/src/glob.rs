//! Path inclusion rules compiled from include/exclude patterns.
//!
//! `**` matches any number of path segments, `*` matches within one segment.
//! A path matches a [`Glob`] iff it matches at least one include pattern and
//! no exclude pattern. Matching is per file: excluding `folder/**` removes the
//! files below `folder` but never the directory entry itself.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::ValidationError;

/// A compiled include/exclude rule over relative paths.
#[derive(Debug, Clone)]
pub struct Glob {
    include: Vec<String>,
    exclude: Vec<String>,
    include_set: GlobSet,
    exclude_set: GlobSet,
    match_all: bool,
}

impl Glob {
    /// Compile a glob. Malformed patterns fail here, never at match time.
    pub fn new<I, S, E, T>(include: I, exclude: E) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        E: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let include: Vec<String> = include.into_iter().map(Into::into).collect();
        let exclude: Vec<String> = exclude.into_iter().map(Into::into).collect();
        let invalid = |source| ValidationError::InvalidGlob {
            include: format_patterns(&include),
            exclude: format_patterns(&exclude),
            source,
        };
        let include_set = build_set(&include).map_err(invalid)?;
        let exclude_set = build_set(&exclude).map_err(invalid)?;
        let match_all = include.iter().any(|p| p == "**");
        Ok(Self {
            include,
            exclude,
            include_set,
            exclude_set,
            match_all,
        })
    }

    /// The glob that matches every path (`**`).
    pub fn all() -> Self {
        Self {
            include: vec!["**".to_string()],
            exclude: Vec::new(),
            include_set: GlobSet::empty(),
            exclude_set: GlobSet::empty(),
            match_all: true,
        }
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Does the relative `path` participate? Pure and total.
    pub fn matches(&self, path: &Path) -> bool {
        (self.match_all || self.include_set.is_match(path)) && !self.exclude_set.is_match(path)
    }

    /// Fold a legacy exclude-only glob into this one: its include patterns
    /// become additional exclude patterns.
    pub fn merge_excludes(&self, legacy: &Glob) -> Result<Glob, ValidationError> {
        let mut exclude = self.exclude.clone();
        for pattern in &legacy.include {
            if !exclude.contains(pattern) {
                exclude.push(pattern.clone());
            }
        }
        Glob::new(self.include.clone(), exclude)
    }

    /// Bind the glob to a concrete checkout root.
    ///
    /// Patterns with `.` or `..` segments could address files outside `root`,
    /// so they are rejected here, against the resolved location.
    pub fn relative_to(&self, root: &Path) -> Result<PathMatcher, ValidationError> {
        for pattern in self.include.iter().chain(self.exclude.iter()) {
            let escapes = Path::new(pattern)
                .components()
                .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
                || pattern.split('/').any(|s| s == "." || s == "..");
            if escapes {
                return Err(ValidationError::UnexpectedPathComponents {
                    pattern: root.join(pattern).display().to_string(),
                });
            }
        }
        Ok(PathMatcher {
            root: root.to_path_buf(),
            glob: self.clone(),
        })
    }
}

impl Default for Glob {
    fn default() -> Self {
        Glob::all()
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.include == other.include && self.exclude == other.exclude
    }
}

impl Eq for Glob {}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = |ps: &[String]| -> String {
            ps.iter()
                .map(|p| format!("\"{p}\""))
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "glob(include = [{}]", quote(&self.include))?;
        if !self.exclude.is_empty() {
            write!(f, ", exclude = [{}]", quote(&self.exclude))?;
        }
        write!(f, ")")
    }
}

/// A [`Glob`] anchored at a root directory; matches absolute paths under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatcher {
    root: PathBuf,
    glob: Glob,
}

impl PathMatcher {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn glob(&self) -> &Glob {
        &self.glob
    }

    /// Paths outside the root never match.
    pub fn matches(&self, path: &Path) -> bool {
        match path.strip_prefix(&self.root) {
            Ok(relative) => self.glob.matches(relative),
            Err(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    builder.build()
}

fn format_patterns(patterns: &[String]) -> String {
    format!("[{}]", patterns.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
