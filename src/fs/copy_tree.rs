//! Recursive, glob-filtered directory copy.
//!
//! Used to move a finished report out of the workspace and into job storage.
//! Only regular files are copied; directories are created as needed and
//! existing files in the destination are overwritten.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;
use walkdir::WalkDir;

/// Compile include patterns into a matcher over `/`-separated relative paths.
pub fn build_includes(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized = pattern.trim().replace('\\', "/");
        if normalized.is_empty() {
            continue;
        }
        builder.add(Glob::new(&normalized)?);
    }

    builder.build()
}

/// Error from [`copy_tree`], carrying the path that failed.
#[derive(Debug, Error)]
#[error("'{}': {}", .path.display(), .source)]
pub struct CopyError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Copy every file under `source` whose relative path matches `includes`
/// into `target`, preserving layout. Returns the number of files copied.
///
/// A missing `source` copies nothing.
pub fn copy_tree(source: &Path, target: &Path, includes: &GlobSet) -> Result<usize, CopyError> {
    if !source.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| CopyError {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected")),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if !includes.is_match(relative_glob_path(relative)) {
            continue;
        }

        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| CopyError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::copy(entry.path(), &destination).map_err(|e| CopyError {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        trace!(file = %relative.display(), "archived");
        copied += 1;
    }

    Ok(copied)
}

fn relative_glob_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
