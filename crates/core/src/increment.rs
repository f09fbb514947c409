// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremented file naming for saves and backups.
//!
//! Increments are suffixed just before the extension, separated by a dot:
//! `scene.0012.ma`. An existing increment of the configured width is
//! replaced rather than stacked.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default zero-padding width of increments.
pub const DEFAULT_ZFILL: usize = 4;

/// Default marker inserted in backup file names.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".refrepathbackup";

#[derive(Debug, Error)]
pub enum IncrementError {
    #[error("{} has no file name", path.display())]
    NoFileName { path: PathBuf },

    #[error("failed to reserve {}: {source}", path.display())]
    Reserve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no free increment left for {}", path.display())]
    Exhausted { path: PathBuf },
}

/// Return the first incremented variant of `current_path` not present on disk.
///
/// Always increments at least once, even if `current_path` itself is free.
/// This only checks existence; use [`reserve_increment_path`] when another
/// process may race for the same name.
///
/// ```
/// # use refrepath_core::increment_path;
/// # use std::path::Path;
/// let next = increment_path(Path::new("/nonexistent/demo/file.0007.abc"), 4).unwrap();
/// assert_eq!(next, Path::new("/nonexistent/demo/file.0001.abc"));
/// ```
pub fn increment_path(current_path: &Path, zfill: usize) -> Result<PathBuf, IncrementError> {
    let naming = IncrementNaming::parse(current_path, zfill)?;
    (1..=u32::MAX)
        .map(|n| naming.candidate(n))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| IncrementError::Exhausted { path: current_path.to_path_buf() })
}

/// Like [`increment_path`], but claims the returned path by creating it
/// exclusively, so concurrent callers never receive the same path.
///
/// The returned file exists and is empty.
pub fn reserve_increment_path(
    current_path: &Path,
    zfill: usize,
) -> Result<PathBuf, IncrementError> {
    let naming = IncrementNaming::parse(current_path, zfill)?;
    for n in 1..=u32::MAX {
        let candidate = naming.candidate(n);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(IncrementError::Reserve { path: candidate, source }),
        }
    }
    Err(IncrementError::Exhausted { path: current_path.to_path_buf() })
}

/// Base path for backups of `document`: `<stem><suffix><ext>`.
///
/// Pass the result to one of the increment functions to get a free slot.
pub fn backup_base(document: &Path, suffix: &str) -> Result<PathBuf, IncrementError> {
    let stem = document
        .file_stem()
        .ok_or_else(|| IncrementError::NoFileName { path: document.to_path_buf() })?
        .to_string_lossy();
    let ext = extension_with_dot(document);
    Ok(document.with_file_name(format!("{stem}{suffix}{ext}")))
}

struct IncrementNaming<'a> {
    path: &'a Path,
    stem: String,
    ext: String,
    zfill: usize,
}

impl<'a> IncrementNaming<'a> {
    fn parse(path: &'a Path, zfill: usize) -> Result<Self, IncrementError> {
        let stem = path
            .file_stem()
            .ok_or_else(|| IncrementError::NoFileName { path: path.to_path_buf() })?
            .to_string_lossy();
        let stem = strip_increment(&stem, zfill).to_string();
        Ok(Self { path, stem, ext: extension_with_dot(path), zfill })
    }

    fn candidate(&self, n: u32) -> PathBuf {
        let name = format!("{}.{:0width$}{}", self.stem, n, self.ext, width = self.zfill);
        self.path.with_file_name(name)
    }
}

/// Remove a trailing `.<zfill digits>` from a file stem.
fn strip_increment(stem: &str, zfill: usize) -> &str {
    match stem.rsplit_once('.') {
        Some((head, tail))
            if zfill > 0 && tail.len() == zfill && tail.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => stem,
    }
}

fn extension_with_dot(path: &Path) -> String {
    path.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default()
}

#[cfg(test)]
#[path = "increment_tests.rs"]
mod tests;
