// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisting a repathed document.
//!
//! Two modes:
//!
//! - backup: copy the on-disk file to `<stem><suffix>.<n><ext>`, then save
//!   the live document over the original
//! - increment: save the live document as the next `<stem>.<n><ext>`,
//!   leaving the original untouched
//!
//! Target paths are claimed with exclusive creation, so concurrent jobs in
//! the same directory never write the same file.

use std::path::{Path, PathBuf};

use refrepath_adapters::{DocumentHost, HostError};
use refrepath_core::{backup_base, reserve_increment_path, IncrementError};
use thiserror::Error;

/// Errors from saving a document
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no document is open")]
    NoDocument,

    #[error(transparent)]
    Increment(#[from] IncrementError),

    #[error("failed to back up {} to {}: {source}", document.display(), backup.display())]
    Backup {
        document: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Where a document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub saved_to: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Back up the on-disk document, then save the live one in place.
///
/// Nothing is saved when the backup copy fails.
pub fn save_scene_and_backup<H: DocumentHost + ?Sized>(
    host: &mut H,
    backup_suffix: &str,
    zfill: usize,
) -> Result<SaveOutcome, SaveError> {
    let document = host.scene_path().ok_or(SaveError::NoDocument)?.to_path_buf();
    let backup = reserve_increment_path(&backup_base(&document, backup_suffix)?, zfill)?;

    if let Err(source) = std::fs::copy(&document, &backup) {
        discard_reservation(&backup);
        return Err(SaveError::Backup { document, backup, source });
    }
    tracing::info!("backup written to {}", backup.display());

    tracing::info!("saving {} ...", document.display());
    let saved_to = host.save()?;
    Ok(SaveOutcome { saved_to, backup: Some(backup) })
}

/// Save the live document as the next free increment of its path.
pub fn save_scene_increment<H: DocumentHost + ?Sized>(
    host: &mut H,
    zfill: usize,
) -> Result<SaveOutcome, SaveError> {
    let document = host.scene_path().ok_or(SaveError::NoDocument)?.to_path_buf();
    let target = reserve_increment_path(&document, zfill)?;

    tracing::info!("saving {} ...", target.display());
    let saved = host.rename(&target).and_then(|()| host.save());
    match saved {
        Ok(saved_to) => Ok(SaveOutcome { saved_to, backup: None }),
        Err(e) => {
            discard_reservation(&target);
            Err(e.into())
        }
    }
}

fn discard_reservation(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove reserved path");
    }
}

#[cfg(test)]
#[path = "save_tests.rs"]
mod tests;
