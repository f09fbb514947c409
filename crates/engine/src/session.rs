// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-document repathing session: open, repath each reference, save or skip.
//!
//! The session borrows one host for its whole duration. Per-reference host
//! failures are logged and skipped; substitution errors abort the session.

use std::path::Path;

use refrepath_adapters::DocumentHost;
use refrepath_core::{RepathedReference, SaveMode, Substitution, SubstitutionError};
use thiserror::Error;

use crate::discovery::get_references;
use crate::job::SaveSettings;
use crate::save::{save_scene_and_backup, save_scene_increment, SaveOutcome};

/// Errors that abort a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}

/// Everything a session did to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Real references found, sentinels excluded.
    pub references_found: usize,
    pub repathed: Vec<RepathedReference>,
    /// Set only when at least one reference changed and the save succeeded.
    pub saved: Option<SaveOutcome>,
    /// Non-fatal problems: open failure, skipped references, failed save.
    pub errors: Vec<String>,
}

impl SessionOutcome {
    pub fn has_updates(&self) -> bool {
        self.repathed.iter().any(RepathedReference::was_updated)
    }
}

enum Step {
    Repathed(RepathedReference),
    UpToDate,
    Skipped(String),
}

/// Point one reference node at its substituted path.
///
/// Returns `None` when the node was skipped: its path could not be read,
/// it is already up to date, or the host refused the re-target.
pub fn repath_reference<H: DocumentHost + ?Sized>(
    host: &mut H,
    node: &str,
    substitution: &Substitution,
) -> Result<Option<RepathedReference>, SubstitutionError> {
    Ok(match repath_step(host, node, substitution)? {
        Step::Repathed(record) => Some(record),
        Step::UpToDate | Step::Skipped(_) => None,
    })
}

fn repath_step<H: DocumentHost + ?Sized>(
    host: &mut H,
    node: &str,
    substitution: &Substitution,
) -> Result<Step, SubstitutionError> {
    let current = match host.reference_path(node) {
        Ok(path) if path.as_os_str().is_empty() => {
            tracing::error!(node, "reference has an empty file path");
            return Ok(Step::Skipped(format!("reference <{node}> has an empty file path")));
        }
        Ok(path) => path,
        Err(e) => {
            tracing::error!(node, error = %e, "cannot read reference path");
            return Ok(Step::Skipped(e.to_string()));
        }
    };
    tracing::debug!(node, current = %current.display(), "current path");

    let new_path = substitution.substitute(&current)?;
    let record = RepathedReference::new(node, current, new_path);
    if !record.was_updated() {
        tracing::info!(node, "path is already up-to-date");
        return Ok(Step::UpToDate);
    }

    tracing::debug!(node, new = %record.new_path.display(), "new path");
    if let Err(e) = host.retarget(node, &record.new_path) {
        tracing::error!(node, error = %e, "re-target rejected");
        return Ok(Step::Skipped(e.to_string()));
    }
    Ok(Step::Repathed(record))
}

/// Open `document` and repath all its references without saving.
pub fn open_and_repath_references<H: DocumentHost + ?Sized>(
    host: &mut H,
    document: &Path,
    substitution: &Substitution,
) -> Result<SessionOutcome, SessionError> {
    let mut outcome = SessionOutcome::default();

    tracing::info!("opening {} ...", document.display());
    if let Err(e) = host.open(document) {
        tracing::error!(document = %document.display(), error = %e, "failed to open document");
        outcome.errors.push(e.to_string());
        return Ok(outcome);
    }

    let references = get_references(&*host);
    outcome.references_found = references.len();
    if references.is_empty() {
        tracing::info!("no references in scene");
        return Ok(outcome);
    }

    let total = references.len();
    for (index, node) in references.iter().enumerate() {
        tracing::info!("{}/{} repathing {} ...", index + 1, total, node);
        match repath_step(host, node, substitution)? {
            Step::Repathed(record) => outcome.repathed.push(record),
            Step::UpToDate => {}
            Step::Skipped(reason) => outcome.errors.push(reason),
        }
    }
    Ok(outcome)
}

/// Full session: repath, then persist only if something changed.
pub fn process_document<H: DocumentHost + ?Sized>(
    host: &mut H,
    document: &Path,
    substitution: &Substitution,
    save: &SaveSettings,
) -> Result<SessionOutcome, SessionError> {
    let mut outcome = open_and_repath_references(host, document, substitution)?;
    if !outcome.has_updates() {
        tracing::info!(document = %document.display(), "nothing repathed, not saving");
        return Ok(outcome);
    }

    let saved = match save.mode {
        SaveMode::Backup => save_scene_and_backup(host, &save.backup_suffix, save.zfill),
        SaveMode::Increment => save_scene_increment(host, save.zfill),
    };
    match saved {
        Ok(saved) => outcome.saved = Some(saved),
        Err(e) => {
            tracing::error!(document = %document.display(), error = %e, "failed to save document");
            outcome.errors.push(e.to_string());
        }
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
