// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-side entry: run one session from decoded job variables and write
//! the structured result file.

use refrepath_adapters::DocumentHost;
use refrepath_core::{JobReport, JobVars};

use crate::discovery::get_references;
use crate::job::SaveSettings;
use crate::session::{process_document, SessionError};

/// Process the document named by `vars` and report what happened.
///
/// The report is written to `vars.result_path` whenever one is given, an
/// aborted session included. Non-fatal failures land in the report's
/// `errors`; an abort is also returned so the process can exit non-zero.
pub fn process_session<H: DocumentHost + ?Sized>(
    host: &mut H,
    vars: &JobVars,
) -> Result<JobReport, SessionError> {
    let save = SaveSettings {
        mode: vars.save_mode,
        backup_suffix: vars.backup_suffix.clone(),
        zfill: vars.zfill,
    };
    tracing::debug!(
        document = %vars.document.display(),
        substitution = %vars.substitution,
        save_mode = %save.mode,
        "processing session",
    );

    let mut report = JobReport::new(&vars.document);
    let aborted = match process_document(host, &vars.document, &vars.substitution, &save) {
        Ok(outcome) => {
            report.references_found = outcome.references_found;
            report.repathed = outcome.repathed;
            if let Some(saved) = outcome.saved {
                report.saved_to = Some(saved.saved_to);
                report.backup = saved.backup;
            }
            report.errors = outcome.errors;
            None
        }
        Err(e) => {
            tracing::error!(document = %vars.document.display(), error = %e, "session aborted");
            report.references_found = get_references(&*host).len();
            report.errors.push(e.to_string());
            Some(e)
        }
    };

    if let Some(result_path) = &vars.result_path {
        match report.write(result_path) {
            Ok(()) => tracing::debug!(path = %result_path.display(), "result file written"),
            Err(e) => {
                tracing::error!(
                    path = %result_path.display(),
                    error = %e,
                    "failed to write result file",
                )
            }
        }
    }
    tracing::info!("finished.");
    match aborted {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
