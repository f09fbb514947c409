// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable command output.

use std::fmt::Write;
use std::path::Path;

use refrepath_engine::{BatchSummary, DocumentOutcome, JobStatus, SessionOutcome};

use crate::color;

fn display_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn outcome_detail(outcome: &DocumentOutcome) -> String {
    let mut parts = Vec::new();
    if let JobStatus::Failed { reason } = &outcome.status {
        parts.push(reason.clone());
    }
    if let Some(result) = &outcome.result {
        parts.push(match result.references_processed {
            1 => "1 reference".to_string(),
            n => format!("{n} references"),
        });
        if let Some(saved_to) = &result.saved_to {
            parts.push(format!("saved to {}", saved_to.display()));
        }
        if !result.errors.is_empty() {
            parts.push(format!("{} error(s)", result.errors.len()));
        }
    }
    if !outcome.duration.is_zero() {
        parts.push(format!("{:.1}s", outcome.duration.as_secs_f64()));
    }
    parts.join(", ")
}

/// Per-document lines followed by the totals line.
pub fn format_batch_summary(summary: &BatchSummary, root: &Path) -> String {
    let mut out = String::new();
    let dry_run = summary.outcomes.iter().any(|o| o.status == JobStatus::DryRun);
    if dry_run {
        let _ = writeln!(out, "{}", color::header("Dry run: no scene was launched or modified"));
    }

    let width = summary
        .outcomes
        .iter()
        .map(|o| display_name(&o.document, root).len())
        .max()
        .unwrap_or(0);
    for outcome in &summary.outcomes {
        let status = match outcome.status {
            JobStatus::Completed => color::good("completed"),
            JobStatus::Failed { .. } => color::bad("failed   "),
            JobStatus::DryRun => color::context("dry-run  "),
        };
        let name = display_name(&outcome.document, root);
        let detail = outcome_detail(outcome);
        let line = format!("{name:<width$}  {status}  {}", color::context(&detail));
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(
        out,
        "\n{}/{} documents processed, {} failed, {} references, {} documents updated",
        summary.processed(),
        summary.discovered(),
        summary.failed(),
        summary.references_processed(),
        summary.documents_updated(),
    );
    out
}

/// Repathed references of a single scene and where it was saved.
pub fn format_session(document: &Path, outcome: &SessionOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", color::header(&document.display().to_string()));
    let _ = writeln!(
        out,
        "{} references, {} repathed",
        outcome.references_found,
        outcome.repathed.len()
    );
    for record in &outcome.repathed {
        let _ = writeln!(out, "  {}", record.node_name);
        let previous = record.previous_path.display().to_string();
        let _ = writeln!(out, "    {}", color::context(&previous));
        let _ = writeln!(out, "    -> {}", record.new_path.display());
    }
    for error in &outcome.errors {
        let _ = writeln!(out, "  {} {error}", color::bad("skipped:"));
    }
    match &outcome.saved {
        Some(saved) => {
            if let Some(backup) = &saved.backup {
                let _ = writeln!(out, "backup: {}", backup.display());
            }
            let _ = writeln!(out, "saved: {}", saved.saved_to.display());
        }
        None if !outcome.repathed.is_empty() => {
            let _ = writeln!(out, "not saved (pass --save to write changes)");
        }
        None => {}
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
