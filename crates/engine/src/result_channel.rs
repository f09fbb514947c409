// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning a finished job into a [`JobResult`].
//!
//! The worker's structured result file is authoritative. When it is missing
//! or unreadable (e.g. a Maya batch session running an older Python side),
//! captured output and then the job log are scraped for known line shapes.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use refrepath_adapters::LaunchOutput;
use refrepath_core::JobReport;
use regex::Regex;

use crate::job::JobDescriptor;

#[allow(clippy::expect_used)]
static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+/(\d+) repathing\b").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static LEGACY_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"open_and_repath_references\b.*?\b\d+/(\d+)")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static SAVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsaving\s*(\S.*?)\s*\.\.\.\s*$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static BACKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"backup written to (\S.*?)\s*$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\S+\s+)?ERROR\b").expect("constant regex pattern is valid")
});

const NO_REFERENCES: &str = "no references in";

/// Where a [`JobResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Report,
    Scraped,
    Empty,
}

/// What could be recognized in free-form job output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedResult {
    pub references: Option<usize>,
    pub saved_to: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub errors: Vec<String>,
}

impl ScrapedResult {
    pub fn is_empty(&self) -> bool {
        self.references.is_none()
            && self.saved_to.is_none()
            && self.backup.is_none()
            && self.errors.is_empty()
    }
}

/// Parent-side view of one job's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub references_processed: usize,
    /// References actually re-targeted; unknown when scraped.
    pub updated: Option<usize>,
    pub saved_to: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub errors: Vec<String>,
    pub source: ResultSource,
}

impl JobResult {
    pub fn empty() -> Self {
        Self {
            references_processed: 0,
            updated: None,
            saved_to: None,
            backup: None,
            errors: Vec::new(),
            source: ResultSource::Empty,
        }
    }

    pub fn from_report(report: JobReport) -> Self {
        Self {
            references_processed: report.references_found,
            updated: Some(report.updated_count()),
            saved_to: report.saved_to,
            backup: report.backup,
            errors: report.errors,
            source: ResultSource::Report,
        }
    }

    pub fn from_scraped(scraped: ScrapedResult) -> Self {
        Self {
            references_processed: scraped.references.unwrap_or(0),
            updated: None,
            saved_to: scraped.saved_to,
            backup: scraped.backup,
            errors: scraped.errors,
            source: ResultSource::Scraped,
        }
    }

    /// The document was written back to disk.
    pub fn was_saved(&self) -> bool {
        self.saved_to.is_some()
    }
}

/// Scrape recognizable lines out of job output. Line order does not matter
/// except that the first reference count seen wins.
pub fn scrape(text: &str) -> ScrapedResult {
    let mut result = ScrapedResult::default();
    for line in text.split('\n').map(|l| l.trim_end_matches('\r')) {
        if result.references.is_none() {
            let count = COUNT.captures(line).or_else(|| LEGACY_COUNT.captures(line));
            if let Some(n) = count.and_then(|c| c[1].parse().ok()) {
                result.references = Some(n);
            }
        }
        if ERROR.is_match(line) {
            result.errors.push(line.trim().to_string());
            continue;
        }
        if line.contains(NO_REFERENCES) && result.references.is_none() {
            result.references = Some(0);
        }
        if let Some(c) = BACKUP.captures(line) {
            result.backup = Some(PathBuf::from(&c[1]));
        } else if let Some(c) = SAVE.captures(line) {
            result.saved_to = Some(PathBuf::from(&c[1]));
        }
    }
    result
}

/// Result of a finished job: report file, then output, then job log.
///
/// Never fails; anything unrecognizable means zero references processed.
pub fn collect_result(descriptor: &JobDescriptor, output: &LaunchOutput) -> JobResult {
    if let Some(report) = read_report(descriptor.result_path()) {
        return JobResult::from_report(report);
    }

    let scraped = scrape(&output.combined());
    if !scraped.is_empty() {
        return JobResult::from_scraped(scraped);
    }

    match std::fs::read_to_string(descriptor.log_path()) {
        Ok(log) => {
            let scraped = scrape(&log);
            if !scraped.is_empty() {
                return JobResult::from_scraped(scraped);
            }
        }
        Err(e) => {
            tracing::debug!(
                path = %descriptor.log_path().display(),
                error = %e,
                "no job log to scrape",
            );
        }
    }
    JobResult::empty()
}

fn read_report(path: &Path) -> Option<JobReport> {
    if !path.exists() {
        return None;
    }
    match JobReport::read(path) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "unreadable result file, scraping output",
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "result_channel_tests.rs"]
mod tests;
