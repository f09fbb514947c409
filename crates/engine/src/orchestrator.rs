// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch orchestration: discover documents under a root and run one isolated
//! job per document.
//!
//! A failing job never stops the batch. Outcomes are reported in discovery
//! order whatever order jobs finish in.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use refrepath_adapters::JobLauncher;
use refrepath_core::{Substitution, SubstitutionError};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::job::{HostProgram, JobDescriptor, SaveSettings};
use crate::result_channel::{collect_result, JobResult, ResultSource};

/// Default document extensions.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["ma", "mb"];

/// Prefix shared by every log and result file this tool writes.
const OWN_FILE_PREFIX: &str = "refrepath";

/// Fatal configuration problems, detected before any document is processed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory does not exist: {}", path.display())]
    MissingRoot { path: PathBuf },

    #[error("replacement path does not exist: {}", path.display())]
    MissingReplacement { path: PathBuf },

    #[error("at least one job slot is required")]
    ZeroJobs,

    #[error("no document extensions given")]
    NoExtensions,

    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}

/// Everything a batch run needs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub root: PathBuf,
    pub substitution: Substitution,
    pub host: HostProgram,
    /// Lowercase, without leading dot.
    pub extensions: Vec<String>,
    /// Drop documents whose name contains the backup suffix.
    pub skip_backups: bool,
    pub save: SaveSettings,
    pub dry_run: bool,
    pub jobs: usize,
}

impl BatchConfig {
    pub fn new(root: impl Into<PathBuf>, substitution: Substitution, host: HostProgram) -> Self {
        Self {
            root: root.into(),
            substitution,
            host,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_backups: true,
            save: SaveSettings::default(),
            dry_run: false,
            jobs: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.is_dir() {
            return Err(ConfigError::MissingRoot { path: self.root.clone() });
        }
        let replacement = self.substitution.replacement_path();
        if !replacement.exists() {
            return Err(ConfigError::MissingReplacement { path: replacement.to_path_buf() });
        }
        if self.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }
}

/// Final state of one document's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Failed { reason: String },
    DryRun,
}

#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub document: PathBuf,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub duration: Duration,
}

impl DocumentOutcome {
    fn failed(document: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            document,
            status: JobStatus::Failed { reason: reason.into() },
            result: None,
            duration: Duration::ZERO,
        }
    }
}

/// Per-document outcomes in discovery order, with totals.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchSummary {
    pub fn discovered(&self) -> usize {
        self.outcomes.len()
    }

    pub fn processed(&self) -> usize {
        self.count(|o| o.status == JobStatus::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o.status, JobStatus::Failed { .. }))
    }

    pub fn references_processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref())
            .map(|r| r.references_processed)
            .sum()
    }

    pub fn documents_updated(&self) -> usize {
        self.count(|o| o.result.as_ref().is_some_and(JobResult::was_saved))
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Documents under `root` with one of `extensions`, sorted by file name at
/// each level.
///
/// Files whose name contains `skip_suffix` are dropped, as are the log and
/// result files this tool writes.
pub fn discover_documents(
    root: &Path,
    extensions: &[String],
    skip_suffix: Option<&str>,
) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            let own_file = name.starts_with(OWN_FILE_PREFIX)
                && (name.ends_with(".log") || name.ends_with(".result.json"));
            let skipped = skip_suffix.is_some_and(|suffix| name.contains(suffix));
            let wanted = path
                .extension()
                .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
            wanted && !own_file && !skipped
        })
        .collect()
}

/// Run one job per discovered document and summarize.
///
/// Only configuration problems are errors; per-document failures are
/// recorded in the summary.
pub async fn run_batch<L: JobLauncher>(
    config: &BatchConfig,
    launcher: &L,
) -> Result<BatchSummary, ConfigError> {
    config.validate()?;

    let skip = config.skip_backups.then_some(config.save.backup_suffix.as_str());
    let documents = discover_documents(&config.root, &config.extensions, skip);
    let total = documents.len();
    tracing::info!(root = %config.root.display(), "about to process {total} documents");

    let outcomes = if config.jobs == 1 {
        let mut outcomes = Vec::with_capacity(total);
        for (index, document) in documents.into_iter().enumerate() {
            let job = job_for(config, document);
            outcomes.push(run_document(job, launcher, config.dry_run).await);
            tracing::info!("{}/{} completed.", index + 1, total);
        }
        outcomes
    } else {
        run_pool(config, documents, launcher).await
    };

    let summary = BatchSummary { outcomes };
    tracing::info!(
        processed = summary.processed(),
        failed = summary.failed(),
        references = summary.references_processed(),
        "batch finished",
    );
    Ok(summary)
}

fn job_for(config: &BatchConfig, document: PathBuf) -> JobDescriptor {
    JobDescriptor::new(
        document,
        config.substitution.clone(),
        config.save.clone(),
        config.host.clone(),
    )
}

/// Bounded pool: at most `config.jobs` children at once.
async fn run_pool<L: JobLauncher>(
    config: &BatchConfig,
    documents: Vec<PathBuf>,
    launcher: &L,
) -> Vec<DocumentOutcome> {
    let total = documents.len();
    let semaphore = Arc::new(Semaphore::new(config.jobs));
    let mut workers = JoinSet::new();

    for (index, document) in documents.iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let launcher = launcher.clone();
        let job = job_for(config, document.clone());
        let dry_run = config.dry_run;
        workers.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => run_document(job, &launcher, dry_run).await,
                Err(e) => DocumentOutcome::failed(job.document().to_path_buf(), e.to_string()),
            };
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<DocumentOutcome>> = vec![None; total];
    let mut completed = 0;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                completed += 1;
                tracing::info!("{completed}/{total} completed.");
                slots[index] = Some(outcome);
            }
            Err(e) => tracing::error!(error = %e, "job task crashed"),
        }
    }

    slots
        .into_iter()
        .zip(documents)
        .map(|(slot, document)| {
            slot.unwrap_or_else(|| DocumentOutcome::failed(document, "job task crashed"))
        })
        .collect()
}

async fn run_document<L: JobLauncher>(
    job: JobDescriptor,
    launcher: &L,
    dry_run: bool,
) -> DocumentOutcome {
    let id = job.identifier();
    tracing::info!(job = id, "about to be processed ...");
    tracing::debug!(job = id, command = %job.command_line(), "launch command");
    tracing::debug!(job = id, env = ?job.environment_block(), "launch environment");

    if dry_run {
        tracing::info!(job = id, "dry run, not launched");
        return DocumentOutcome {
            document: job.document().to_path_buf(),
            status: JobStatus::DryRun,
            result: None,
            duration: Duration::ZERO,
        };
    }

    let started = Instant::now();
    let (status, result) = match launcher.launch(job.launch_spec()).await {
        Ok(output) => {
            let result = collect_result(&job, &output);
            log_result(id, &result);
            let status = if output.success() {
                JobStatus::Completed
            } else {
                let reason = match output.exit_code {
                    Some(code) => format!("exited with code {code}"),
                    None => "terminated by signal".to_string(),
                };
                tracing::error!(job = id, "{reason}");
                JobStatus::Failed { reason }
            };
            (status, Some(result))
        }
        Err(e) => {
            tracing::error!(job = id, error = %e, "launch failed");
            (JobStatus::Failed { reason: e.to_string() }, None)
        }
    };
    let duration = started.elapsed();
    tracing::info!(job = id, "finished in {:.2}s", duration.as_secs_f64());

    DocumentOutcome { document: job.document().to_path_buf(), status, result, duration }
}

fn log_result(id: &str, result: &JobResult) {
    for error in &result.errors {
        tracing::error!(job = id, "{error}");
    }
    match result.source {
        ResultSource::Empty => tracing::warn!(job = id, "no result recognized"),
        ResultSource::Report | ResultSource::Scraped => {
            if result.references_processed == 0 {
                tracing::info!(job = id, "no references in scene");
            } else {
                tracing::info!(job = id, "processed {} references", result.references_processed);
            }
        }
    }
    if let Some(backup) = &result.backup {
        tracing::info!(job = id, "backup at {}", backup.display());
    }
    if let Some(saved_to) = &result.saved_to {
        tracing::info!(job = id, "saved to {}", saved_to.display());
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
