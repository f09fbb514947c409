// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath worker`: child entry point launched by `batch`.
//!
//! Parameters arrive through `REFREPATH_ARG_*` variables; the outcome is
//! written to the result file and mirrored in the log lines the parent
//! scrapes when that file is missing. An aborted session exits with the
//! configuration exit code so the parent records the document as failed.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use refrepath_adapters::MayaAsciiHost;
use refrepath_core::JobVars;
use refrepath_engine::process_session;

use crate::exit_error::ExitError;
use crate::logging::{self, LogConfig};

#[derive(Args, Debug)]
pub struct WorkerArgs {
    /// Log file for this job
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

pub fn run(args: WorkerArgs) -> Result<()> {
    let _guard = logging::init(LogConfig::worker(args.log))?;

    let vars = JobVars::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid job environment");
        ExitError::config(e)
    })?;
    let report = process_session(&mut MayaAsciiHost::new(), &vars).map_err(ExitError::config)?;
    tracing::debug!(
        document = %report.document.display(),
        repathed = report.updated_count(),
        errors = report.errors.len(),
        "session report",
    );
    Ok(())
}
