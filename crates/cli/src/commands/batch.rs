// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath batch`: one isolated host process per discovered scene.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use refrepath_adapters::ProcessLauncher;
use refrepath_engine::{run_batch, BatchConfig};

use super::{absolute_path, SaveArgs, SubstitutionArgs};
use crate::exit_error::ExitError;
use crate::logging::{self, LogConfig};
use crate::{env, output};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for scenes
    pub root: PathBuf,

    #[command(flatten)]
    pub substitution: SubstitutionArgs,

    /// Maya batch executable (default: $REFREPATH_HOST_BATCH, $MAYA_BATCH_PATH, else this binary)
    #[arg(long, value_name = "PATH")]
    pub host_batch: Option<PathBuf>,

    /// Scene extension to process, repeatable (default: ma, mb)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Also process scenes whose name contains the backup suffix
    #[arg(long)]
    pub include_backups: bool,

    #[command(flatten)]
    pub save: SaveArgs,

    /// Scenes processed concurrently
    #[arg(long, short = 'j', value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// List the jobs that would run without launching them
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose console output
    #[arg(long)]
    pub debug: bool,
}

pub async fn run(args: BatchArgs) -> Result<()> {
    let root = absolute_path(&args.root)?;
    let substitution = args.substitution.build(Some(root.as_path()))?;
    if !root.is_dir() {
        return Err(ExitError::config(format!(
            "root directory does not exist: {}",
            args.root.display()
        ))
        .into());
    }

    let mut log = LogConfig::console(args.debug);
    if !args.dry_run {
        log = log.with_file(logging::batch_log_path(&root));
    }
    let _guard = logging::init(log)?;

    let host = env::host_program(args.host_batch).context("cannot locate the worker executable")?;
    let mut config = BatchConfig::new(&root, substitution, host);
    if !args.extensions.is_empty() {
        config.extensions = args
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
    }
    config.skip_backups = !args.include_backups;
    config.save = args.save.into();
    config.dry_run = args.dry_run;
    config.jobs = args.jobs;

    tracing::info!(root = %root.display(), substitution = %config.substitution, "starting batch");
    let summary = run_batch(&config, &ProcessLauncher::new()).await.map_err(ExitError::config)?;

    print!("{}", output::format_batch_summary(&summary, &root));
    Ok(())
}
