// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! Console output follows `REFREPATH_LOG` (or `--debug`). An optional log file
//! always records at debug level through a non-blocking writer; the returned
//! guard must live until the process exits or buffered lines are lost.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::{color, env};

#[derive(Debug, Default)]
pub struct LogConfig {
    pub debug: bool,
    /// Colorize console output when the terminal allows it.
    pub ansi: bool,
    /// Include module targets in console lines.
    pub targets: bool,
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Interactive commands: colored, terse console output.
    pub fn console(debug: bool) -> Self {
        Self { debug, ansi: color::should_colorize(), targets: false, file: None }
    }

    /// Worker processes: plain lines the parent can scrape.
    pub fn worker(file: Option<PathBuf>) -> Self {
        Self { debug: false, ansi: false, targets: true, file }
    }

    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }
}

/// `refrepath-<YYYYmmdd-HHMMSS>.log` inside `root`.
pub fn batch_log_path(root: &Path) -> PathBuf {
    root.join(format!("refrepath-{}.log", chrono::Local::now().format("%Y%m%d-%H%M%S")))
}

fn console_filter(debug: bool) -> EnvFilter {
    match env::log_filter() {
        Some(directives) => EnvFilter::new(directives),
        None if debug => EnvFilter::new("debug"),
        None => EnvFilter::new("info"),
    }
}

/// Install the global subscriber.
pub fn init(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(config.ansi)
        .with_target(config.targets)
        .with_filter(console_filter(config.debug));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("log path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name.to_string_lossy())
                .build(dir)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer =
                fmt::layer().with_writer(writer).with_ansi(false).with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to install logging: {e}"))?;
    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
