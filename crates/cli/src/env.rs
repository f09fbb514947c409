// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

use refrepath_engine::HostProgram;

/// Maya batch executable; takes precedence over `MAYA_BATCH_PATH`.
pub const HOST_BATCH: &str = "REFREPATH_HOST_BATCH";
/// Maya batch executable, shared with the Maya-side package.
pub const MAYA_BATCH_PATH: &str = "MAYA_BATCH_PATH";
/// Directory holding the `refrepath` Python package for Maya batch sessions.
pub const PYTHON_PACKAGE: &str = "REFREPATH_PYTHON_PACKAGE";
/// Log filter directives, in `EnvFilter` syntax.
pub const LOG: &str = "REFREPATH_LOG";

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Maya batch executable: REFREPATH_HOST_BATCH > MAYA_BATCH_PATH
pub fn host_batch() -> Option<PathBuf> {
    non_empty(HOST_BATCH).or_else(|| non_empty(MAYA_BATCH_PATH)).map(PathBuf::from)
}

/// Log filter override
pub fn log_filter() -> Option<String> {
    non_empty(LOG)
}

/// `PYTHONPATH` for Maya batch jobs: the inherited entries plus the package dir.
pub fn python_path() -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::env::var_os("PYTHONPATH")
        .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    if let Some(package) = non_empty(PYTHON_PACKAGE) {
        entries.push(PathBuf::from(package));
    }
    entries
}

/// Program each batch job runs.
///
/// An explicit executable (flag or env) selects a Maya batch session;
/// otherwise this binary runs its own `worker` subcommand.
pub fn host_program(explicit: Option<PathBuf>) -> std::io::Result<HostProgram> {
    match explicit.or_else(host_batch) {
        Some(executable) => Ok(HostProgram::MayaBatch { executable, python_path: python_path() }),
        None => Ok(HostProgram::Worker(std::env::current_exe()?)),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
