// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-process launcher for per-document batch jobs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from launching a job process
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {}: {source}", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} timed out after {timeout:?}", program.display())]
    TimedOut { program: PathBuf, timeout: Duration },
}

/// Everything needed to start one job process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables set on the child. Applied after inheritance.
    pub env: HashMap<String, String>,
    /// Variables removed from an inherited environment.
    pub env_remove: Vec<String>,
    /// Start from the parent's environment instead of an empty one.
    pub inherit_env: bool,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), ..Default::default() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Human-readable command line, for logging only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{}'", part.replace('\'', "'\\''"))
                } else {
                    part
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured outcome of a finished job process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl LaunchOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !text.is_empty() && !text.ends_with('\n') && !self.stderr.is_empty() {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

/// Adapter for running one job process to completion
#[async_trait]
pub trait JobLauncher: Clone + Send + Sync + 'static {
    async fn launch(&self, spec: &LaunchSpec) -> Result<LaunchOutput, LaunchError>;
}

/// Launcher backed by real OS processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    timeout: Option<Duration>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill jobs that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl JobLauncher for ProcessLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> Result<LaunchOutput, LaunchError> {
        let mut command = tokio::process::Command::new(&spec.program);
        command.args(&spec.args);
        if spec.inherit_env {
            for key in &spec.env_remove {
                command.env_remove(key);
            }
        } else {
            command.env_clear();
        }
        command.envs(&spec.env);
        command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        command.kill_on_drop(true);

        tracing::debug!(command = %spec.command_line(), "spawning job process");
        let started = Instant::now();
        let child = command
            .spawn()
            .map_err(|source| LaunchError::Spawn { program: spec.program.clone(), source })?;

        let waited = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| LaunchError::TimedOut { program: spec.program.clone(), timeout })?,
            None => child.wait_with_output().await,
        };
        let output =
            waited.map_err(|source| LaunchError::Wait { program: spec.program.clone(), source })?;

        let duration = started.elapsed();
        tracing::debug!(
            program = %spec.program.display(),
            exit_code = ?output.status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "job process exited",
        );
        Ok(LaunchOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{JobLauncher, LaunchError, LaunchOutput, LaunchSpec};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use refrepath_core::vars::{ARG_MAYA_FILE, ARG_RESULT};
    use refrepath_core::JobReport;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    /// Scripted behavior for one document's job
    #[derive(Debug, Clone)]
    pub enum FakeLaunch {
        /// Exit with the given output and nothing else.
        Output(LaunchOutput),
        /// Write `report` to the job's result file, then exit with
        /// `exit_code` and `stdout`.
        Report { report: JobReport, stdout: String, exit_code: i32 },
        /// Fail to start the process.
        SpawnError(String),
    }

    impl FakeLaunch {
        pub fn stdout(text: impl Into<String>) -> Self {
            FakeLaunch::Output(LaunchOutput {
                exit_code: Some(0),
                stdout: text.into(),
                ..Default::default()
            })
        }

        pub fn report(report: JobReport) -> Self {
            FakeLaunch::Report { report, stdout: String::new(), exit_code: 0 }
        }

        /// A session that wrote its report, then aborted.
        pub fn aborted(report: JobReport, exit_code: i32) -> Self {
            FakeLaunch::Report { report, stdout: String::new(), exit_code }
        }
    }

    #[derive(Default)]
    struct FakeLauncherState {
        scripts: HashMap<PathBuf, FakeLaunch>,
        delays: HashMap<PathBuf, Duration>,
        launches: Vec<LaunchSpec>,
    }

    /// Fake launcher keyed by the document a job targets.
    ///
    /// Unscripted documents exit 0 with empty output.
    #[derive(Clone, Default)]
    pub struct FakeLauncher {
        inner: Arc<Mutex<FakeLauncherState>>,
    }

    impl FakeLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script(&self, document: impl Into<PathBuf>, launch: FakeLaunch) {
            self.inner.lock().scripts.insert(document.into(), launch);
        }

        /// Make the job for `document` take `delay` before it exits.
        pub fn delay(&self, document: impl Into<PathBuf>, delay: Duration) {
            self.inner.lock().delays.insert(document.into(), delay);
        }

        /// Specs received so far, in launch order.
        pub fn launches(&self) -> Vec<LaunchSpec> {
            self.inner.lock().launches.clone()
        }

        /// Documents launched so far, in launch order.
        pub fn documents(&self) -> Vec<PathBuf> {
            self.inner
                .lock()
                .launches
                .iter()
                .filter_map(|spec| spec.env_var(ARG_MAYA_FILE).map(PathBuf::from))
                .collect()
        }
    }

    #[async_trait]
    impl JobLauncher for FakeLauncher {
        async fn launch(&self, spec: &LaunchSpec) -> Result<LaunchOutput, LaunchError> {
            let (script, delay) = {
                let mut state = self.inner.lock();
                state.launches.push(spec.clone());
                let document = spec.env_var(ARG_MAYA_FILE).map(Path::new);
                (
                    document.and_then(|doc| state.scripts.get(doc).cloned()),
                    document.and_then(|doc| state.delays.get(doc).copied()),
                )
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match script {
                None => Ok(LaunchOutput { exit_code: Some(0), ..Default::default() }),
                Some(FakeLaunch::Output(output)) => Ok(output),
                Some(FakeLaunch::SpawnError(reason)) => Err(LaunchError::Spawn {
                    program: spec.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, reason),
                }),
                Some(FakeLaunch::Report { report, stdout, exit_code }) => {
                    if let Some(path) = spec.env_var(ARG_RESULT) {
                        report.write(Path::new(path)).map_err(|source| LaunchError::Wait {
                            program: spec.program.clone(),
                            source,
                        })?;
                    }
                    Ok(LaunchOutput {
                        exit_code: Some(exit_code),
                        stdout,
                        stderr: String::new(),
                        duration: Duration::from_millis(1),
                    })
                }
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLaunch, FakeLauncher};

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
