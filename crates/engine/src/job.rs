// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable description of one document's batch job.
//!
//! Every derived value (identifier, log path, result path, environment,
//! launch command) is computed once on first use and cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use refrepath_adapters::LaunchSpec;
use refrepath_core::{JobVars, SaveMode, Substitution, DEFAULT_BACKUP_SUFFIX, DEFAULT_ZFILL};

const TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// MEL command run by a Maya batch session to enter the worker.
const MAYA_PYTHON_COMMAND: &str =
    r#"python("import refrepath.batch;refrepath.batch.process_session();")"#;

/// Variables removed from every job's inherited environment.
const SCRUBBED_VARS: [&str; 2] = ["VIRTUAL_ENV", "_"];

/// Maya services that slow down or block headless sessions.
const MAYA_DISABLED_SERVICES: [&str; 4] =
    ["MAYA_DISABLE_CLIC_IPM", "MAYA_DISABLE_CIP", "MAYA_DISABLE_CER", "MAYA_DISABLE_ADP"];

/// How a document is persisted after repathing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSettings {
    pub mode: SaveMode,
    pub backup_suffix: String,
    pub zfill: usize,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            mode: SaveMode::default(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            zfill: DEFAULT_ZFILL,
        }
    }
}

/// Program launched for each job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostProgram {
    /// A Maya batch executable, running the Python side of the tool.
    MayaBatch {
        executable: PathBuf,
        /// Entries appended to `PYTHONPATH` so Maya can import the package.
        python_path: Vec<PathBuf>,
    },
    /// This tool's own `worker` subcommand.
    Worker(PathBuf),
}

impl HostProgram {
    pub fn executable(&self) -> &Path {
        match self {
            HostProgram::MayaBatch { executable, .. } => executable,
            HostProgram::Worker(executable) => executable,
        }
    }
}

/// One document's job: what to run, where it logs, what it receives.
#[derive(Debug)]
pub struct JobDescriptor {
    document: PathBuf,
    substitution: Substitution,
    save: SaveSettings,
    host: HostProgram,
    time: DateTime<Local>,
    identifier: OnceLock<String>,
    log_path: OnceLock<PathBuf>,
    result_path: OnceLock<PathBuf>,
    environment: OnceLock<HashMap<String, String>>,
    launch: OnceLock<LaunchSpec>,
    command_line: OnceLock<String>,
}

impl JobDescriptor {
    pub fn new(
        document: impl Into<PathBuf>,
        substitution: Substitution,
        save: SaveSettings,
        host: HostProgram,
    ) -> Self {
        Self::with_time(document, substitution, save, host, Local::now())
    }

    /// Build with a fixed construction time.
    pub fn with_time(
        document: impl Into<PathBuf>,
        substitution: Substitution,
        save: SaveSettings,
        host: HostProgram,
        time: DateTime<Local>,
    ) -> Self {
        Self {
            document: document.into(),
            substitution,
            save,
            host,
            time,
            identifier: OnceLock::new(),
            log_path: OnceLock::new(),
            result_path: OnceLock::new(),
            environment: OnceLock::new(),
            launch: OnceLock::new(),
            command_line: OnceLock::new(),
        }
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    fn timestamp(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// `<stem>-<YYYYmmdd-HHMMSS>`
    pub fn identifier(&self) -> &str {
        self.identifier.get_or_init(|| {
            let stem = self.document.file_stem().unwrap_or_default().to_string_lossy();
            format!("{stem}-{}", self.timestamp())
        })
    }

    /// `<doc dir>/refrepath.batch-<doc name>-<YYYYmmdd-HHMMSS>.log`
    pub fn log_path(&self) -> &Path {
        self.log_path.get_or_init(|| {
            let name = self.document.file_name().unwrap_or_default().to_string_lossy();
            let file_name = format!("refrepath.batch-{name}-{}.log", self.timestamp());
            self.document.with_file_name(file_name)
        })
    }

    /// The log path with `.result.json` in place of `.log`.
    pub fn result_path(&self) -> &Path {
        self.result_path.get_or_init(|| self.log_path().with_extension("result.json"))
    }

    /// Variables this job sets on top of the inherited environment.
    pub fn environment_block(&self) -> &HashMap<String, String> {
        self.environment.get_or_init(|| {
            let mut vars = JobVars::new(&self.document, self.substitution.clone());
            vars.result_path = Some(self.result_path().to_path_buf());
            vars.zfill = self.save.zfill;
            vars.backup_suffix = self.save.backup_suffix.clone();
            vars.save_mode = self.save.mode;

            let mut env: HashMap<String, String> =
                vars.to_env().into_iter().map(|(k, v)| (k.to_string(), v)).collect();

            if let HostProgram::MayaBatch { python_path, .. } = &self.host {
                if let Ok(joined) = std::env::join_paths(python_path) {
                    env.insert("PYTHONPATH".to_string(), joined.to_string_lossy().into_owned());
                }
                // keep the batch session off the caller's toolchain
                env.insert("PATH".to_string(), String::new());
                for key in MAYA_DISABLED_SERVICES {
                    env.insert(key.to_string(), "1".to_string());
                }
            }
            env
        })
    }

    /// Launch command, inheriting the parent environment minus scrubbed vars.
    pub fn launch_spec(&self) -> &LaunchSpec {
        self.launch.get_or_init(|| {
            let log = self.log_path().display().to_string();
            let args = match &self.host {
                HostProgram::MayaBatch { .. } => vec![
                    "-command".to_string(),
                    MAYA_PYTHON_COMMAND.to_string(),
                    "-log".to_string(),
                    log,
                ],
                HostProgram::Worker(_) => vec!["worker".to_string(), "--log".to_string(), log],
            };
            LaunchSpec {
                program: self.host.executable().to_path_buf(),
                args,
                env: self.environment_block().clone(),
                env_remove: SCRUBBED_VARS.iter().map(|v| v.to_string()).collect(),
                inherit_env: true,
            }
        })
    }

    /// Display form of [`Self::launch_spec`].
    pub fn command_line(&self) -> &str {
        self.command_line.get_or_init(|| self.launch_spec().command_line())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
