// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job parameters passed from the orchestrator to a worker process.
//!
//! The worker is a separate process whose only input channel is its
//! environment, so every parameter is encoded as a string variable.

use crate::increment::{DEFAULT_BACKUP_SUFFIX, DEFAULT_ZFILL};
use crate::report::SaveMode;
use crate::substitution::{Substitution, SubstitutionError};
use std::path::PathBuf;
use thiserror::Error;

pub const ARG_MAYA_FILE: &str = "REFREPATH_ARG_MAYA_FILE";
pub const ARG_DENOMINATOR: &str = "REFREPATH_ARG_DENOMINATOR";
pub const ARG_ROOT: &str = "REFREPATH_ARG_ROOT";
pub const ARG_SEARCH: &str = "REFREPATH_ARG_SEARCH";
pub const ARG_REPLACE: &str = "REFREPATH_ARG_REPLACE";
pub const ARG_RESULT: &str = "REFREPATH_ARG_RESULT";
pub const ARG_ZFILL: &str = "REFREPATH_ARG_ZFILL";
pub const ARG_BACKUP_SUFFIX: &str = "REFREPATH_ARG_BACKUP_SUFFIX";
pub const ARG_SAVE_MODE: &str = "REFREPATH_ARG_SAVE_MODE";

#[derive(Debug, Error)]
pub enum JobVarsError {
    #[error("missing {0} variable")]
    Missing(&'static str),

    #[error(
        "expected either REFREPATH_ARG_DENOMINATOR/REFREPATH_ARG_ROOT \
         or REFREPATH_ARG_SEARCH/REFREPATH_ARG_REPLACE"
    )]
    NoSubstitution,

    #[error("invalid {name} value `{value}`: {reason}")]
    Invalid { name: &'static str, value: String, reason: String },

    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}

/// Decoded worker parameters.
#[derive(Debug, Clone)]
pub struct JobVars {
    pub document: PathBuf,
    pub substitution: Substitution,
    /// Where the worker writes its [`JobReport`](crate::JobReport), if anywhere.
    pub result_path: Option<PathBuf>,
    pub zfill: usize,
    pub backup_suffix: String,
    pub save_mode: SaveMode,
}

impl JobVars {
    pub fn new(document: impl Into<PathBuf>, substitution: Substitution) -> Self {
        Self {
            document: document.into(),
            substitution,
            result_path: None,
            zfill: DEFAULT_ZFILL,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            save_mode: SaveMode::default(),
        }
    }

    /// Encode as `(name, value)` pairs for a child environment.
    pub fn to_env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![(ARG_MAYA_FILE, self.document.display().to_string())];
        match &self.substitution {
            Substitution::Denominator { common_denominator, root_substitute } => {
                env.push((ARG_DENOMINATOR, common_denominator.clone()));
                env.push((ARG_ROOT, root_substitute.display().to_string()));
            }
            Substitution::Pattern { search, replace } => {
                env.push((ARG_SEARCH, search.as_str().to_string()));
                env.push((ARG_REPLACE, replace.clone()));
            }
        }
        if let Some(ref result_path) = self.result_path {
            env.push((ARG_RESULT, result_path.display().to_string()));
        }
        env.push((ARG_ZFILL, self.zfill.to_string()));
        env.push((ARG_BACKUP_SUFFIX, self.backup_suffix.clone()));
        env.push((ARG_SAVE_MODE, self.save_mode.to_string()));
        env
    }

    /// Decode from the current process environment.
    pub fn from_env() -> Result<Self, JobVarsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Decode from any name lookup. Empty values count as missing.
    ///
    /// The denominator pair takes precedence when both pairs are present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, JobVarsError> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let document = get(ARG_MAYA_FILE).ok_or(JobVarsError::Missing(ARG_MAYA_FILE))?;

        let substitution = match (get(ARG_DENOMINATOR), get(ARG_ROOT)) {
            (Some(denominator), Some(root)) => Substitution::denominator(denominator, root)?,
            (Some(_), None) => return Err(JobVarsError::Missing(ARG_ROOT)),
            (None, Some(_)) => return Err(JobVarsError::Missing(ARG_DENOMINATOR)),
            (None, None) => match (get(ARG_SEARCH), get(ARG_REPLACE)) {
                (Some(search), Some(replace)) => Substitution::pattern(&search, replace)?,
                (Some(_), None) => return Err(JobVarsError::Missing(ARG_REPLACE)),
                (None, Some(_)) => return Err(JobVarsError::Missing(ARG_SEARCH)),
                (None, None) => return Err(JobVarsError::NoSubstitution),
            },
        };

        let mut vars = Self::new(document, substitution);
        vars.result_path = get(ARG_RESULT).map(PathBuf::from);
        if let Some(zfill) = get(ARG_ZFILL) {
            vars.zfill = zfill.parse().map_err(|e: std::num::ParseIntError| JobVarsError::Invalid {
                name: ARG_ZFILL,
                value: zfill.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(suffix) = get(ARG_BACKUP_SUFFIX) {
            vars.backup_suffix = suffix;
        }
        if let Some(mode) = get(ARG_SAVE_MODE) {
            vars.save_mode = mode.parse().map_err(|reason| JobVarsError::Invalid {
                name: ARG_SAVE_MODE,
                value: mode.clone(),
                reason,
            })?;
        }
        Ok(vars)
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
