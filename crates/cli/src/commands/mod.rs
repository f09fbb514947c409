// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod batch;
pub mod repath;
pub mod worker;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use refrepath_core::{SaveMode, Substitution, DEFAULT_BACKUP_SUFFIX, DEFAULT_ZFILL};
use refrepath_engine::SaveSettings;

use crate::exit_error::ExitError;

/// How a reference's new location is computed.
#[derive(Args, Debug, Clone, Default)]
pub struct SubstitutionArgs {
    /// New root directory that references are re-rooted under (batch default: the scanned root)
    #[arg(long, value_name = "DIR", conflicts_with = "search")]
    pub new_root_dir: Option<PathBuf>,

    /// Path fragment shared by old and new locations (default: last component of --new-root-dir)
    #[arg(long, value_name = "FRAGMENT", conflicts_with = "search")]
    pub denominator: Option<String>,

    /// Regex matched against each reference path
    #[arg(long, value_name = "REGEX", requires = "replace")]
    pub search: Option<String>,

    /// Literal text replacing the leftmost --search match
    #[arg(long, value_name = "TEXT", requires = "search")]
    pub replace: Option<String>,
}

impl SubstitutionArgs {
    /// Build the substitution rule; configuration errors exit with code 2.
    ///
    /// `default_root` stands in for a missing `--new-root-dir`. A relative
    /// root is resolved against the working directory.
    pub fn build(&self, default_root: Option<&Path>) -> Result<Substitution> {
        let new_root = match self.new_root_dir.as_deref().or(default_root) {
            Some(root) => Some(absolute_path(root)?),
            None => None,
        };
        let substitution = match (new_root.as_deref(), &self.search, &self.replace) {
            (_, Some(search), Some(replace)) => Substitution::pattern(search, replace.clone()),
            (Some(root), _, _) => {
                let denominator = match &self.denominator {
                    Some(d) => d.clone(),
                    None => default_denominator(root)?,
                };
                Substitution::denominator(denominator, root)
            }
            _ => {
                return Err(ExitError::config(
                    "either --new-root-dir or --search/--replace is required",
                )
                .into())
            }
        };
        substitution.map_err(|e| ExitError::config(e).into())
    }
}

/// `path` made absolute against the working directory, without touching the
/// filesystem.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        ExitError::config(format!("cannot resolve {}: {e}", path.display())).into()
    })
}

fn default_denominator(root: &Path) -> Result<String> {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ExitError::config(format!(
                "cannot derive a denominator from {}, pass --denominator",
                root.display()
            ))
            .into()
        })
}

/// How updated scenes are written back.
#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// `backup` saves in place after copying the original; `increment` saves a new numbered file
    #[arg(long, value_name = "MODE", default_value_t = SaveMode::Backup)]
    pub save_mode: SaveMode,

    /// Digits in backup and increment numbers
    #[arg(long, value_name = "N", default_value_t = DEFAULT_ZFILL)]
    pub zfill: usize,

    /// Marker inserted before the backup number
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_BACKUP_SUFFIX)]
    pub backup_suffix: String,
}

impl From<SaveArgs> for SaveSettings {
    fn from(args: SaveArgs) -> Self {
        SaveSettings { mode: args.save_mode, backup_suffix: args.backup_suffix, zfill: args.zfill }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
