// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured job report written by a worker for its parent.

use crate::reference::RepathedReference;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a modified document is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Copy the on-disk file to a numbered backup, then save in place.
    #[default]
    Backup,
    /// Save under the next numbered increment, leaving the original untouched.
    Increment,
}

impl SaveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveMode::Backup => "backup",
            SaveMode::Increment => "increment",
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backup" => Ok(SaveMode::Backup),
            "increment" => Ok(SaveMode::Increment),
            other => Err(format!("unknown save mode: {other}")),
        }
    }
}

/// Result of processing one document, as seen by the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub document: PathBuf,
    /// Number of real (non-sentinel) references found in the document.
    pub references_found: usize,
    pub repathed: Vec<RepathedReference>,
    #[serde(default)]
    pub saved_to: Option<PathBuf>,
    #[serde(default)]
    pub backup: Option<PathBuf>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl JobReport {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self { document: document.into(), ..Default::default() }
    }

    pub fn updated_count(&self) -> usize {
        self.repathed.iter().filter(|r| r.was_updated()).count()
    }

    /// Write the report atomically (temp file + rename).
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())?;
        std::fs::rename(&tmp_path, path)
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
