// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path substitution rules used to compute a reference's new location.
//!
//! Two modes are supported:
//! - **Denominator**: the current path is split on the first occurrence of a
//!   common fragment and the remainder is re-rooted under a new directory.
//! - **Pattern**: the leftmost match of a regex in the path text is replaced
//!   with a literal string.

use regex::{NoExpand, Regex};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("common denominator must not be empty")]
    EmptyDenominator,

    #[error("invalid search pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("common denominator `{denominator}` not found in {}", path.display())]
    DenominatorNotFound { denominator: String, path: PathBuf },

    #[error("search pattern `{pattern}` does not match {}", path.display())]
    PatternNotFound { pattern: String, path: PathBuf },

    #[error("new path computed doesn't exist on disk: {}", path.display())]
    NotFound { path: PathBuf },
}

/// Rule turning a reference's current path into its new path.
#[derive(Debug, Clone)]
pub enum Substitution {
    Denominator { common_denominator: String, root_substitute: PathBuf },
    Pattern { search: Regex, replace: String },
}

impl Substitution {
    pub fn denominator(
        common_denominator: impl Into<String>,
        root_substitute: impl Into<PathBuf>,
    ) -> Result<Self, SubstitutionError> {
        let common_denominator = common_denominator.into();
        if common_denominator.is_empty() {
            return Err(SubstitutionError::EmptyDenominator);
        }
        Ok(Self::Denominator { common_denominator, root_substitute: root_substitute.into() })
    }

    pub fn pattern(search: &str, replace: impl Into<String>) -> Result<Self, SubstitutionError> {
        let search = Regex::new(search).map_err(|source| SubstitutionError::InvalidPattern {
            pattern: search.to_string(),
            source,
        })?;
        Ok(Self::Pattern { search, replace: replace.into() })
    }

    /// The path spliced into every reference (root or replacement target).
    pub fn replacement_path(&self) -> &Path {
        match self {
            Self::Denominator { root_substitute, .. } => root_substitute,
            Self::Pattern { replace, .. } => Path::new(replace),
        }
    }

    /// Compute the new path without touching the filesystem.
    pub fn compute_new_path(&self, current_path: &Path) -> Result<PathBuf, SubstitutionError> {
        let current = current_path.to_string_lossy();
        match self {
            Self::Denominator { common_denominator, root_substitute } => {
                let (_, remainder) = current.split_once(common_denominator.as_str()).ok_or_else(
                    || SubstitutionError::DenominatorNotFound {
                        denominator: common_denominator.clone(),
                        path: current_path.to_path_buf(),
                    },
                )?;
                let remainder = remainder.strip_prefix(is_separator).unwrap_or(remainder);

                let mut new_path = root_substitute.clone();
                for component in remainder.split(is_separator).filter(|c| !c.is_empty()) {
                    new_path.push(component);
                }
                Ok(new_path)
            }
            Self::Pattern { search, replace } => {
                if !search.is_match(&current) {
                    return Err(SubstitutionError::PatternNotFound {
                        pattern: search.as_str().to_string(),
                        path: current_path.to_path_buf(),
                    });
                }
                let replaced = search.replace(&current, NoExpand(replace));
                Ok(PathBuf::from(replaced.into_owned()))
            }
        }
    }

    /// Compute the new path and require it to exist on disk.
    pub fn substitute(&self, current_path: &Path) -> Result<PathBuf, SubstitutionError> {
        let new_path = self.compute_new_path(current_path)?;
        if !new_path.exists() {
            return Err(SubstitutionError::NotFound { path: new_path });
        }
        Ok(new_path)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denominator { common_denominator, root_substitute } => write!(
                f,
                "denominator `{}` -> {}",
                common_denominator,
                root_substitute.display()
            ),
            Self::Pattern { search, replace } => {
                write!(f, "pattern `{}` -> {}", search.as_str(), replace)
            }
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(test)]
#[path = "substitution_tests.rs"]
mod tests;
