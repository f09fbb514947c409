// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory document host for tests.

use std::path::{Path, PathBuf};

use super::{DocumentHost, HostError};

/// Recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Open(PathBuf),
    Retarget { node: String, path: PathBuf },
    Rename(PathBuf),
    Save(PathBuf),
}

#[derive(Debug, Clone)]
struct FakeReference {
    node: String,
    path: Option<PathBuf>,
    rejects_retarget: bool,
}

/// Fake host with scripted references.
///
/// `save` writes one `node path` line per reference to the scene path so
/// tests can tell saved content from the original file.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    references: Vec<FakeReference>,
    scene: Option<PathBuf>,
    fail_open: bool,
    calls: Vec<HostCall>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, node: &str, path: impl Into<PathBuf>) -> Self {
        self.references.push(FakeReference {
            node: node.to_string(),
            path: Some(path.into()),
            rejects_retarget: false,
        });
        self
    }

    /// A node whose path cannot be queried.
    pub fn with_unreadable_reference(mut self, node: &str) -> Self {
        self.references.push(FakeReference {
            node: node.to_string(),
            path: None,
            rejects_retarget: false,
        });
        self
    }

    /// A node whose re-target call is rejected.
    pub fn with_locked_reference(mut self, node: &str, path: impl Into<PathBuf>) -> Self {
        self.references.push(FakeReference {
            node: node.to_string(),
            path: Some(path.into()),
            rejects_retarget: true,
        });
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn retarget_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HostCall::Retarget { .. })).count()
    }

    pub fn saved(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, HostCall::Save(_)))
    }

    fn render(&self) -> String {
        self.references
            .iter()
            .map(|r| {
                let path = r.path.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
                format!("{} {}\n", r.node, path)
            })
            .collect()
    }
}

impl DocumentHost for FakeHost {
    fn open(&mut self, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::Open(path.to_path_buf()));
        if self.fail_open {
            return Err(HostError::Open {
                path: path.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        self.scene = Some(path.to_path_buf());
        Ok(())
    }

    fn scene_path(&self) -> Option<&Path> {
        self.scene.as_deref()
    }

    fn list_references(&self) -> Vec<String> {
        if self.scene.is_none() {
            return Vec::new();
        }
        self.references.iter().map(|r| r.node.clone()).collect()
    }

    fn reference_path(&self, node: &str) -> Result<PathBuf, HostError> {
        let reference = self
            .references
            .iter()
            .find(|r| r.node == node)
            .ok_or_else(|| HostError::UnknownReference { node: node.to_string() })?;
        reference.path.clone().ok_or_else(|| HostError::NoPath { node: node.to_string() })
    }

    fn retarget(&mut self, node: &str, new_path: &Path) -> Result<(), HostError> {
        self.calls
            .push(HostCall::Retarget { node: node.to_string(), path: new_path.to_path_buf() });
        let reference = self
            .references
            .iter_mut()
            .find(|r| r.node == node)
            .ok_or_else(|| HostError::UnknownReference { node: node.to_string() })?;
        if reference.rejects_retarget {
            return Err(HostError::Rejected {
                node: node.to_string(),
                reason: "reference is locked".to_string(),
            });
        }
        reference.path = Some(new_path.to_path_buf());
        Ok(())
    }

    fn rename(&mut self, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::Rename(path.to_path_buf()));
        if self.scene.is_none() {
            return Err(HostError::NoDocument);
        }
        self.scene = Some(path.to_path_buf());
        Ok(())
    }

    fn save(&mut self) -> Result<PathBuf, HostError> {
        let path = self.scene.clone().ok_or(HostError::NoDocument)?;
        self.calls.push(HostCall::Save(path.clone()));
        std::fs::write(&path, self.render())
            .map_err(|source| HostError::Io { path: path.clone(), source })?;
        Ok(path)
    }
}
