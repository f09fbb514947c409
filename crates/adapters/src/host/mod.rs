// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host document service boundary.
//!
//! A host holds at most one open document at a time. Opening a new document
//! replaces the current one.

mod maya_ascii;

#[cfg(any(test, feature = "test-support"))]
mod fake;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use maya_ascii::MayaAsciiHost;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHost, HostCall};

/// Errors from host document operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no document is open")]
    NoDocument,

    #[error("unsupported document type: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("cannot open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("unknown reference node <{node}>")]
    UnknownReference { node: String },

    #[error("cannot retrieve reference file path on <{node}>")]
    NoPath { node: String },

    #[error("host rejected re-targeting <{node}>: {reason}")]
    Rejected { node: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Capability set the repathing session needs from a scene host.
pub trait DocumentHost {
    /// Open `path` as the current document without loading its references.
    fn open(&mut self, path: &Path) -> Result<(), HostError>;

    /// Path of the current document, if one is open.
    fn scene_path(&self) -> Option<&Path>;

    /// Raw reference node enumeration, sentinels included, in host order.
    fn list_references(&self) -> Vec<String>;

    /// Current file path of a reference node, without copy number.
    fn reference_path(&self, node: &str) -> Result<PathBuf, HostError>;

    /// Point a reference node at `new_path` without loading it.
    fn retarget(&mut self, node: &str, new_path: &Path) -> Result<(), HostError>;

    /// Change the path the current document will be saved to.
    fn rename(&mut self, path: &Path) -> Result<(), HostError>;

    /// Write the current document to its path and return that path.
    fn save(&mut self) -> Result<PathBuf, HostError>;
}
