// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! refrepath-core: data model and pure path logic for reference repathing

pub mod increment;
pub mod reference;
pub mod report;
pub mod substitution;
pub mod vars;

pub use increment::{
    backup_base, increment_path, reserve_increment_path, IncrementError,
    DEFAULT_BACKUP_SUFFIX, DEFAULT_ZFILL,
};
pub use reference::{RepathedReference, SentinelKind};
pub use report::{JobReport, SaveMode};
pub use substitution::{Substitution, SubstitutionError};
pub use vars::{JobVars, JobVarsError};
