// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Repathing engine: the per-document session run inside a worker, and the
//! batch orchestrator that fans documents out to isolated child processes.

pub mod discovery;
pub mod job;
pub mod orchestrator;
pub mod result_channel;
pub mod save;
pub mod session;
pub mod worker;

pub use discovery::get_references;
pub use job::{HostProgram, JobDescriptor, SaveSettings};
pub use orchestrator::{
    discover_documents, run_batch, BatchConfig, BatchSummary, ConfigError, DocumentOutcome,
    JobStatus,
};
pub use result_channel::{collect_result, scrape, JobResult, ResultSource, ScrapedResult};
pub use save::{save_scene_and_backup, save_scene_increment, SaveError, SaveOutcome};
pub use session::{
    open_and_repath_references, process_document, repath_reference, SessionError, SessionOutcome,
};
pub use worker::process_session;
