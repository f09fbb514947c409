// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the external collaborators of the repathing engine:
//! the host document service and the child-process launcher.

pub mod host;
pub mod launcher;

pub use host::{DocumentHost, HostError, MayaAsciiHost};
pub use launcher::{JobLauncher, LaunchError, LaunchOutput, LaunchSpec, ProcessLauncher};

#[cfg(any(test, feature = "test-support"))]
pub use host::{FakeHost, HostCall};
#[cfg(any(test, feature = "test-support"))]
pub use launcher::{FakeLaunch, FakeLauncher};
