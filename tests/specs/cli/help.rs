// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_public_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("batch")
        .stdout_has("repath")
        .stdout_lacks("worker");
}

#[test]
fn batch_help_shows_substitution_and_save_flags() {
    cli()
        .args(&["batch", "--help"])
        .passes()
        .stdout_has("--new-root-dir")
        .stdout_has("--search")
        .stdout_has("--save-mode")
        .stdout_has("--jobs")
        .stdout_has("--include-backups");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_command_fails() {
    cli().args(&["frobnicate"]).fails().stderr_has("frobnicate");
}
