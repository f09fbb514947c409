// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! refrepath: re-target file references inside Maya scenes, one isolated
//! child process per document.

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod output;

use clap::{Parser, Subcommand};

use crate::commands::{batch, repath, worker};
use crate::exit_error::ExitError;

#[derive(Parser)]
#[command(name = "refrepath", version, styles = color::styles())]
#[command(about = "Repath file references inside Maya scenes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Repath every scene under a directory, one child process per scene
    Batch(batch::BatchArgs),
    /// Repath a single scene in this process and list the results
    Repath(repath::RepathArgs),
    /// Child entry point: process the scene described by the environment
    #[command(hide = true)]
    Worker(worker::WorkerArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Batch(args) => batch::run(args).await,
        Command::Repath(args) => repath::run(args),
        Command::Worker(args) => worker::run(args),
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => exit.code,
            None => 1,
        };
        eprintln!("error: {err:#}");
        std::process::exit(code);
    }
}
