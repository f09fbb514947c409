// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `refrepath repath`: repath one scene in this process.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use refrepath_adapters::MayaAsciiHost;
use refrepath_engine::{open_and_repath_references, process_document, SaveSettings};

use super::{absolute_path, SaveArgs, SubstitutionArgs};
use crate::exit_error::ExitError;
use crate::logging::{self, LogConfig};
use crate::output;

#[derive(Args, Debug)]
pub struct RepathArgs {
    /// Maya ASCII scene to repath
    pub file: PathBuf,

    #[command(flatten)]
    pub substitution: SubstitutionArgs,

    #[command(flatten)]
    pub save_options: SaveArgs,

    /// Write the updated scene (otherwise only report what would change)
    #[arg(long)]
    pub save: bool,

    /// Verbose console output
    #[arg(long)]
    pub debug: bool,
}

pub fn run(args: RepathArgs) -> Result<()> {
    let substitution = args.substitution.build(None)?;
    let file = absolute_path(&args.file)?;
    if !file.is_file() {
        return Err(
            ExitError::config(format!("scene does not exist: {}", args.file.display())).into()
        );
    }
    let _guard = logging::init(LogConfig::console(args.debug))?;

    let mut host = MayaAsciiHost::new();
    let outcome = if args.save {
        let settings = SaveSettings::from(args.save_options);
        process_document(&mut host, &file, &substitution, &settings)?
    } else {
        open_and_repath_references(&mut host, &file, &substitution)?
    };

    print!("{}", output::format_session(&args.file, &outcome));
    Ok(())
}
