//! SimHelper - manage iOS simulators from the command line
//!
//! This is the binary entry point. All logic lives in the library.

use std::process::ExitCode;

use clap::Parser;
use simhelper::cli::Args;
use simhelper_core::logging;
use simhelper_core::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;

    let args = Args::parse();
    logging::init(&args.log_config())?;

    let outcome = simhelper::run(args).await?;
    Ok(outcome.into())
}
