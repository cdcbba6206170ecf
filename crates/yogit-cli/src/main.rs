// SPDX-License-Identifier: Apache-2.0

//! yogit - GitHub activity reports from the command line.
//!
//! Lists pull requests, reviews, branches and contributions of the
//! configured GitHub account, and builds the daily SCRUM report.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use yogit_core::load_config;

use crate::cli::{Cli, OutputContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ctx = OutputContext::from_cli(cli.output, cli.quiet);

    let result = async {
        let config = load_config().context("Failed to load configuration")?;
        debug!(?config, "Configuration loaded");
        commands::run(cli.command, ctx, &config).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", errors::format_error(&e));
            ExitCode::FAILURE
        }
    }
}
