// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the yogit CLI.
//!
//! Uses `tracing` with `tracing-subscriber`, writing to stderr so that
//! stdout only carries command output. `RUST_LOG` takes precedence over
//! the defaults below.
//!
//! # Examples
//!
//! ```bash
//! # Request and response bodies
//! RUST_LOG=yogit_core=debug yogit pr list
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "yogit=warn,yogit_core=warn,reqwest=error";
const VERBOSE_FILTER: &str = "yogit=debug,yogit_core=debug,reqwest=warn";

/// Initialize the logging subsystem.
///
/// `verbose` (the `-v` flag) raises the default level to debug.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
