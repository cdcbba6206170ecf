// SPDX-License-Identifier: Apache-2.0

//! Output rendering: human text or structured JSON/YAML on stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use yogit_core::{Query, QuerySpec};

use crate::cli::{OutputContext, OutputFormat};

/// Prints `data` in the requested format; `text` builds the human form.
pub fn render<T, F>(data: &T, text: F, ctx: &OutputContext) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match ctx.format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_saphyr::to_string(data).context("Failed to serialize to YAML")?;
            print!("{yaml}");
        }
    }
    Ok(())
}

/// Prints an executed query: its display form, or its rows.
pub fn render_query<S: QuerySpec>(query: &Query<S>, ctx: &OutputContext) -> Result<()> {
    render(&query.data(), || query.tabulate(), ctx)
}

/// Prints a message for humans only; structured formats stay parseable.
pub fn note(message: impl std::fmt::Display, ctx: &OutputContext) {
    if ctx.is_text() {
        println!("{message}");
    }
}
