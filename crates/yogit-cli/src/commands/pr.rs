// SPDX-License-Identifier: Apache-2.0

//! `pr list`.

use anyhow::Result;
use yogit_core::query::pulls::PullRequestListQuery;
use yogit_core::{Query, QueryEngine};

use super::with_spinner;
use crate::cli::OutputContext;
use crate::output;

pub async fn run_list(engine: &QueryEngine, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching pull requests...",
        Query::new(PullRequestListQuery).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}
