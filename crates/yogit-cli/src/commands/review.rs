// SPDX-License-Identifier: Apache-2.0

//! `review list` and `review requested`.

use anyhow::Result;
use yogit_core::query::reviews::{ReviewListQuery, ReviewRequestedQuery};
use yogit_core::{Query, QueryEngine};

use super::with_spinner;
use crate::cli::OutputContext;
use crate::output;

/// Lists the reviews given on pull requests still open.
pub async fn run_list(engine: &QueryEngine, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching reviews...",
        Query::new(ReviewListQuery).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}

/// Lists open pull requests awaiting the user's review, or closed ones with `missed`.
pub async fn run_requested(engine: &QueryEngine, missed: bool, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching review requests...",
        Query::new(ReviewRequestedQuery::new(missed)).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}
