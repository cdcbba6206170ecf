// SPDX-License-Identifier: Apache-2.0

//! `branch list`.

use anyhow::Result;
use yogit_core::query::branches::BranchListQuery;
use yogit_core::{Query, QueryEngine};

use super::with_spinner;
use crate::cli::OutputContext;
use crate::output;

/// Lists the branches the user pushed, optionally only those without pull request.
pub async fn run_list(engine: &QueryEngine, dangling: bool, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching branches...",
        Query::new(BranchListQuery::new(dangling)).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}
