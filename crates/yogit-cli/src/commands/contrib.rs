// SPDX-License-Identifier: Apache-2.0

//! `contrib list` and `contrib stats`.

use anyhow::Result;
use console::style;
use yogit_core::query::contributions::{
    ContributionList, ContributionStatsQuery, ContributionWindow,
};
use yogit_core::utils::today_str;
use yogit_core::{Query, QueryEngine};

use super::with_spinner;
use crate::cli::OutputContext;
use crate::output;

/// Lists opened pull requests and reviews between two days, both defaulting to today.
pub async fn run_list(
    engine: &QueryEngine,
    from: Option<&str>,
    to: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let today = today_str(engine.clock().now());
    let window = ContributionWindow::parse(from.unwrap_or(&today), to.unwrap_or(&today))?;

    let list = with_spinner(
        ctx,
        "Fetching contributions...",
        ContributionList::execute(window, engine),
    )
    .await?;

    output::render(
        &list.data(),
        || format!("{}\n{}", style(list.title()).bold(), list.tabulate()),
        ctx,
    )
}

pub async fn run_stats(engine: &QueryEngine, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching statistics...",
        Query::new(ContributionStatsQuery).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}
