// SPDX-License-Identifier: Apache-2.0

//! Organization commands: `orga list`, `orga member list|pickone`, `orga pr list`.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::ProgressBar;
use yogit_core::query::organizations::{
    Member, OrganizationListQuery, OrganizationMemberListQuery, resolve_organization,
};
use yogit_core::query::pulls::OrgaPullRequestListQuery;
use yogit_core::{Query, QueryEngine, YogitError};

use super::{maybe_spinner, with_spinner};
use crate::cli::OutputContext;
use crate::output;

const ROLLS: usize = 20;
const ROLL_DELAY: Duration = Duration::from_millis(250);

pub async fn run_list(engine: &QueryEngine, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching organizations...",
        Query::new(OrganizationListQuery).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}

/// Resolves `--orga` against the organizations the user belongs to.
async fn organization(engine: &QueryEngine, requested: Option<&str>) -> Result<String> {
    let known: Vec<String> = Query::new(OrganizationListQuery)
        .execute(engine)
        .await?
        .into_data()
        .into_iter()
        .map(|orga| orga.login)
        .collect();
    Ok(resolve_organization(&known, requested)?)
}

async fn members(
    engine: &QueryEngine,
    requested: Option<&str>,
) -> Result<Query<OrganizationMemberListQuery>> {
    let orga = organization(engine, requested).await?;
    Ok(Query::new(OrganizationMemberListQuery::new(orga))
        .execute(engine)
        .await?)
}

/// Lists the members of an organization.
pub async fn run_member_list(
    engine: &QueryEngine,
    orga: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let query = with_spinner(ctx, "Fetching members...", members(engine, orga)).await?;
    output::render_query(&query, ctx)
}

/// Picks one member of an organization at random.
///
/// On a terminal the pick is preceded by a short roll through random names.
pub async fn run_pickone(
    engine: &QueryEngine,
    orga: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let query = with_spinner(ctx, "Fetching members...", members(engine, orga)).await?;
    let candidates = query.data();
    if candidates.is_empty() {
        return Err(YogitError::invalid("No member found 😿").into());
    }

    output::note(
        style(format!(
            "Picking one out of {} members... ({:.2}%) 🎲",
            candidates.len(),
            odds(candidates.len())
        ))
        .bold(),
        ctx,
    );

    if let Some(spinner) = maybe_spinner(ctx, "") {
        roll(&spinner, candidates).await;
        spinner.finish_and_clear();
    }

    let winner = &candidates[fastrand::usize(..candidates.len())];
    output::render(
        winner,
        || {
            style(format!("The winner is \"{}\" 🤠", winner.login))
                .bold()
                .to_string()
        },
        ctx,
    )
}

async fn roll(spinner: &ProgressBar, candidates: &[Member]) {
    for _ in 0..ROLLS {
        let shown = &candidates[fastrand::usize(..candidates.len())];
        spinner.set_message(shown.login.clone());
        tokio::time::sleep(ROLL_DELAY).await;
    }
}

/// Chance of each member, in percent.
#[allow(clippy::cast_precision_loss)]
fn odds(count: usize) -> f64 {
    100.0 / count as f64
}

/// Lists the open pull requests of an organization, optionally filtered by labels.
pub async fn run_pr_list(
    engine: &QueryEngine,
    orga: Option<&str>,
    labels: Vec<String>,
    ctx: &OutputContext,
) -> Result<()> {
    let query = with_spinner(ctx, "Fetching pull requests...", async {
        let orga = organization(engine, orga).await?;
        Ok::<_, anyhow::Error>(
            Query::new(OrgaPullRequestListQuery::new(orga, labels))
                .execute(engine)
                .await?,
        )
    })
    .await?;
    output::render_query(&query, ctx)
}
