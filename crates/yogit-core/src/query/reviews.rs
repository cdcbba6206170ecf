// SPDX-License-Identifier: Apache-2.0

//! Review queries: reviews given by the viewer and reviews requested from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Context, PageInfo, QuerySpec, Source, array_at, at, nodes, parse_at};
use crate::Result;
use crate::statements::{REVIEW_LIST_STATEMENT, REVIEW_REQUESTED_STATEMENT, STATE};
use crate::utils::{TITLE_BUDGET, days_ago_str, parse_timestamp, shorten};

/// Suffix flagging a review older than the last pushed commit.
pub const NEW_COMMITS_SUFFIX: &str = " (new commits)";

/// One review of an open pull request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    /// Last update of the review, creation when never updated.
    pub updated_at: DateTime<Utc>,
    /// `updated_at` relative to now.
    pub updated: String,
    /// Reviewed pull request.
    pub url: String,
    /// Review state, e.g. `APPROVED`, suffixed when commits were pushed since.
    pub state: String,
}

#[derive(Deserialize)]
struct Review {
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(rename = "updatedAt")]
    updated_at: Option<String>,
    state: String,
}

#[derive(Deserialize)]
struct PushedCommit {
    #[serde(rename = "pushedDate")]
    pushed_date: Option<String>,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: PushedCommit,
}

/// Reviews authored by the viewer on pull requests still open.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewListQuery;

impl ReviewListQuery {
    fn row(node: &Value, ctx: &Context<'_>) -> Result<ReviewRow> {
        let review: Review = parse_at(node, "/pullRequestReview")?;
        let url: String = parse_at(node, "/pullRequest/url")?;
        let updated_at =
            parse_timestamp(review.updated_at.as_deref().unwrap_or(&review.created_at))?;

        let commits: Vec<CommitNode> = nodes(node, "/pullRequest/commits/edges")?;
        let pushed_at = match commits.last().and_then(|c| c.commit.pushed_date.as_deref()) {
            Some(pushed) => Some(parse_timestamp(pushed)?),
            None => None,
        };

        let mut state = review.state;
        if pushed_at.is_some_and(|pushed| updated_at < pushed) {
            state.push_str(NEW_COMMITS_SUFFIX);
        }

        Ok(ReviewRow {
            updated_at,
            updated: days_ago_str(updated_at.date_naive(), ctx.now),
            url,
            state,
        })
    }
}

impl QuerySpec for ReviewListQuery {
    type Row = ReviewRow;

    fn source(&self) -> Source {
        Source::GraphQl(REVIEW_LIST_STATEMENT)
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(
        &self,
        response: &Value,
        ctx: &Context<'_>,
        rows: &mut Vec<ReviewRow>,
    ) -> Result<()> {
        let edges = array_at(
            response,
            "/data/viewer/contributionsCollection/pullRequestReviewContributions/edges",
        )?;
        for edge in edges {
            let node = at(edge, "/node")?;
            // Closed and merged pull requests come without review details.
            if node.pointer("/pullRequest/state").and_then(Value::as_str) != Some("OPEN") {
                continue;
            }
            rows.push(Self::row(node, ctx)?);
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(
            response,
            "/data/viewer/contributionsCollection/pullRequestReviewContributions/pageInfo",
        )
    }

    fn sort(&self, rows: &mut [ReviewRow]) {
        rows.sort_by(|a, b| {
            b.updated_at
                .date_naive()
                .cmp(&a.updated_at.date_naive())
                .then_with(|| a.url.cmp(&b.url))
        });
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["UPDATED", "PULL REQUEST", "STATE"]
    }

    fn cells(&self, row: &ReviewRow) -> Vec<String> {
        vec![row.updated.clone(), row.url.clone(), row.state.clone()]
    }
}

/// One pull request waiting for the viewer's review.
#[derive(Debug, Clone, Serialize)]
pub struct RequestedReviewRow {
    /// Last update of the pull request.
    pub updated_at: DateTime<Utc>,
    /// `updated_at` relative to now.
    pub updated: String,
    /// Pull request URL.
    pub url: String,
    /// Full title.
    pub title: String,
}

#[derive(Deserialize)]
struct RequestedNode {
    #[serde(rename = "updatedAt")]
    updated_at: String,
    url: String,
    title: String,
}

/// Pull requests requesting a review from the viewer.
///
/// With `missed`, closed pull requests the viewer never reviewed are listed
/// instead of open ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewRequestedQuery {
    missed: bool,
}

impl ReviewRequestedQuery {
    /// Creates the query; `missed` selects closed pull requests.
    #[must_use]
    pub fn new(missed: bool) -> Self {
        Self { missed }
    }
}

impl QuerySpec for ReviewRequestedQuery {
    type Row = RequestedReviewRow;

    fn source(&self) -> Source {
        Source::GraphQl(REVIEW_REQUESTED_STATEMENT)
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        let state = if self.missed { "closed" } else { "open" };
        BTreeMap::from([(STATE.to_string(), state.to_string())])
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(
        &self,
        response: &Value,
        ctx: &Context<'_>,
        rows: &mut Vec<RequestedReviewRow>,
    ) -> Result<()> {
        for node in nodes::<RequestedNode>(response, "/data/search/edges")? {
            let updated_at = parse_timestamp(&node.updated_at)?;
            rows.push(RequestedReviewRow {
                updated_at,
                updated: days_ago_str(updated_at.date_naive(), ctx.now),
                url: node.url,
                title: node.title,
            });
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(response, "/data/search/pageInfo")
    }

    fn sort(&self, rows: &mut [RequestedReviewRow]) {
        rows.sort_by(|a, b| {
            b.updated_at
                .date_naive()
                .cmp(&a.updated_at.date_naive())
                .then_with(|| a.url.cmp(&b.url))
        });
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["UPDATED", "PULL REQUEST", "TITLE"]
    }

    fn cells(&self, row: &RequestedReviewRow) -> Vec<String> {
        vec![
            row.updated.clone(),
            row.url.clone(),
            shorten(&row.title, TITLE_BUDGET),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "All done! 🎉✨"
    }
}
