// SPDX-License-Identifier: Apache-2.0

//! Pull request listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Context, PageInfo, QuerySpec, Source, nodes, parse_at};
use crate::Result;
use crate::statements::{ORGA_PULL_REQUEST_LIST_STATEMENT, PULL_REQUEST_LIST_STATEMENT};
use crate::utils::{TITLE_BUDGET, days_ago_str, parse_timestamp, shorten};

/// One pull request.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestRow {
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Creation day relative to now ("Today", "3 days ago"...).
    pub created: String,
    /// Repository `owner/name`, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Pull request URL.
    pub url: String,
    /// Full title.
    pub title: String,
    /// Label names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Newest day first, then URL.
fn sort_by_creation(rows: &mut [PullRequestRow]) {
    rows.sort_by(|a, b| {
        b.created_at
            .date_naive()
            .cmp(&a.created_at.date_naive())
            .then_with(|| a.url.cmp(&b.url))
    });
}

#[derive(Deserialize)]
struct PullRequestNode {
    #[serde(rename = "createdAt")]
    created_at: String,
    url: String,
    title: String,
}

/// Open pull requests of the viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PullRequestListQuery;

impl QuerySpec for PullRequestListQuery {
    type Row = PullRequestRow;

    fn source(&self) -> Source {
        Source::GraphQl(PULL_REQUEST_LIST_STATEMENT)
    }

    fn extract(
        &self,
        response: &Value,
        ctx: &Context<'_>,
        rows: &mut Vec<PullRequestRow>,
    ) -> Result<()> {
        for node in nodes::<PullRequestNode>(response, "/data/viewer/pullRequests/edges")? {
            let created_at = parse_timestamp(&node.created_at)?;
            rows.push(PullRequestRow {
                created_at,
                created: days_ago_str(created_at.date_naive(), ctx.now),
                repository: None,
                url: node.url,
                title: node.title,
                labels: Vec::new(),
            });
        }
        Ok(())
    }

    fn sort(&self, rows: &mut [PullRequestRow]) {
        sort_by_creation(rows);
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["CREATED", "URL", "TITLE"]
    }

    fn cells(&self, row: &PullRequestRow) -> Vec<String> {
        vec![
            row.created.clone(),
            row.url.clone(),
            shorten(&row.title, TITLE_BUDGET),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "All done! 🎉✨"
    }
}

#[derive(Deserialize)]
struct Repository {
    #[serde(rename = "nameWithOwner")]
    name_with_owner: String,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

#[derive(Deserialize)]
struct Labels {
    edges: Vec<LabelEdge>,
}

#[derive(Deserialize)]
struct LabelEdge {
    node: Label,
}

#[derive(Deserialize)]
struct OrgaPullRequestNode {
    repository: Repository,
    #[serde(rename = "createdAt")]
    created_at: String,
    url: String,
    title: String,
    labels: Labels,
}

/// Open pull requests of an organization, optionally restricted to labels.
///
/// The organization is bound as a GraphQL variable, never spliced into the
/// statement. Labels match case-insensitively; a pull request is kept when
/// it carries any of the requested labels.
#[derive(Debug, Clone)]
pub struct OrgaPullRequestListQuery {
    organization: String,
    labels: Vec<String>,
}

impl OrgaPullRequestListQuery {
    /// Creates the query for `organization`, filtered by `labels` when not empty.
    pub fn new(organization: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            organization: organization.into(),
            labels: labels.iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    /// Search string sent as the `$search` variable.
    #[must_use]
    pub fn search(&self) -> String {
        format!("is:open is:pr archived:false user:{}", self.organization)
    }

    fn wanted(&self, labels: &[String]) -> bool {
        self.labels.is_empty()
            || labels
                .iter()
                .any(|label| self.labels.contains(&label.to_lowercase()))
    }
}

impl QuerySpec for OrgaPullRequestListQuery {
    type Row = PullRequestRow;

    fn source(&self) -> Source {
        Source::GraphQl(ORGA_PULL_REQUEST_LIST_STATEMENT)
    }

    fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("search".to_string(), Value::String(self.search()));
        variables
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(
        &self,
        response: &Value,
        ctx: &Context<'_>,
        rows: &mut Vec<PullRequestRow>,
    ) -> Result<()> {
        for node in nodes::<OrgaPullRequestNode>(response, "/data/search/edges")? {
            let labels: Vec<String> = node.labels.edges.into_iter().map(|e| e.node.name).collect();
            if !self.wanted(&labels) {
                continue;
            }
            let created_at = parse_timestamp(&node.created_at)?;
            rows.push(PullRequestRow {
                created_at,
                created: days_ago_str(created_at.date_naive(), ctx.now),
                repository: Some(node.repository.name_with_owner),
                url: node.url,
                title: node.title,
                labels,
            });
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(response, "/data/search/pageInfo")
    }

    fn sort(&self, rows: &mut [PullRequestRow]) {
        sort_by_creation(rows);
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["CREATED", "REPO", "PULL REQUEST", "TITLE"]
    }

    fn cells(&self, row: &PullRequestRow) -> Vec<String> {
        vec![
            row.created.clone(),
            row.repository.clone().unwrap_or_default(),
            row.url.clone(),
            shorten(&row.title, TITLE_BUDGET),
        ]
    }
}
