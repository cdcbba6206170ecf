// SPDX-License-Identifier: Apache-2.0

//! Branches authored by the viewer across the repositories they contribute to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Context, PageInfo, QuerySpec, Source, array_at, nodes, parse_at};
use crate::Result;
use crate::statements::BRANCH_LIST_STATEMENT;

const CONNECTION: &str = "/data/viewer/repositoriesContributedTo";

/// One branch whose head commit was authored with one of the viewer's emails.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BranchRow {
    /// Repository URL.
    pub repository: String,
    /// Branch name.
    pub branch: String,
    /// Pull requests opened from the branch, sorted.
    pub pull_requests: Vec<String>,
}

#[derive(Deserialize)]
struct Author {
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct Target {
    author: Option<Author>,
}

#[derive(Deserialize)]
struct AssociatedPullRequest {
    url: String,
}

#[derive(Deserialize)]
struct RefNode {
    name: String,
    #[serde(default)]
    target: Option<Target>,
    #[serde(rename = "associatedPullRequests")]
    associated_pull_requests: Value,
}

impl RefNode {
    fn author_email(&self) -> Option<&str> {
        self.target.as_ref()?.author.as_ref()?.email.as_deref()
    }
}

/// Branches of the viewer, or with `dangling` only those without pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchListQuery {
    dangling: bool,
}

impl BranchListQuery {
    /// Creates the query; `dangling` keeps branches without pull request only.
    #[must_use]
    pub fn new(dangling: bool) -> Self {
        Self { dangling }
    }
}

impl QuerySpec for BranchListQuery {
    type Row = BranchRow;

    fn source(&self) -> Source {
        Source::GraphQl(BRANCH_LIST_STATEMENT)
    }

    fn page_size(&self) -> Option<u32> {
        Some(10)
    }

    fn extract(
        &self,
        response: &Value,
        ctx: &Context<'_>,
        rows: &mut Vec<BranchRow>,
    ) -> Result<()> {
        let emails = ctx.settings.emails();
        for repository in array_at(response, &format!("{CONNECTION}/edges"))? {
            let url: String = parse_at(repository, "/node/url")?;
            for branch in nodes::<RefNode>(repository, "/node/refs/edges")? {
                let mine = branch
                    .author_email()
                    .is_some_and(|email| emails.iter().any(|e| e == email));
                if !mine {
                    continue;
                }

                let mut pull_requests: Vec<String> =
                    nodes::<AssociatedPullRequest>(&branch.associated_pull_requests, "/edges")?
                        .into_iter()
                        .map(|pr| pr.url)
                        .collect();
                if self.dangling && !pull_requests.is_empty() {
                    continue;
                }
                pull_requests.sort();

                rows.push(BranchRow {
                    repository: url.clone(),
                    branch: branch.name,
                    pull_requests,
                });
            }
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(response, &format!("{CONNECTION}/pageInfo"))
    }

    fn sort(&self, rows: &mut [BranchRow]) {
        rows.sort_by(|a, b| {
            a.repository
                .cmp(&b.repository)
                .then_with(|| a.branch.cmp(&b.branch))
        });
    }

    fn headers(&self) -> Vec<&'static str> {
        if self.dangling {
            vec!["REPO", "BRANCH"]
        } else {
            vec!["REPO", "BRANCH", "PULL REQUEST"]
        }
    }

    fn cells(&self, row: &BranchRow) -> Vec<String> {
        vec![
            row.repository.clone(),
            row.branch.clone(),
            row.pull_requests.join("\n"),
        ]
    }

    fn empty_message(&self) -> &'static str {
        if self.dangling {
            "Everything is clean 👏"
        } else {
            "Nothing... 😿 Time to push hard 💪"
        }
    }
}
