// SPDX-License-Identifier: Apache-2.0

//! Catalogue of GitHub GraphQL statements.
//!
//! Statements are immutable templates. `$name` placeholders listed in
//! [`Statement::tokens`] are filled by [`crate::statement::prepare`]; the
//! pagination placeholders [`OFFSET`] and [`AFTER`] are filled later by
//! [`crate::statement::prepare_pagination`]. Free-text values typed by the
//! user (organization, search filters) are never substituted into the text:
//! they are declared as GraphQL variables and sent alongside the query.

/// Viewer login, read from the account settings.
pub const LOGIN: &str = "login";
/// First second of the current day, from the clock.
pub const TODAY: &str = "today";
/// Start of a contribution window.
pub const FROM: &str = "from";
/// End of a contribution window.
pub const TO: &str = "to";
/// Single day of a contribution report.
pub const DATE: &str = "date";
/// Pull request state filter of a search.
pub const STATE: &str = "state";
/// Page size.
pub const OFFSET: &str = "offset";
/// Cursor clause of the next page.
pub const AFTER: &str = "after";

/// A named, parameterized GraphQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    /// Identifier used in logs.
    pub name: &'static str,
    /// Template text.
    pub text: &'static str,
    /// Tokens resolved at prepare time, pagination tokens excluded.
    pub tokens: &'static [&'static str],
}

impl Statement {
    /// Whether the statement carries pagination placeholders.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.text.contains("$offset") && self.text.contains("$after")
    }
}

/// Login of the token owner.
pub const LOGIN_STATEMENT: Statement = Statement {
    name: "login",
    tokens: &[],
    text: r"
{
    viewer {
        login
    }
}",
};

/// API quota of the token.
pub const RATE_LIMIT_STATEMENT: Statement = Statement {
    name: "rate_limit",
    tokens: &[],
    text: r"
{
    rateLimit {
        limit
        cost
        remaining
        resetAt
    }
}",
};

/// Organizations the viewer belongs to.
pub const ORGANIZATION_LIST_STATEMENT: Statement = Statement {
    name: "organization_list",
    tokens: &[],
    text: r"
{
    viewer {
        organizations(last: 100) {
            edges {
                node {
                    login
                    url
                }
            }
        }
    }
}",
};

/// Members of the `$organization` variable, with their role.
pub const ORGANIZATION_MEMBER_LIST_STATEMENT: Statement = Statement {
    name: "organization_member_list",
    tokens: &[],
    text: r"
query($organization: String!) {
    viewer {
        organization(login: $organization) {
            membersWithRole(first: $offset $after) {
                pageInfo {
                    hasNextPage
                    endCursor
                }
                totalCount
                edges {
                    role
                    node {
                        login
                        email
                        location
                    }
                }
            }
        }
    }
}",
};

/// Pull requests awaiting a review from the viewer.
pub const REVIEW_REQUESTED_STATEMENT: Statement = Statement {
    name: "review_requested",
    tokens: &[STATE, LOGIN],
    text: r#"
{
    search(query: "type:pr state:$state review-requested:$login", type: ISSUE, first: $offset $after) {
        pageInfo {
            hasNextPage
            endCursor
        }
        edges {
            node {
                ... on PullRequest {
                    updatedAt
                    title
                    number
                    url
                }
            }
        }
    }
}"#,
};

/// Reviews authored by the viewer, with the last pushed commit of each pull request.
pub const REVIEW_LIST_STATEMENT: Statement = Statement {
    name: "review_list",
    tokens: &[],
    text: r"
query {
    viewer {
        contributionsCollection {
            pullRequestReviewContributions(first: $offset $after) {
                pageInfo {
                    hasNextPage
                    endCursor
                }
                edges {
                    node {
                        pullRequestReview {
                            createdAt
                            updatedAt
                            state
                        }
                        pullRequest {
                            url
                            state
                            commits(last: 1) {
                                edges {
                                    node {
                                        commit {
                                            pushedDate
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}",
};

/// Open pull requests of the viewer.
pub const PULL_REQUEST_LIST_STATEMENT: Statement = Statement {
    name: "pull_request_list",
    tokens: &[],
    text: r"
{
    viewer {
        pullRequests(first: 100, states: OPEN) {
            edges {
                node {
                    createdAt
                    url
                    title
                    mergeable
                }
            }
        }
    }
}",
};

/// Pull requests matching the `$search` variable, with their labels.
pub const ORGA_PULL_REQUEST_LIST_STATEMENT: Statement = Statement {
    name: "orga_pull_request_list",
    tokens: &[],
    text: r"
query($search: String!) {
    search(query: $search, type: ISSUE, first: $offset $after) {
        pageInfo {
            hasNextPage
            endCursor
        }
        edges {
            node {
                ... on PullRequest {
                    repository {
                        nameWithOwner
                    }
                    createdAt
                    number
                    url
                    title
                    labels(first: 20) {
                        edges {
                            node {
                                name
                            }
                        }
                    }
                }
            }
        }
    }
}",
};

/// Pull requests and reviews of a single day.
pub const ONE_DAY_CONTRIBUTION_LIST_STATEMENT: Statement = Statement {
    name: "one_day_contribution_list",
    tokens: &[DATE],
    text: r#"
{
    viewer {
        contributionsCollection(from: "$date", to: "$date") {
            pullRequestContributions(first: 100) {
                edges {
                    node {
                        pullRequest {
                            url
                            title
                            state
                            createdAt
                            updatedAt
                        }
                    }
                }
            }
            pullRequestReviewContributions(first: 100) {
                edges {
                    node {
                        pullRequestReview {
                            url
                            publishedAt
                            state
                        }
                        pullRequest {
                            url
                        }
                    }
                }
            }
        }
    }
}"#,
};

/// Pull requests opened within a window.
pub const PULL_REQUEST_CONTRIBUTION_LIST_STATEMENT: Statement = Statement {
    name: "pull_request_contribution_list",
    tokens: &[FROM, TO],
    text: r#"
{
    viewer {
        contributionsCollection(from: "$from", to: "$to") {
            pullRequestContributions(first: $offset $after) {
                pageInfo {
                    hasNextPage
                    endCursor
                }
                edges {
                    node {
                        pullRequest {
                            url
                            title
                            createdAt
                        }
                    }
                }
            }
        }
    }
}"#,
};

/// Reviews published within a window.
pub const PULL_REQUEST_REVIEW_CONTRIBUTION_LIST_STATEMENT: Statement = Statement {
    name: "pull_request_review_contribution_list",
    tokens: &[FROM, TO],
    text: r#"
{
    viewer {
        contributionsCollection(from: "$from", to: "$to") {
            pullRequestReviewContributions(first: $offset $after) {
                pageInfo {
                    hasNextPage
                    endCursor
                }
                edges {
                    node {
                        pullRequestReview {
                            publishedAt
                        }
                        pullRequest {
                            url
                            title
                        }
                    }
                }
            }
        }
    }
}"#,
};

/// Contribution totals of the viewer.
pub const CONTRIBUTION_STATS_STATEMENT: Statement = Statement {
    name: "contribution_stats",
    tokens: &[],
    text: r"
{
    viewer {
        contributionsCollection {
            totalIssueContributions
            totalCommitContributions
            totalRepositoryContributions
            totalPullRequestContributions
            totalPullRequestReviewContributions
            totalRepositoriesWithContributedIssues
            totalRepositoriesWithContributedCommits
            totalRepositoriesWithContributedPullRequests
            totalRepositoriesWithContributedPullRequestReviews
        }
    }
}",
};

/// Branches of repositories the viewer contributed to.
pub const BRANCH_LIST_STATEMENT: Statement = Statement {
    name: "branch_list",
    tokens: &[],
    text: r#"
{
    viewer {
        repositoriesContributedTo(first: $offset $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            edges {
                node {
                    url
                    refs(first: 100, refPrefix: "refs/heads/") {
                        edges {
                            node {
                                associatedPullRequests(first: 10) {
                                    edges {
                                        node {
                                            url
                                            headRefName
                                        }
                                    }
                                }
                                name
                                target {
                                    ... on Commit {
                                        author {
                                            email
                                            name
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}"#,
};

/// Every statement of the catalogue.
pub const ALL: &[Statement] = &[
    LOGIN_STATEMENT,
    RATE_LIMIT_STATEMENT,
    ORGANIZATION_LIST_STATEMENT,
    ORGANIZATION_MEMBER_LIST_STATEMENT,
    REVIEW_REQUESTED_STATEMENT,
    REVIEW_LIST_STATEMENT,
    PULL_REQUEST_LIST_STATEMENT,
    ORGA_PULL_REQUEST_LIST_STATEMENT,
    ONE_DAY_CONTRIBUTION_LIST_STATEMENT,
    PULL_REQUEST_CONTRIBUTION_LIST_STATEMENT,
    PULL_REQUEST_REVIEW_CONTRIBUTION_LIST_STATEMENT,
    CONTRIBUTION_STATS_STATEMENT,
    BRANCH_LIST_STATEMENT,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_tokens_appear_in_text() {
        for statement in ALL {
            for token in statement.tokens {
                assert!(
                    statement.text.contains(&format!("${token}")),
                    "{} declares `{token}` but never uses it",
                    statement.name
                );
            }
        }
    }

    #[test]
    fn test_pagination_tokens_are_not_declared() {
        for statement in ALL {
            assert!(!statement.tokens.contains(&OFFSET), "{}", statement.name);
            assert!(!statement.tokens.contains(&AFTER), "{}", statement.name);
        }
    }

    #[test]
    fn test_user_text_goes_through_variables() {
        assert!(
            ORGANIZATION_MEMBER_LIST_STATEMENT
                .text
                .contains("query($organization: String!)")
        );
        assert!(
            ORGA_PULL_REQUEST_LIST_STATEMENT
                .text
                .contains("query($search: String!)")
        );
    }

    #[test]
    fn test_is_paginated() {
        assert!(BRANCH_LIST_STATEMENT.is_paginated());
        assert!(REVIEW_LIST_STATEMENT.is_paginated());
        assert!(!PULL_REQUEST_LIST_STATEMENT.is_paginated());
        assert!(!ONE_DAY_CONTRIBUTION_LIST_STATEMENT.is_paginated());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }
}
