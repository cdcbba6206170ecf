// SPDX-License-Identifier: Apache-2.0

//! Contribution queries: pull requests opened and reviews published by the viewer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{Context, PageInfo, Query, QueryEngine, QuerySpec, Source, at, nodes, parse_at};
use crate::Result;
use crate::error::YogitError;
use crate::statements::{
    CONTRIBUTION_STATS_STATEMENT, DATE, FROM, ONE_DAY_CONTRIBUTION_LIST_STATEMENT,
    PULL_REQUEST_CONTRIBUTION_LIST_STATEMENT, PULL_REQUEST_REVIEW_CONTRIBUTION_LIST_STATEMENT, TO,
};
use crate::table::TablePrinter;
use crate::utils::{TITLE_BUDGET, day_earliest_str, parse_day, parse_timestamp, shorten};

/// Longest window accepted, in days.
const MAX_WINDOW_DAYS: i64 = 365;

const BINDING_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const COLLECTION: &str = "/data/viewer/contributionsCollection";

/// Part the viewer played in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Author of the pull request.
    Owner,
    /// Reviewer of the pull request.
    Reviewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("OWNER"),
            Self::Reviewer => f.write_str("REVIEWER"),
        }
    }
}

/// Inclusive date window of a contribution listing.
///
/// `to` covers its whole day: the window ends at `23:59:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionWindow {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl ContributionWindow {
    /// Validates a `YYYY-MM-DD` pair.
    ///
    /// # Errors
    ///
    /// Fails on a malformed date, when `from` is after `to`, or when the
    /// window spans more than a year.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = parse_day(from)?.and_time(NaiveTime::default());
        let to = parse_day(to)?.and_hms_opt(23, 59, 59).ok_or_else(|| {
            YogitError::invalid("Bad date format, should be `%Y-%m-%d`")
        })?;
        if from > to {
            return Err(YogitError::invalid("`--from` is not before `--to`"));
        }
        if (to - from).num_days() > MAX_WINDOW_DAYS {
            return Err(YogitError::invalid("Date range must not exceed one year"));
        }
        Ok(Self { from, to })
    }

    /// First day of the window.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.from.date()
    }

    /// Last day of the window.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.to.date()
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (FROM.to_string(), self.from.format(BINDING_FORMAT).to_string()),
            (TO.to_string(), self.to.format(BINDING_FORMAT).to_string()),
        ])
    }
}

/// One pull request the viewer opened or reviewed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContributionRow {
    /// Day of the contribution.
    pub created: NaiveDate,
    /// Pull request URL.
    pub url: String,
    /// Owner or reviewer.
    pub role: Role,
    /// Full title.
    pub title: String,
}

#[derive(Deserialize)]
struct OpenedPullRequest {
    url: String,
    title: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

/// Pull requests opened by the viewer within a window.
#[derive(Debug, Clone, Copy)]
pub struct PullRequestContributionQuery {
    window: ContributionWindow,
}

impl PullRequestContributionQuery {
    /// Creates the query for `window`.
    #[must_use]
    pub fn new(window: ContributionWindow) -> Self {
        Self { window }
    }
}

impl QuerySpec for PullRequestContributionQuery {
    type Row = ContributionRow;

    fn source(&self) -> Source {
        Source::GraphQl(PULL_REQUEST_CONTRIBUTION_LIST_STATEMENT)
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        self.window.bindings()
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(
        &self,
        response: &Value,
        _: &Context<'_>,
        rows: &mut Vec<ContributionRow>,
    ) -> Result<()> {
        let edges = at(response, &format!("{COLLECTION}/pullRequestContributions"))?;
        for node in nodes::<Value>(edges, "/edges")? {
            let pr: OpenedPullRequest = parse_at(&node, "/pullRequest")?;
            rows.push(ContributionRow {
                created: parse_timestamp(&pr.created_at)?.date_naive(),
                url: pr.url,
                role: Role::Owner,
                title: pr.title,
            });
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(
            response,
            &format!("{COLLECTION}/pullRequestContributions/pageInfo"),
        )
    }
}

#[derive(Deserialize)]
struct PublishedReview {
    #[serde(rename = "publishedAt")]
    published_at: String,
}

#[derive(Deserialize)]
struct ReviewedPullRequest {
    url: String,
    title: String,
}

/// Reviews published by the viewer within a window.
#[derive(Debug, Clone, Copy)]
pub struct ReviewContributionQuery {
    window: ContributionWindow,
}

impl ReviewContributionQuery {
    /// Creates the query for `window`.
    #[must_use]
    pub fn new(window: ContributionWindow) -> Self {
        Self { window }
    }
}

impl QuerySpec for ReviewContributionQuery {
    type Row = ContributionRow;

    fn source(&self) -> Source {
        Source::GraphQl(PULL_REQUEST_REVIEW_CONTRIBUTION_LIST_STATEMENT)
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        self.window.bindings()
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(
        &self,
        response: &Value,
        _: &Context<'_>,
        rows: &mut Vec<ContributionRow>,
    ) -> Result<()> {
        let edges = at(response, &format!("{COLLECTION}/pullRequestReviewContributions"))?;
        for node in nodes::<Value>(edges, "/edges")? {
            let review: PublishedReview = parse_at(&node, "/pullRequestReview")?;
            let pr: ReviewedPullRequest = parse_at(&node, "/pullRequest")?;
            rows.push(ContributionRow {
                created: parse_timestamp(&review.published_at)?.date_naive(),
                url: pr.url,
                role: Role::Reviewer,
                title: pr.title,
            });
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(
            response,
            &format!("{COLLECTION}/pullRequestReviewContributions/pageInfo"),
        )
    }
}

/// Opened pull requests and published reviews of a window, merged.
#[derive(Debug, Clone)]
pub struct ContributionList {
    window: ContributionWindow,
    rows: Vec<ContributionRow>,
}

impl ContributionList {
    /// Runs both contribution queries, one after the other, and merges them.
    #[instrument(skip(engine))]
    pub async fn execute(window: ContributionWindow, engine: &QueryEngine) -> Result<Self> {
        let opened = Query::new(PullRequestContributionQuery::new(window))
            .execute(engine)
            .await?;
        let reviewed = Query::new(ReviewContributionQuery::new(window))
            .execute(engine)
            .await?;

        let mut rows = opened.into_data();
        rows.extend(reviewed.into_data());
        rows.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| a.url.cmp(&b.url))
                .then_with(|| a.role.cmp(&b.role))
                .then_with(|| a.title.cmp(&b.title))
        });
        debug!(rows = rows.len(), "Contributions merged");

        Ok(Self { window, rows })
    }

    /// Window the contributions were fetched for.
    #[must_use]
    pub fn window(&self) -> &ContributionWindow {
        &self.window
    }

    /// Merged rows, newest first.
    #[must_use]
    pub fn data(&self) -> &[ContributionRow] {
        &self.rows
    }

    /// Title line, e.g. `Contributions from 2019-08-01 to 2019-08-15`.
    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "Contributions from {} to {}",
            self.window.first_day(),
            self.window.last_day()
        )
    }

    /// Display form of the rows, without the title line.
    #[must_use]
    pub fn tabulate(&self) -> String {
        if self.rows.is_empty() {
            return "Nothing... 😿 Time to push hard 💪".to_string();
        }
        let mut table = TablePrinter::new(["CREATED", "PULL REQUEST", "ROLE", "TITLE"]);
        for row in &self.rows {
            table.add_row([
                row.created.format("%Y-%m-%d").to_string(),
                row.url.clone(),
                row.role.to_string(),
                shorten(&row.title, TITLE_BUDGET),
            ]);
        }
        format!("{}\nCount: {}", table.render(), self.rows.len())
    }
}

/// One contribution counter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContributionStat {
    /// Counter name, as GitHub names it.
    pub name: String,
    /// Counter value.
    pub count: u64,
}

/// Contribution totals of the viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContributionStatsQuery;

impl QuerySpec for ContributionStatsQuery {
    type Row = ContributionStat;

    fn source(&self) -> Source {
        Source::GraphQl(CONTRIBUTION_STATS_STATEMENT)
    }

    fn extract(
        &self,
        response: &Value,
        _: &Context<'_>,
        rows: &mut Vec<ContributionStat>,
    ) -> Result<()> {
        let collection = at(response, COLLECTION)?;
        // Statement order, not map order.
        for name in CONTRIBUTION_STATS_STATEMENT
            .text
            .split_whitespace()
            .filter(|word| word.starts_with("total"))
        {
            let count = at(collection, &format!("/{name}"))?
                .as_u64()
                .ok_or_else(|| YogitError::shape(format!("`{name}` is not a count")))?;
            rows.push(ContributionStat {
                name: name.to_string(),
                count,
            });
        }
        Ok(())
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["CONTRIBUTION", "COUNT"]
    }

    fn cells(&self, row: &ContributionStat) -> Vec<String> {
        vec![row.name.clone(), row.count.to_string()]
    }

    fn render(&self, rows: &[ContributionStat]) -> String {
        self.table(rows)
    }
}

/// One pull request touched on a given day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyContributionRow {
    /// Pull request URL.
    pub url: String,
    /// Owner or reviewer.
    pub role: Role,
    /// Pull request state for owners, review state for reviewers.
    pub state: String,
}

#[derive(Deserialize)]
struct StatedPullRequest {
    url: String,
    state: String,
}

#[derive(Deserialize)]
struct StatedReview {
    state: String,
}

/// Pull requests opened and reviewed on one day, for the SCRUM report.
#[derive(Debug, Clone, Copy)]
pub struct DailyContributionQuery {
    date: NaiveDate,
}

impl DailyContributionQuery {
    /// Creates the query for `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl QuerySpec for DailyContributionQuery {
    type Row = DailyContributionRow;

    fn source(&self) -> Source {
        Source::GraphQl(ONE_DAY_CONTRIBUTION_LIST_STATEMENT)
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(DATE.to_string(), day_earliest_str(self.date))])
    }

    fn extract(
        &self,
        response: &Value,
        _: &Context<'_>,
        rows: &mut Vec<DailyContributionRow>,
    ) -> Result<()> {
        let collection = at(response, COLLECTION)?;
        for node in nodes::<Value>(collection, "/pullRequestContributions/edges")? {
            let pr: StatedPullRequest = parse_at(&node, "/pullRequest")?;
            rows.push(DailyContributionRow {
                url: pr.url,
                role: Role::Owner,
                state: pr.state,
            });
        }
        for node in nodes::<Value>(collection, "/pullRequestReviewContributions/edges")? {
            let review: StatedReview = parse_at(&node, "/pullRequestReview")?;
            let url: String = parse_at(&node, "/pullRequest/url")?;
            rows.push(DailyContributionRow {
                url,
                role: Role::Reviewer,
                state: review.state,
            });
        }
        Ok(())
    }

    fn sort(&self, rows: &mut [DailyContributionRow]) {
        rows.sort_by(|a, b| {
            a.url
                .cmp(&b.url)
                .then_with(|| a.role.cmp(&b.role))
                .then_with(|| a.state.cmp(&b.state))
        });
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["PULL REQUEST", "ROLE", "STATE"]
    }

    fn cells(&self, row: &DailyContributionRow) -> Vec<String> {
        vec![row.url.clone(), row.role.to_string(), row.state.clone()]
    }

    fn render(&self, rows: &[DailyContributionRow]) -> String {
        if rows.is_empty() {
            return self.empty_message().to_string();
        }
        self.table(rows)
    }
}
