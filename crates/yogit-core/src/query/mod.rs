// SPDX-License-Identifier: Apache-2.0

//! Queries: descriptors, the executed-query entity and the engine that runs them.
//!
//! A concrete query is a [`QuerySpec`]: which statement or REST endpoint to
//! call, how to page through it, how to turn one response into rows and how
//! to sort and display those rows. [`QueryEngine`] runs a spec and a
//! [`Query`] holds the outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::Result;
use crate::error::YogitError;
use crate::settings::SettingsProvider;
use crate::statements::Statement;
use crate::table::TablePrinter;

pub mod account;
pub mod branches;
pub mod contributions;
pub mod engine;
pub mod organizations;
pub mod pulls;
pub mod reviews;
pub mod tags;

pub use engine::QueryEngine;

/// Where a query gets its data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A GraphQL statement of the registry.
    GraphQl(Statement),
    /// A REST endpoint path, e.g. `/user/emails`.
    Rest(String),
}

/// Pagination block of a GraphQL connection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PageInfo {
    /// Whether another page follows.
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    /// Cursor of the last item of this page.
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

/// Values available while extracting rows from a response.
pub struct Context<'a> {
    /// Instant the execution started at.
    pub now: DateTime<Utc>,
    /// Account settings.
    pub settings: &'a dyn SettingsProvider,
}

/// Describes one kind of query.
pub trait QuerySpec: Send + Sync {
    /// One display-ready record.
    type Row: Serialize + Clone + Send + std::fmt::Debug;

    /// Statement or endpoint to call.
    fn source(&self) -> Source;

    /// Values for statement tokens other than `$login` and `$today`.
    fn bindings(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// GraphQL variables bound server side.
    fn variables(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Page size, `None` for a single request.
    fn page_size(&self) -> Option<u32> {
        None
    }

    /// Appends the rows found in one response.
    fn extract(&self, response: &Value, ctx: &Context<'_>, rows: &mut Vec<Self::Row>)
    -> Result<()>;

    /// Locates the pagination block of one response.
    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        let _ = response;
        Err(YogitError::shape("query is not paginated"))
    }

    /// Final ordering, applied once all pages are in.
    fn sort(&self, rows: &mut [Self::Row]) {
        let _ = rows;
    }

    /// Column headers.
    fn headers(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Display cells of a row, one per header.
    fn cells(&self, row: &Self::Row) -> Vec<String> {
        let _ = row;
        Vec::new()
    }

    /// Message shown instead of an empty table.
    fn empty_message(&self) -> &'static str {
        "Nothing... 😿"
    }

    /// Display form of the sorted rows.
    ///
    /// Empty results show [`QuerySpec::empty_message`]; otherwise a table
    /// followed by a `Count: N` line.
    fn render(&self, rows: &[Self::Row]) -> String {
        if rows.is_empty() {
            return self.empty_message().to_string();
        }
        format!("{}\nCount: {}", self.table(rows), rows.len())
    }

    /// Table of the rows, without count line.
    fn table(&self, rows: &[Self::Row]) -> String {
        let mut table = TablePrinter::new(self.headers());
        for row in rows {
            table.add_row(self.cells(row));
        }
        table.render()
    }
}

/// An executed query: the raw responses and the sorted rows.
#[derive(Debug)]
pub struct Query<S: QuerySpec> {
    spec: S,
    responses: Vec<Value>,
    rows: Vec<S::Row>,
}

impl<S: QuerySpec> Query<S> {
    /// Wraps a descriptor; nothing is fetched yet.
    pub fn new(spec: S) -> Self {
        Self {
            spec,
            responses: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Runs the query to completion.
    ///
    /// Either every page is fetched and extracted, or an error is returned
    /// and no row is kept.
    pub async fn execute(self, engine: &QueryEngine) -> Result<Self> {
        let outcome = engine.run(&self.spec).await?;
        Ok(Self {
            spec: self.spec,
            responses: outcome.responses,
            rows: outcome.rows,
        })
    }

    /// Descriptor of this query.
    pub fn spec(&self) -> &S {
        &self.spec
    }

    /// Sorted rows.
    pub fn data(&self) -> &[S::Row] {
        &self.rows
    }

    /// Takes the sorted rows.
    pub fn into_data(self) -> Vec<S::Row> {
        self.rows
    }

    /// Decoded responses, in arrival order.
    pub fn responses(&self) -> &[Value] {
        &self.responses
    }

    /// Display form of the result, for embedding in a larger output.
    pub fn tabulate(&self) -> String {
        self.spec.render(&self.rows)
    }

    /// Writes the display form to standard output.
    pub fn print(&self) {
        println!("{}", self.tabulate());
    }
}

/// Rows and responses of one successful run.
#[derive(Debug)]
pub(crate) struct Outcome<R> {
    pub responses: Vec<Value>,
    pub rows: Vec<R>,
}

// ============================================================================
// Response navigation
// ============================================================================

/// Follows a JSON pointer, failing on a missing or null node.
pub(crate) fn at<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value> {
    match value.pointer(pointer) {
        Some(Value::Null) | None => Err(YogitError::shape(format!("missing `{pointer}`"))),
        Some(node) => Ok(node),
    }
}

/// Array found at `pointer`.
pub(crate) fn array_at<'a>(value: &'a Value, pointer: &str) -> Result<&'a Vec<Value>> {
    at(value, pointer)?
        .as_array()
        .ok_or_else(|| YogitError::shape(format!("`{pointer}` is not an array")))
}

/// String found at `pointer`.
pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> Result<&'a str> {
    at(value, pointer)?
        .as_str()
        .ok_or_else(|| YogitError::shape(format!("`{pointer}` is not a string")))
}

/// Deserializes the node found at `pointer`.
pub(crate) fn parse_at<T: DeserializeOwned>(value: &Value, pointer: &str) -> Result<T> {
    T::deserialize(at(value, pointer)?)
        .map_err(|e| YogitError::shape(format!("`{pointer}`: {e}")))
}

/// `node` of every edge of the connection at `pointer`.
pub(crate) fn nodes<T: DeserializeOwned>(value: &Value, pointer: &str) -> Result<Vec<T>> {
    array_at(value, pointer)?
        .iter()
        .map(|edge| parse_at(edge, "/node"))
        .collect()
}
