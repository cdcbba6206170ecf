// SPDX-License-Identifier: Apache-2.0

//! Execution of query descriptors: preparation, pagination and extraction.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::{Context, Outcome, QuerySpec, Source};
use crate::Result;
use crate::clock::Clock;
use crate::error::YogitError;
use crate::github::{GraphQlRequest, Transport};
use crate::settings::SettingsProvider;
use crate::statement::{VariableResolver, prepare, prepare_pagination};

/// Default cap on the number of pages a single query may fetch.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Runs queries against a transport, with injected settings and clock.
///
/// Each run owns its cursor; nothing is shared between runs besides the
/// read-only collaborators.
#[derive(Clone)]
pub struct QueryEngine {
    transport: Arc<dyn Transport>,
    settings: Arc<dyn SettingsProvider>,
    clock: Arc<dyn Clock>,
    max_pages: u32,
}

impl QueryEngine {
    /// Creates an engine with the default page cap.
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: Arc<dyn SettingsProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            settings,
            clock,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Overrides the page cap. Zero is treated as one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Account settings used for `$login` and email filters.
    pub fn settings(&self) -> &dyn SettingsProvider {
        self.settings.as_ref()
    }

    /// Clock used for `$today` and relative dates.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[instrument(skip_all)]
    pub(crate) async fn run<S: QuerySpec>(&self, spec: &S) -> Result<Outcome<S::Row>> {
        let ctx = Context {
            now: self.clock.now(),
            settings: self.settings.as_ref(),
        };
        let mut responses = Vec::new();
        let mut rows = Vec::new();

        match spec.source() {
            Source::Rest(endpoint) => {
                let response = self.transport.rest(&endpoint).await?;
                spec.extract(&response, &ctx, &mut rows)?;
                responses.push(response);
            }
            Source::GraphQl(statement) => {
                let resolver =
                    VariableResolver::new(self.settings.login(), ctx.now, spec.bindings());
                let prepared = prepare(statement.text, statement.tokens, &resolver);
                let variables = spec.variables();
                debug_assert_eq!(
                    spec.page_size().is_some(),
                    statement.is_paginated(),
                    "page size and pagination placeholders disagree for `{}`",
                    statement.name
                );

                match spec.page_size() {
                    None => {
                        debug!(statement = statement.name, "Fetching");
                        let response = self.fetch(prepared, &variables).await?;
                        spec.extract(&response, &ctx, &mut rows)?;
                        responses.push(response);
                    }
                    Some(page_size) => {
                        let mut cursor: Option<String> = None;
                        let mut pages = 0;
                        loop {
                            let text =
                                prepare_pagination(&prepared, page_size, cursor.as_deref());
                            debug!(statement = statement.name, page = pages + 1, "Fetching page");
                            let response = self.fetch(text, &variables).await?;
                            pages += 1;

                            let before = rows.len();
                            spec.extract(&response, &ctx, &mut rows)?;
                            let info = spec.page_info(&response)?;
                            responses.push(response);
                            debug!(
                                rows = rows.len() - before,
                                has_next_page = info.has_next_page,
                                "Page extracted"
                            );

                            if !info.has_next_page {
                                break;
                            }
                            if pages >= self.max_pages {
                                return Err(YogitError::PaginationLimit { pages });
                            }
                            cursor = Some(info.end_cursor.ok_or_else(|| {
                                YogitError::shape("`hasNextPage` is true but `endCursor` is null")
                            })?);
                        }
                    }
                }
            }
        }

        spec.sort(&mut rows);
        debug!(rows = rows.len(), responses = responses.len(), "Query done");
        Ok(Outcome { responses, rows })
    }

    async fn fetch(&self, query: String, variables: &Map<String, Value>) -> Result<Value> {
        let request = GraphQlRequest::new(query).with_variables(variables.clone());
        self.transport.graphql(&request).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::query::{PageInfo, Query, array_at, parse_at};
    use crate::settings::AccountSettings;
    use crate::statements::{BRANCH_LIST_STATEMENT, PULL_REQUEST_LIST_STATEMENT};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport answering from a queue and recording every request.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        responses: Mutex<VecDeque<Result<Value>>>,
        pub requests: Mutex<Vec<GraphQlRequest>>,
        pub endpoints: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub(crate) fn with(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(Ok).collect()),
                ..Self::default()
            }
        }

        pub(crate) fn push_error(&self, error: YogitError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().unwrap().len() + self.endpoints.lock().unwrap().len()
        }

        fn next(&self) -> Result<Value> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(YogitError::Failure {
                        message: "no response queued".into(),
                    })
                })
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn graphql(&self, request: &GraphQlRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request.clone());
            self.next()
        }

        async fn rest(&self, endpoint: &str) -> Result<Value> {
            self.endpoints.lock().unwrap().push(endpoint.to_string());
            self.next()
        }
    }

    pub(crate) fn account() -> AccountSettings {
        AccountSettings {
            version: 1,
            token: "github_token".to_string(),
            login: "user1".to_string(),
            emails: vec![
                "user1@company1.com".to_string(),
                "user1@company2.com".to_string(),
                "user1@company3.com".to_string(),
            ],
        }
    }

    pub(crate) fn engine_at(
        transport: Arc<MockTransport>,
        now: chrono::DateTime<Utc>,
    ) -> QueryEngine {
        QueryEngine::new(transport, Arc::new(account()), Arc::new(FixedClock(now)))
    }

    pub(crate) fn engine(transport: Arc<MockTransport>) -> QueryEngine {
        engine_at(transport, Utc.with_ymd_and_hms(2019, 7, 17, 1, 15, 59).unwrap())
    }

    /// Paginated spec keeping arrival order.
    #[derive(Debug)]
    struct Names;

    impl QuerySpec for Names {
        type Row = String;

        fn source(&self) -> Source {
            Source::GraphQl(BRANCH_LIST_STATEMENT)
        }

        fn page_size(&self) -> Option<u32> {
            Some(2)
        }

        fn extract(
            &self,
            response: &Value,
            _: &Context<'_>,
            rows: &mut Vec<String>,
        ) -> Result<()> {
            for item in array_at(response, "/data/items")? {
                rows.push(item.as_str().unwrap_or_default().to_string());
            }
            Ok(())
        }

        fn page_info(&self, response: &Value) -> Result<PageInfo> {
            parse_at(response, "/data/pageInfo")
        }
    }

    /// Pages a statement that has no pagination placeholders.
    #[derive(Debug)]
    struct Unpageable;

    impl QuerySpec for Unpageable {
        type Row = String;

        fn source(&self) -> Source {
            Source::GraphQl(PULL_REQUEST_LIST_STATEMENT)
        }

        fn page_size(&self) -> Option<u32> {
            Some(2)
        }

        fn extract(&self, _: &Value, _: &Context<'_>, _: &mut Vec<String>) -> Result<()> {
            Ok(())
        }
    }

    fn page(items: &[&str], has_next: bool, cursor: Option<&str>) -> Value {
        json!({
            "data": {
                "items": items,
                "pageInfo": {"hasNextPage": has_next, "endCursor": cursor}
            }
        })
    }

    #[tokio::test]
    async fn test_two_pages_accumulate_in_arrival_order() {
        let transport = Arc::new(MockTransport::with(vec![
            page(&["b", "a"], true, Some("c1")),
            page(&["c"], false, None),
        ]));

        let query = Query::new(Names)
            .execute(&engine(transport.clone()))
            .await
            .unwrap();

        assert_eq!(query.data(), ["b", "a", "c"]);
        assert_eq!(query.responses().len(), 2);
        assert_eq!(transport.calls(), 2);

        let requests = transport.requests.lock().unwrap();
        assert!(requests[0].query.contains("repositoriesContributedTo(first: 2 )"));
        assert!(
            requests[1]
                .query
                .contains(r#"repositoriesContributedTo(first: 2 , after: "c1")"#)
        );
    }

    #[tokio::test]
    async fn test_failure_discards_partial_rows() {
        let transport = Arc::new(MockTransport::with(vec![page(&["a"], true, Some("c1"))]));
        transport.push_error(YogitError::Unauthorized);

        let err = Query::new(Names)
            .execute(&engine(transport.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::Unauthorized));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_page_cap() {
        let transport = Arc::new(MockTransport::with(vec![
            page(&["a"], true, Some("c1")),
            page(&["b"], true, Some("c2")),
            page(&["c"], true, Some("c3")),
        ]));

        let err = Query::new(Names)
            .execute(&engine(transport.clone()).with_max_pages(2))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::PaginationLimit { pages: 2 }));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_next_page_without_cursor_is_shape_error() {
        let transport = Arc::new(MockTransport::with(vec![page(&["a"], true, None)]));

        let err = Query::new(Names)
            .execute(&engine(transport))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn test_missing_page_info_is_shape_error() {
        let transport = Arc::new(MockTransport::with(vec![json!({"data": {"items": []}})]));

        let err = Query::new(Names)
            .execute(&engine(transport))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Failure);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_unchanged() {
        let transport = Arc::new(MockTransport::default());
        transport.push_error(YogitError::Failure {
            message: "Could not resolve to an Organization".into(),
        });

        let err = Query::new(Names)
            .execute(&engine(transport))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Could not resolve to an Organization");
    }

    #[tokio::test]
    #[should_panic(expected = "pagination placeholders disagree")]
    async fn test_page_size_on_unpaginated_statement() {
        let transport = Arc::new(MockTransport::default());
        let _ = Query::new(Unpageable).execute(&engine(transport)).await;
    }
}
