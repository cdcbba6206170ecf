// SPDX-License-Identifier: Apache-2.0

//! HTTP transport to the GitHub GraphQL and REST APIs.
//!
//! One request per call, no retries: a failed call fails the whole command.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::config::GitHubConfig;
use crate::error::YogitError;

/// User agent sent with every request.
pub const YOGIT_USER_AGENT: &str = concat!("yogit/", env!("CARGO_PKG_VERSION"));

/// GraphQL request body.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GraphQlRequest {
    /// Prepared statement text.
    pub query: String,
    /// Server-side bound variables.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    /// Creates a request without variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Attaches bound variables.
    #[must_use]
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }
}

/// Round-trips to the remote API.
///
/// Implementations return the decoded JSON body of a successful call and a
/// classified [`YogitError`] otherwise.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs a GraphQL request.
    async fn graphql(&self, request: &GraphQlRequest) -> Result<Value, YogitError>;

    /// GETs a REST endpoint such as `/user/emails`.
    async fn rest(&self, endpoint: &str) -> Result<Value, YogitError>;
}

/// Maps an HTTP outcome to decoded JSON or a classified error.
///
/// 200 must carry valid JSON, otherwise the raw body becomes the failure
/// message. 400 and 401 have dedicated kinds; any other status is a generic
/// failure carrying the body.
pub fn classify(status: u16, body: &str) -> Result<Value, YogitError> {
    match status {
        200 => serde_json::from_str(body).map_err(|e| {
            error!(error = %e, "Undecodable response body");
            YogitError::Failure {
                message: body.to_string(),
            }
        }),
        400 => Err(YogitError::BadRequest),
        401 => Err(YogitError::Unauthorized),
        _ => Err(YogitError::Failure {
            message: body.to_string(),
        }),
    }
}

/// Rejects a GraphQL envelope that reports `errors` without usable `data`.
///
/// GitHub answers 200 to queries it cannot resolve; partial results that
/// still carry `data` are kept.
pub fn graphql_errors(value: Value) -> Result<Value, YogitError> {
    let Some(errors) = value.get("errors").and_then(Value::as_array) else {
        return Ok(value);
    };
    if errors.is_empty() {
        return Ok(value);
    }
    let message = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
        })
        .collect::<Vec<_>>()
        .join("; ");

    if value.get("data").is_some_and(|data| !data.is_null()) {
        warn!(errors = %message, "GraphQL returned partial data");
        Ok(value)
    } else {
        error!(%message, "GraphQL errors");
        Err(YogitError::Failure { message })
    }
}

/// GitHub API client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    graphql_url: String,
}

#[bon::bon]
impl GitHubClient {
    /// Creates a client authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns `YogitError::Failure` if the HTTP client cannot be built.
    #[builder]
    pub fn new(
        token: &SecretString,
        #[builder(into, default = "https://api.github.com".to_string())] api_url: String,
        #[builder(into, default = "https://api.github.com/graphql".to_string())]
        graphql_url: String,
        #[builder(default = Duration::from_secs(30))] timeout: Duration,
    ) -> Result<Self, YogitError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut authorization = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(|_| YogitError::Failure {
                message: "GitHub token contains invalid characters".to_string(),
            })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, HeaderValue::from_static(YOGIT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            graphql_url,
        })
    }

    /// Creates a client from the `[github]` configuration section.
    pub fn from_config(config: &GitHubConfig, token: &SecretString) -> Result<Self, YogitError> {
        Self::builder()
            .token(token)
            .api_url(config.api_url.as_str())
            .graphql_url(config.graphql_url.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
    }
}

async fn read(response: reqwest::Response) -> Result<Value, YogitError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!(status, body = %body.chars().take(500).collect::<String>(), "Response");
    classify(status, &body)
}

#[async_trait]
impl Transport for GitHubClient {
    #[instrument(skip(self, request), fields(url = %self.graphql_url))]
    async fn graphql(&self, request: &GraphQlRequest) -> Result<Value, YogitError> {
        debug!(query = %request.query, variables = ?request.variables, "GraphQL request");
        let response = self
            .http
            .post(&self.graphql_url)
            .json(request)
            .send()
            .await?;
        graphql_errors(read(response).await?)
    }

    #[instrument(skip(self), fields(base = %self.api_url))]
    async fn rest(&self, endpoint: &str) -> Result<Value, YogitError> {
        let url = format!("{}{endpoint}", self.api_url);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::builder()
            .token(&SecretString::from("github_token"))
            .api_url(server.uri())
            .graphql_url(format!("{}/graphql", server.uri()))
            .build()
            .expect("client")
    }

    // ========================================================================
    // classify() tests
    // ========================================================================

    #[test]
    fn test_classify_success() {
        let value = classify(200, r#"{"data": {"viewer": {"login": "user1"}}}"#).unwrap();
        assert_eq!(value["data"]["viewer"]["login"], "user1");
    }

    #[test]
    fn test_classify_undecodable_body_keeps_raw_text() {
        let err = classify(200, "<html>oops</html>").unwrap_err();
        assert!(
            matches!(err, YogitError::Failure { ref message } if message == "<html>oops</html>")
        );
    }

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(classify(400, "{}"), Err(YogitError::BadRequest)));
        assert!(matches!(classify(401, "{}"), Err(YogitError::Unauthorized)));
        let err = classify(502, "Bad gateway").unwrap_err();
        assert_eq!(err.to_string(), "Bad gateway");
        // Other 2xx are not success for this API.
        assert!(classify(204, "").is_err());
    }

    #[test]
    fn test_graphql_errors_without_data() {
        let value = json!({"data": null, "errors": [
            {"message": "Could not resolve to a User with the login of 'ghost'."},
            {"message": "Something else"}
        ]});
        let err = graphql_errors(value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not resolve to a User with the login of 'ghost'.; Something else"
        );
    }

    #[test]
    fn test_graphql_partial_data_is_kept() {
        let value = json!({
            "data": {"viewer": {"login": "user1"}},
            "errors": [{"message": "x"}]
        });
        assert!(graphql_errors(value).is_ok());
        assert!(graphql_errors(json!({"data": {}})).is_ok());
        assert!(graphql_errors(json!({"data": {}, "errors": []})).is_ok());
    }

    #[test]
    fn test_graphql_error_without_message() {
        let err = graphql_errors(json!({"errors": [{"type": "NOT_FOUND"}]})).unwrap_err();
        assert_eq!(err.to_string(), "unknown error");
    }

    #[test]
    fn test_request_omits_empty_variables() {
        let body = serde_json::to_value(GraphQlRequest::new("{ viewer { login } }")).unwrap();
        assert_eq!(body, json!({"query": "{ viewer { login } }"}));

        let mut variables = Map::new();
        variables.insert("organization".to_string(), json!("orga1"));
        let request = GraphQlRequest::new("q").with_variables(variables);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body, json!({"query": "q", "variables": {"organization": "orga1"}}));
    }

    // ========================================================================
    // HTTP round-trips
    // ========================================================================

    #[tokio::test]
    async fn test_graphql_posts_query_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "token github_token"))
            .and(body_json(json!({"query": "{ viewer { login } }"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"viewer": {"login": "user1"}}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server)
            .graphql(&GraphQlRequest::new("{ viewer { login } }"))
            .await
            .unwrap();

        assert_eq!(value["data"]["viewer"]["login"], "user1");
    }

    #[tokio::test]
    async fn test_graphql_errors_envelope_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": null, "errors": [{"message": "boom"}]})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .graphql(&GraphQlRequest::new("{ viewer { login } }"))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::Failure { ref message } if message == "boom"));
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_graphql_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client(&server)
            .graphql(&GraphQlRequest::new("{}"))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::Unauthorized));
    }

    #[tokio::test]
    async fn test_rest_get_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"email": "email1"}, {"email": "email2"}])),
            )
            .mount(&server)
            .await;

        let value = client(&server).rest("/user/emails").await.unwrap();

        assert_eq!(value, json!([{"email": "email1"}, {"email": "email2"}]));
    }

    #[tokio::test]
    async fn test_rest_server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).rest("/user/emails").await.unwrap_err();

        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_connection_error_is_failure() {
        let server = MockServer::start().await;
        let client = client(&server);
        drop(server);

        let err = client.rest("/user/emails").await.unwrap_err();

        assert!(matches!(err, YogitError::Failure { .. }));
    }
}
