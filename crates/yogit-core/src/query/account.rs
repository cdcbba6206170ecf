// SPDX-License-Identifier: Apache-2.0

//! Account queries: login, emails and API quota.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Context, QuerySpec, Source, parse_at, str_at};
use crate::Result;
use crate::error::YogitError;
use crate::statements::{LOGIN_STATEMENT, RATE_LIMIT_STATEMENT};

/// Login of the token owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginQuery;

impl QuerySpec for LoginQuery {
    type Row = String;

    fn source(&self) -> Source {
        Source::GraphQl(LOGIN_STATEMENT)
    }

    fn extract(&self, response: &Value, _: &Context<'_>, rows: &mut Vec<String>) -> Result<()> {
        rows.push(str_at(response, "/data/viewer/login")?.to_string());
        Ok(())
    }

    fn render(&self, rows: &[String]) -> String {
        rows.join("\n")
    }
}

/// Email addresses of the token owner, from the REST API.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailQuery;

impl QuerySpec for EmailQuery {
    type Row = String;

    fn source(&self) -> Source {
        Source::Rest("/user/emails".to_string())
    }

    fn extract(&self, response: &Value, _: &Context<'_>, rows: &mut Vec<String>) -> Result<()> {
        let entries = response
            .as_array()
            .ok_or_else(|| YogitError::shape("email list is not an array"))?;
        for entry in entries {
            rows.push(str_at(entry, "/email")?.to_string());
        }
        Ok(())
    }

    fn render(&self, rows: &[String]) -> String {
        rows.join("\n")
    }
}

/// GraphQL API quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimit {
    /// Points allowed per window.
    pub limit: u64,
    /// Cost of this very query.
    pub cost: u64,
    /// Points left in the window.
    pub remaining: u64,
    /// End of the window.
    #[serde(rename = "resetAt")]
    pub reset_at: String,
}

/// Current API quota.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitQuery;

impl QuerySpec for RateLimitQuery {
    type Row = RateLimit;

    fn source(&self) -> Source {
        Source::GraphQl(RATE_LIMIT_STATEMENT)
    }

    fn extract(&self, response: &Value, _: &Context<'_>, rows: &mut Vec<RateLimit>) -> Result<()> {
        rows.push(parse_at(response, "/data/rateLimit")?);
        Ok(())
    }

    fn render(&self, rows: &[RateLimit]) -> String {
        rows.iter()
            .map(|r| format!("{}/{} until {}", r.remaining, r.limit, r.reset_at))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::query::engine::tests::{MockTransport, engine};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login() {
        let transport = Arc::new(MockTransport::with(vec![
            json!({"data": {"viewer": {"login": "user1"}}}),
        ]));

        let query = Query::new(LoginQuery)
            .execute(&engine(transport))
            .await
            .unwrap();

        assert_eq!(query.data(), ["user1"]);
        assert_eq!(query.tabulate(), "user1");
        query.print();
    }

    #[tokio::test]
    async fn test_emails_use_rest() {
        let transport = Arc::new(MockTransport::with(vec![json!([
            {"email": "email1"}, {"email": "email2"}, {"email": "email3"}
        ])]));

        let query = Query::new(EmailQuery)
            .execute(&engine(transport.clone()))
            .await
            .unwrap();

        assert_eq!(query.data(), ["email1", "email2", "email3"]);
        assert_eq!(*transport.endpoints.lock().unwrap(), ["/user/emails"]);
    }

    #[tokio::test]
    async fn test_rate_limit_render() {
        let transport = Arc::new(MockTransport::with(vec![json!({
            "data": {"rateLimit": {
                "limit": 5000,
                "cost": 1,
                "remaining": 4000,
                "resetAt": "2019-07-11T23:39:39Z"
            }}
        })]));

        let query = Query::new(RateLimitQuery)
            .execute(&engine(transport))
            .await
            .unwrap();

        assert_eq!(query.tabulate(), "4000/5000 until 2019-07-11T23:39:39Z");
        query.print();
    }

    #[tokio::test]
    async fn test_login_missing_key() {
        let transport = Arc::new(MockTransport::with(vec![json!({"data": {"viewer": {}}})]));

        let err = Query::new(LoginQuery)
            .execute(&engine(transport))
            .await
            .unwrap_err();

        assert!(matches!(err, YogitError::ResponseShape { .. }));
    }
}
