// SPDX-License-Identifier: Apache-2.0

//! Tags of a repository, from the REST API.

use serde_json::Value;

use super::{Context, QuerySpec, Source, str_at};
use crate::Result;
use crate::error::YogitError;

/// Tag names of `owner/name`, in the order GitHub returns them.
#[derive(Debug, Clone)]
pub struct TagsQuery {
    repository: String,
}

impl TagsQuery {
    /// Creates the query for `repository` (`owner/name`).
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }
}

impl QuerySpec for TagsQuery {
    type Row = String;

    fn source(&self) -> Source {
        Source::Rest(format!("/repos/{}/tags", self.repository))
    }

    fn extract(&self, response: &Value, _: &Context<'_>, rows: &mut Vec<String>) -> Result<()> {
        let tags = response
            .as_array()
            .ok_or_else(|| YogitError::shape("tag list is not an array"))?;
        for tag in tags {
            rows.push(str_at(tag, "/name")?.to_string());
        }
        Ok(())
    }

    fn render(&self, rows: &[String]) -> String {
        rows.join("\n")
    }
}
