// SPDX-License-Identifier: Apache-2.0

//! Organizations of the viewer and their members.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Context, PageInfo, QuerySpec, Source, array_at, at, nodes, parse_at};
use crate::Result;
use crate::error::YogitError;
use crate::statements::{ORGANIZATION_LIST_STATEMENT, ORGANIZATION_MEMBER_LIST_STATEMENT};

const NO_ORGANIZATION: &str = "You do not belong to any organization 😿";

/// One organization of the viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Organization login.
    pub login: String,
    /// Profile URL.
    pub url: String,
}

/// Organizations the viewer belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationListQuery;

impl QuerySpec for OrganizationListQuery {
    type Row = Organization;

    fn source(&self) -> Source {
        Source::GraphQl(ORGANIZATION_LIST_STATEMENT)
    }

    fn extract(
        &self,
        response: &Value,
        _: &Context<'_>,
        rows: &mut Vec<Organization>,
    ) -> Result<()> {
        rows.extend(nodes::<Organization>(
            response,
            "/data/viewer/organizations/edges",
        )?);
        Ok(())
    }

    fn sort(&self, rows: &mut [Organization]) {
        rows.sort_by_key(|o| o.login.to_lowercase());
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["ORGANIZATION", "URL"]
    }

    fn cells(&self, row: &Organization) -> Vec<String> {
        vec![row.login.clone(), row.url.clone()]
    }

    fn empty_message(&self) -> &'static str {
        NO_ORGANIZATION
    }
}

/// Picks the organization a command applies to.
///
/// Without `requested`, the viewer must belong to exactly one organization.
/// With it, the name must match one of `known`, ignoring case; the known
/// spelling is returned.
///
/// # Examples
///
/// ```
/// use yogit_core::query::organizations::resolve_organization;
///
/// let known = vec!["Orga1".to_string()];
/// assert_eq!(resolve_organization(&known, None).unwrap(), "Orga1");
/// assert_eq!(resolve_organization(&known, Some("orga1")).unwrap(), "Orga1");
/// assert!(resolve_organization(&known, Some("orga2")).is_err());
/// ```
pub fn resolve_organization(known: &[String], requested: Option<&str>) -> Result<String> {
    match requested {
        Some(requested) => known
            .iter()
            .find(|login| login.eq_ignore_ascii_case(requested))
            .cloned()
            .ok_or_else(|| {
                YogitError::invalid(format!(
                    "Unrecognized {requested} organization (see `yogit orga list`)"
                ))
            }),
        None => match known {
            [] => Err(YogitError::invalid(NO_ORGANIZATION)),
            [only] => Ok(only.clone()),
            _ => Err(YogitError::invalid(
                "You belong to more than one organization (see `yogit orga list`), \
                 use `--orga` option to discriminate",
            )),
        },
    }
}

/// One member of an organization.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Member {
    /// Member login.
    pub login: String,
    /// Public email, empty when hidden.
    pub email: String,
    /// Free-form location, empty when unset.
    pub location: String,
    /// `ADMIN` or `MEMBER`.
    pub role: String,
}

#[derive(Deserialize)]
struct MemberNode {
    login: String,
    email: Option<String>,
    location: Option<String>,
}

/// Members of one organization, with their role.
#[derive(Debug, Clone)]
pub struct OrganizationMemberListQuery {
    organization: String,
}

impl OrganizationMemberListQuery {
    /// Creates the query for `organization`.
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    /// Organization the members belong to.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }
}

const MEMBERS: &str = "/data/viewer/organization/membersWithRole";

impl QuerySpec for OrganizationMemberListQuery {
    type Row = Member;

    fn source(&self) -> Source {
        Source::GraphQl(ORGANIZATION_MEMBER_LIST_STATEMENT)
    }

    fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert(
            "organization".to_string(),
            Value::String(self.organization.clone()),
        );
        variables
    }

    fn page_size(&self) -> Option<u32> {
        Some(50)
    }

    fn extract(&self, response: &Value, _: &Context<'_>, rows: &mut Vec<Member>) -> Result<()> {
        for edge in array_at(response, &format!("{MEMBERS}/edges"))? {
            let node: MemberNode = parse_at(edge, "/node")?;
            let role = at(edge, "/role")?
                .as_str()
                .ok_or_else(|| YogitError::shape("member role is not a string"))?;
            rows.push(Member {
                login: node.login,
                email: node.email.unwrap_or_default(),
                location: node.location.unwrap_or_default(),
                role: role.to_string(),
            });
        }
        Ok(())
    }

    fn page_info(&self, response: &Value) -> Result<PageInfo> {
        parse_at(response, &format!("{MEMBERS}/pageInfo"))
    }

    fn sort(&self, rows: &mut [Member]) {
        rows.sort_by_key(|m| m.login.to_lowercase());
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["NAME", "EMAIL", "LOCATION", "ROLE"]
    }

    fn cells(&self, row: &Member) -> Vec<String> {
        vec![
            row.login.clone(),
            row.email.clone(),
            row.location.clone(),
            row.role.clone(),
        ]
    }

    fn empty_message(&self) -> &'static str {
        "No member found 😿"
    }

    fn render(&self, rows: &[Member]) -> String {
        if rows.is_empty() {
            return self.empty_message().to_string();
        }
        format!(
            "{}'s members\n{}\nCount: {}",
            self.organization,
            self.table(rows),
            rows.len()
        )
    }
}
