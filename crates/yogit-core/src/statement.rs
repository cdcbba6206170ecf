// SPDX-License-Identifier: Apache-2.0

//! Statement preparation.
//!
//! Substitution is safe: a placeholder is replaced only when it is in the
//! recognized set and its resolver yields a value. Everything else,
//! including GraphQL variable references such as `$organization`, is left
//! verbatim so a statement can be prepared in several passes.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::statements::{AFTER, LOGIN, OFFSET, TODAY};
use crate::utils::today_earliest_str;

/// Resolves a placeholder name to its value.
pub trait Resolve {
    /// Returns the value of `token`, or `None` to leave it untouched.
    fn resolve(&self, token: &str) -> Option<String>;
}

impl<K, V> Resolve for HashMap<K, V>
where
    K: std::borrow::Borrow<str> + std::hash::Hash + Eq,
    V: AsRef<str>,
{
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).map(|v| v.as_ref().to_string())
    }
}

impl<K, V> Resolve for BTreeMap<K, V>
where
    K: std::borrow::Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).map(|v| v.as_ref().to_string())
    }
}

/// Standard resolver used by the query engine.
///
/// `$login` comes from the account settings, `$today` from the clock and
/// any other token from the per-query bindings.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    login: Option<String>,
    today: Option<String>,
    bindings: BTreeMap<String, String>,
}

impl VariableResolver {
    /// Creates a resolver from the viewer login, the current instant and extra bindings.
    #[must_use]
    pub fn new(
        login: Option<String>,
        now: DateTime<Utc>,
        bindings: BTreeMap<String, String>,
    ) -> Self {
        Self {
            login,
            today: Some(today_earliest_str(now)),
            bindings,
        }
    }
}

impl Resolve for VariableResolver {
    fn resolve(&self, token: &str) -> Option<String> {
        match token {
            LOGIN => self.login.clone(),
            TODAY => self.today.clone(),
            other => self.bindings.get(other).cloned(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitutes the recognized placeholders of `text`.
///
/// Both `$name` and `${name}` are understood; identifiers are matched
/// greedily, so `$offset` never matches a recognized `off`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use yogit_core::statement::prepare;
///
/// let resolver = HashMap::from([("login", "user1")]);
/// let prepared = prepare("login: $login, date: $today", &["login"], &resolver);
/// assert_eq!(prepared, "login: user1, date: $today");
/// ```
#[must_use]
pub fn prepare(text: &str, recognized: &[&str], resolver: &dyn Resolve) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after_dollar = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after_dollar.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if is_identifier(&braced[..end]) => (&braced[..end], end + 2),
                _ => ("", 0),
            }
        } else {
            let len = after_dollar
                .char_indices()
                .take_while(|&(i, c)| if i == 0 { is_ident_start(c) } else { is_ident_char(c) })
                .count();
            (&after_dollar[..len], len)
        };

        let value = if name.is_empty() || !recognized.contains(&name) {
            None
        } else {
            resolver.resolve(name)
        };

        match value {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(&after_dollar[..consumed]);
            }
        }
        rest = &after_dollar[consumed..];
    }
    out.push_str(rest);
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_char)
}

/// Renders the cursor clause appended after the page size.
///
/// Empty for the first page, `, after: "<cursor>"` afterwards. The cursor is
/// JSON-quoted so it cannot break out of the string literal.
#[must_use]
pub fn after_clause(cursor: Option<&str>) -> String {
    match cursor {
        None => String::new(),
        Some(cursor) => format!(
            ", after: {}",
            serde_json::Value::String(cursor.to_string())
        ),
    }
}

/// Fills the page size and cursor placeholders of a prepared statement.
///
/// # Examples
///
/// ```
/// use yogit_core::statement::prepare_pagination;
///
/// let text = "edges(first: $offset $after)";
/// assert_eq!(prepare_pagination(text, 50, None), "edges(first: 50 )");
/// assert_eq!(
///     prepare_pagination(text, 50, Some("Y3Vyc29y")),
///     r#"edges(first: 50 , after: "Y3Vyc29y")"#
/// );
/// ```
#[must_use]
pub fn prepare_pagination(text: &str, page_size: u32, cursor: Option<&str>) -> String {
    let values = HashMap::from([
        (OFFSET, page_size.to_string()),
        (AFTER, after_clause(cursor)),
    ]);
    prepare(text, &[OFFSET, AFTER], &values)
}
