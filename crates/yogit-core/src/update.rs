// SPDX-License-Identifier: Apache-2.0

//! Release check against the tags of the yogit repository.

use std::fmt;

use tracing::{debug, warn};

use crate::query::tags::TagsQuery;
use crate::query::{Query, QueryEngine};

/// Version of the running binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// An `X.Y.Z` release number. A leading `v` is accepted.
///
/// # Examples
///
/// ```
/// use yogit_core::update::Version;
///
/// assert!(Version::parse("2.20.20").unwrap() > Version::parse("v2.3.30").unwrap());
/// assert!(Version::parse("latest").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(pub u64, pub u64, pub u64);

impl Version {
    /// Parses `X.Y.Z`, `None` for anything else.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.strip_prefix('v').unwrap_or(text);
        let mut parts = text.split('.').map(str::parse::<u64>);
        let version = Self(
            parts.next()?.ok()?,
            parts.next()?.ok()?,
            parts.next()?.ok()?,
        );
        parts.next().is_none().then_some(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// Highest release among `tags`; tags that are not `X.Y.Z` are ignored.
#[must_use]
pub fn latest_version<S: AsRef<str>>(tags: &[S]) -> Option<Version> {
    tags.iter().filter_map(|t| Version::parse(t.as_ref())).max()
}

/// A newer release is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Repository the release was found in.
    pub repository: String,
    /// Running version.
    pub current: Version,
    /// Latest published version.
    pub latest: Version,
}

impl fmt::Display for UpdateNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "You are using yogit {}, however version {} is available 🎁",
            self.current, self.latest
        )?;
        writeln!(f, "You can upgrade it with `cargo install yogit` 🚀")?;
        write!(
            f,
            "Changelog: https://github.com/{}/blob/{}/CHANGELOG.md",
            self.repository, self.latest
        )
    }
}

/// Compares the running version with the latest tag of a repository.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    repository: String,
    current: String,
}

impl UpdateChecker {
    /// Creates a checker of `repository` for the `current` version.
    pub fn new(repository: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            current: current.into(),
        }
    }

    /// Returns a notice when a newer release exists.
    ///
    /// Never fails: any error is logged and reported as up to date.
    pub async fn check(&self, engine: &QueryEngine) -> Option<UpdateNotice> {
        let Some(current) = Version::parse(&self.current) else {
            warn!(version = %self.current, "Running version is not X.Y.Z");
            return None;
        };

        let tags = match Query::new(TagsQuery::new(self.repository.clone()))
            .execute(engine)
            .await
        {
            Ok(query) => query.into_data(),
            Err(e) => {
                warn!(error = %e, "Update check failed");
                return None;
            }
        };

        let latest = latest_version(&tags)?;
        debug!(%current, %latest, "Update check");
        (current < latest).then(|| UpdateNotice {
            repository: self.repository.clone(),
            current,
            latest,
        })
    }
}
