// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Yogit Core
//!
//! Core library for yogit - GitHub activity reports from the command line.
//!
//! This crate provides:
//! - A catalogue of GraphQL statements and a safe placeholder preparer
//! - An HTTP transport to the GitHub GraphQL and REST APIs
//! - A query engine with cursor pagination, and every concrete query
//! - Local account settings, configuration and the SCRUM report template
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use secrecy::SecretString;
//! use yogit_core::{GitHubClient, Query, QueryEngine, SettingsStore, SystemClock, load_config};
//! use yogit_core::query::reviews::ReviewRequestedQuery;
//!
//! # async fn example() -> yogit_core::Result<()> {
//! let config = load_config()?;
//! let settings = SettingsStore::default().load();
//! let token = SecretString::from(settings.token.clone());
//!
//! let client = GitHubClient::from_config(&config.github, &token)?;
//! let engine = QueryEngine::new(Arc::new(client), Arc::new(settings), Arc::new(SystemClock));
//!
//! let query = Query::new(ReviewRequestedQuery::new(false)).execute(&engine).await?;
//! query.print();
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`statements`] - GraphQL statement catalogue
//! - [`statement`] - Placeholder substitution and pagination clauses
//! - [`github`] - HTTP transport
//! - [`query`] - Query descriptors, engine and concrete queries
//! - [`settings`] - Account settings and SCRUM report template files
//! - [`config`] - Configuration loading and paths

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{ErrorKind, YogitError};

/// Convenience Result type for yogit operations.
///
/// This is equivalent to `std::result::Result<T, YogitError>`.
pub type Result<T> = std::result::Result<T, YogitError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, GitHubConfig, QueryConfig, UpdateConfig, config_dir, config_file_path,
    load_config, scrum_report_file_path, settings_file_path,
};

// ============================================================================
// Settings
// ============================================================================

pub use settings::{
    AccountSettings, ScrumReportStore, ScrumReportTemplate, SettingsProvider, SettingsStore,
};

// ============================================================================
// Transport
// ============================================================================

pub use github::{GitHubClient, GraphQlRequest, Transport};

// ============================================================================
// Queries
// ============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use query::{Query, QueryEngine, QuerySpec};
pub use statements::Statement;

// ============================================================================
// Reports and Updates
// ============================================================================

pub use scrum::ScrumReport;
pub use update::{UpdateChecker, UpdateNotice, Version};

// ============================================================================
// Modules
// ============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod github;
pub mod query;
pub mod scrum;
pub mod settings;
pub mod statement;
pub mod statements;
pub mod table;
pub mod update;
pub mod utils;
