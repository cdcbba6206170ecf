// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Provides the HTTP transport used by every query.

pub mod client;

pub use client::{GitHubClient, GraphQlRequest, Transport, classify};
