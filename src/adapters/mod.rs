//! External system integrations for Arx.
//!
//! - [`graph`] - Microsoft Graph identity governance (access reviews)
//!
//! The export traversal depends only on the [`graph::GovernanceSource`]
//! trait, so tests can substitute an in-memory source for the REST client.

pub mod graph;
