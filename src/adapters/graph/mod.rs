//! Microsoft Graph access review adapter
//!
//! [`GovernanceSource`] is the seam the export traversal is written against;
//! [`GraphGovernanceClient`] implements it over the Graph REST API.

pub mod auth;
pub mod client;
pub mod models;
pub mod source;

pub use auth::{TokenProvider, GRAPH_SCOPE};
pub use client::GraphGovernanceClient;
pub use source::GovernanceSource;
