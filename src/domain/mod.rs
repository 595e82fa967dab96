//! Domain models and types for Arx.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DefinitionId`], [`InstanceId`])
//! - **Record aliases** ([`Record`], [`FlatRecord`])
//! - **Instance window** ([`InstanceWindow`]) used to select review instances
//! - **Error types** ([`ArxError`], [`GraphError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, ArxError>`]:
//!
//! ```rust
//! use arx::domain::{ArxError, InstanceWindow, Result};
//!
//! fn example() -> Result<InstanceWindow> {
//!     let window = InstanceWindow::parse("2024-01-01", "2024-12-31")?;
//!     Ok(window)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod window;

pub use errors::{ArxError, GraphError};
pub use ids::{DefinitionId, InstanceId};
pub use record::{FlatRecord, Record};
pub use result::Result;
pub use window::{InstanceWindow, WindowDecision};
