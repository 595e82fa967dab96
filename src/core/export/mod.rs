//! Export orchestration and batch processing
//!
//! - [`category`] - the three output record streams
//! - [`batch`] - per-category buffering and file writing
//! - [`pagination`] - `$top`/`$skip` cursor
//! - [`coordinator`] - the definition → instance → child traversal
//! - [`summary`] - counts and errors reported at the end of a run

pub mod batch;
pub mod category;
pub mod coordinator;
pub mod pagination;
pub mod summary;

pub use batch::{BatchConfig, BatchResult, CategoryBuffer, ExportSink, FlushOutcome};
pub use category::OutputCategory;
pub use coordinator::{ExportCoordinator, ExportSettings};
pub use pagination::PageCursor;
pub use summary::{CategorySummary, ExportError, ExportErrorType, ExportSummary};
