//! Output categories
//!
//! Each category owns one output directory and one file name prefix.

use std::fmt;

/// One of the three record streams written by an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCategory {
    /// Review instances merged with their parent definition
    Instances,
    /// Decision items recorded against an instance
    Decisions,
    /// Reviewers contacted for an instance
    Reviewers,
}

impl OutputCategory {
    /// All categories in output order
    pub const ALL: [OutputCategory; 3] = [
        OutputCategory::Instances,
        OutputCategory::Decisions,
        OutputCategory::Reviewers,
    ];

    /// Directory under the output root, also used as the file name prefix
    pub fn name(&self) -> &'static str {
        match self {
            OutputCategory::Instances => "ReviewInstances",
            OutputCategory::Decisions => "ReviewInstanceDecisionItems",
            OutputCategory::Reviewers => "ReviewInstanceContactedReviewers",
        }
    }

    /// File name for the given 1-based batch index
    ///
    /// ```
    /// use arx::core::export::OutputCategory;
    ///
    /// assert_eq!(OutputCategory::Instances.file_name(3), "ReviewInstances_3.json");
    /// ```
    pub fn file_name(&self, index: u32) -> String {
        format!("{}_{}.json", self.name(), index)
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
