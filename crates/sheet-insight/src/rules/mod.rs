//! Threshold rules that turn a [`DatasetProfile`] into insight and
//! recommendation records.
//!
//! Each rule is a pure function of the profile (plus configuration) that
//! yields zero or more records; the engines only fix the evaluation order.
//! Rendering the records into the report is left to
//! [`crate::reporting::ReportGenerator`].

mod insights;
mod recommendations;

pub use insights::InsightEngine;
pub use recommendations::RecommendationEngine;

use crate::error::Result;
use crate::types::DatasetProfile;

/// An ordered rule set evaluated over one profile.
pub trait RuleEngine: Send + Sync {
    type Record;

    /// Evaluate every rule, in order.
    fn evaluate(&self, profile: &DatasetProfile) -> Result<Vec<Self::Record>>;
}
