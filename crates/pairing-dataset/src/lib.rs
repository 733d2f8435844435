//! Project Pairing Dataset
//!
//! Persistence and analytics for submissions.
//!
//! Provides:
//! - An append-only CSV store that is the sole writer of the dataset
//! - Distribution, recent-submission and accuracy summaries for the dashboard

pub mod store;
pub mod summary;

pub use store::DatasetStore;
pub use summary::{Aggregator, ConfusionMatrix, DataSummary, DEFAULT_RECENT_LIMIT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::store::DatasetStore;
    pub use crate::summary::{Aggregator, DataSummary};
}
