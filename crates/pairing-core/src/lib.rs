//! Project Pairing Core
//!
//! Core types, validation, and error handling shared across Project Pairing
//! components.
//!
//! This crate provides:
//! - The submission record and the four model inputs
//! - The binarization rule that maps a 1-5 teamwork score to Solo/Team
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Features, Prediction, Preference, Probabilities, Submission, COLUMNS, MAX_WEEKLY_HOURS,
    SCORE_RANGE, TEAM_THRESHOLD,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Features, Prediction, Preference, Probabilities, Submission};
}
