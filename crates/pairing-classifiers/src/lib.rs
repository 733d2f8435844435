//! Project Pairing Classifiers
//!
//! Inference for the pre-trained teamwork preference model.
//!
//! The model is fitted offline and exported as a JSON artifact; this crate
//! loads it once, validates it, and serves single-row and batch predictions
//! through the [`Classifier`] trait. There is no training code here.

pub mod classifier;
pub mod model_loader;
pub mod pipeline;
pub mod preference;

pub use classifier::Classifier;
pub use model_loader::{ArtifactMetadata, ModelArtifact, MODEL_KEY};
pub use pipeline::{LogisticPipeline, LogisticRegression, OneHotEncoder, StandardScaler};
pub use preference::PreferenceClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::model_loader::ModelArtifact;
    pub use crate::preference::PreferenceClassifier;
}
