//! Classifier trait

use async_trait::async_trait;
use pairing_core::{Features, Prediction, Preference, Result};

/// Trait for teamwork preference classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single row, returning the label and both class probabilities
    async fn predict_one(&self, features: &Features) -> Result<Prediction>;

    /// Classify many rows, returning one label per row in input order
    async fn predict_batch(&self, rows: &[Features]) -> Result<Vec<Preference>> {
        let mut labels = Vec::with_capacity(rows.len());
        for row in rows {
            labels.push(self.predict_one(row).await?.label);
        }
        Ok(labels)
    }

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Activity labels the model was trained on, in encoder order
    fn categories(&self) -> &[String];
}
