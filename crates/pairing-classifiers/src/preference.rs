//! Teamwork preference classifier backed by a fitted logistic pipeline

use crate::classifier::Classifier;
use crate::model_loader::ModelArtifact;
use crate::pipeline::LogisticPipeline;
use async_trait::async_trait;
use pairing_core::{Features, Prediction, Preference, Result};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Classifier serving the pre-trained teamwork preference model.
///
/// Loaded once at startup and shared read-only across requests.
#[derive(Debug)]
pub struct PreferenceClassifier {
    name: String,
    pipeline: LogisticPipeline,
}

impl PreferenceClassifier {
    /// Wrap an already validated pipeline
    pub fn new(name: impl Into<String>, pipeline: LogisticPipeline) -> Result<Self> {
        pipeline.validate()?;
        Ok(Self {
            name: name.into(),
            pipeline,
        })
    }

    /// Load from an artifact file. Fails if the file is missing or corrupt.
    pub fn from_artifact(path: impl AsRef<Path>) -> Result<Self> {
        let artifact = ModelArtifact::load(path)?;
        let name = artifact
            .metadata
            .name
            .unwrap_or_else(|| "teamwork-preference".to_string());
        Self::new(name, artifact.pipeline)
    }

    pub fn pipeline(&self) -> &LogisticPipeline {
        &self.pipeline
    }
}

#[async_trait]
impl Classifier for PreferenceClassifier {
    async fn predict_one(&self, features: &Features) -> Result<Prediction> {
        let start = Instant::now();

        let probabilities = self.pipeline.predict_proba(features)?;
        let prediction = Prediction::from_probabilities(probabilities);

        let latency = start.elapsed();
        metrics::histogram!("pairing_inference_latency_us", "mode" => "single")
            .record(latency.as_micros() as f64);
        debug!(
            "Classified row as {} (team={:.3}) in {}us",
            prediction.label,
            probabilities.team,
            latency.as_micros()
        );

        Ok(prediction)
    }

    async fn predict_batch(&self, rows: &[Features]) -> Result<Vec<Preference>> {
        let start = Instant::now();

        let labels = rows
            .iter()
            .map(|row| self.pipeline.predict_proba(row).map(|p| p.label()))
            .collect::<Result<Vec<_>>>()?;

        metrics::histogram!("pairing_inference_latency_us", "mode" => "batch")
            .record(start.elapsed().as_micros() as f64);
        debug!("Classified batch of {} rows", rows.len());

        Ok(labels)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn categories(&self) -> &[String] {
        &self.pipeline.encoder.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{LogisticRegression, OneHotEncoder, StandardScaler};

    fn classifier() -> PreferenceClassifier {
        let pipeline = LogisticPipeline {
            numeric_features: vec![
                "introversion_extraversion".to_string(),
                "risk_taking".to_string(),
                "weekly_hobby_hours".to_string(),
            ],
            scaler: StandardScaler {
                mean: vec![3.0, 3.0, 10.0],
                scale: vec![1.0, 1.0, 5.0],
            },
            encoder: OneHotEncoder {
                categories: vec!["Coding Club".to_string(), "Drama Club".to_string()],
            },
            classifier: LogisticRegression {
                coefficients: vec![1.2, 0.3, -0.1, -0.5, 0.8],
                intercept: 0.1,
            },
        };
        PreferenceClassifier::new("test-model", pipeline).unwrap()
    }

    #[tokio::test]
    async fn test_predict_one_probabilities_sum_to_one() {
        let classifier = classifier();
        let prediction = classifier
            .predict_one(&Features::new(5, 1, "Coding Club", 20))
            .await
            .unwrap();

        let probs = prediction.probabilities;
        assert!((probs.solo + probs.team - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&probs.solo));
        assert!((0.0..=1.0).contains(&probs.team));
        assert_eq!(prediction.label, probs.label());
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let classifier = classifier();
        let rows = vec![
            Features::new(1, 1, "Coding Club", 40),
            Features::new(5, 5, "Drama Club", 2),
            Features::new(3, 3, "Drama Club", 10),
        ];

        let batch = classifier.predict_batch(&rows).await.unwrap();
        assert_eq!(batch.len(), rows.len());

        for (row, label) in rows.iter().zip(&batch) {
            let single = classifier.predict_one(row).await.unwrap();
            assert_eq!(single.label, *label);
        }
        assert_eq!(batch[0], Preference::Solo);
        assert_eq!(batch[1], Preference::Team);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        assert!(classifier().predict_batch(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn test_exposes_categories() {
        let classifier = classifier();
        assert_eq!(classifier.name(), "test-model");
        assert_eq!(classifier.categories(), ["Coding Club", "Drama Club"]);
    }

    #[test]
    fn test_rejects_inconsistent_pipeline() {
        let mut pipeline = classifier().pipeline().clone();
        pipeline.encoder.categories.push("Music Club".to_string());
        assert!(PreferenceClassifier::new("broken", pipeline).is_err());
    }
}
