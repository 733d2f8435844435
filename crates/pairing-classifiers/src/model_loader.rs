//! Model artifact loading
//!
//! Artifacts are JSON documents. The export tooling wraps the fitted pipeline
//! in a container object:
//!
//! ```json
//! { "model": { "scaler": ..., "encoder": ..., "classifier": ... },
//!   "metadata": { "name": "teamwork-logreg", "version": "3" } }
//! ```
//!
//! A bare pipeline document (no `model` key) is accepted as well.

use crate::pipeline::LogisticPipeline;
use pairing_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Key under which container artifacts store the pipeline
pub const MODEL_KEY: &str = "model";

/// Optional descriptive metadata stored next to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Model name/identifier
    #[serde(default)]
    pub name: Option<String>,

    /// Model version
    #[serde(default)]
    pub version: Option<String>,

    /// When the model was fitted
    #[serde(default)]
    pub trained_at: Option<String>,

    /// Number of labeled rows used for fitting
    #[serde(default)]
    pub training_rows: Option<u64>,
}

/// A loaded and validated model artifact
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    /// The fitted pipeline
    pub pipeline: LogisticPipeline,

    /// Container metadata, when present
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Read, unwrap and validate an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading model artifact from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::artifact(format!("failed to read {}: {}", path.display(), e))
        })?;

        let artifact = Self::from_json_str(&content).map_err(|e| match e {
            Error::Artifact(msg) => Error::artifact(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        info!(
            "Loaded model artifact {} (version {}, {} categories)",
            artifact.metadata.name.as_deref().unwrap_or("unnamed"),
            artifact.metadata.version.as_deref().unwrap_or("unknown"),
            artifact.pipeline.encoder.categories.len()
        );

        Ok(artifact)
    }

    /// Parse an artifact document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| Error::artifact(format!("invalid JSON: {}", e)))?;
        Self::from_value(document)
    }

    /// Unwrap the container (if any) and validate the pipeline
    pub fn from_value(document: serde_json::Value) -> Result<Self> {
        let (model, metadata) = match document {
            serde_json::Value::Object(mut container) if container.contains_key(MODEL_KEY) => {
                debug!("Artifact is a container, extracting '{}'", MODEL_KEY);
                let metadata = match container.remove("metadata") {
                    Some(value) => serde_json::from_value(value).map_err(|e| {
                        Error::artifact(format!("invalid metadata: {}", e))
                    })?,
                    None => ArtifactMetadata::default(),
                };
                // The key is present, so remove cannot miss
                let model = container.remove(MODEL_KEY).unwrap_or_default();
                (model, metadata)
            }
            other => (other, ArtifactMetadata::default()),
        };

        let pipeline: LogisticPipeline = serde_json::from_value(model)
            .map_err(|e| Error::artifact(format!("invalid pipeline: {}", e)))?;
        pipeline.validate()?;

        Ok(Self { pipeline, metadata })
    }

    /// Wrap a pipeline into the container document written by the export tooling
    pub fn to_container(pipeline: &LogisticPipeline, metadata: &ArtifactMetadata) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            MODEL_KEY: serde_json::to_value(pipeline)?,
            "metadata": serde_json::to_value(metadata)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{
        "scaler": { "mean": [3.0, 3.0, 10.0], "scale": [1.2, 1.1, 6.0] },
        "encoder": { "categories": ["Coding Club", "Sports Club", "Music Club"] },
        "classifier": { "coefficients": [0.9, 0.4, -0.05, -0.6, 0.7, 0.1], "intercept": -0.2 }
    }"#;

    #[test]
    fn test_bare_pipeline() {
        let artifact = ModelArtifact::from_json_str(BARE).unwrap();
        assert_eq!(artifact.pipeline.encoder.categories.len(), 3);
        assert_eq!(
            artifact.pipeline.numeric_features,
            vec!["introversion_extraversion", "risk_taking", "weekly_hobby_hours"]
        );
        assert_eq!(artifact.metadata, ArtifactMetadata::default());
    }

    #[test]
    fn test_container_is_unwrapped() {
        let document = format!(
            r#"{{ "model": {}, "metadata": {{ "name": "teamwork-logreg", "version": "3" }} }}"#,
            BARE
        );
        let artifact = ModelArtifact::from_json_str(&document).unwrap();
        assert_eq!(artifact.metadata.name.as_deref(), Some("teamwork-logreg"));
        assert_eq!(artifact.metadata.version.as_deref(), Some("3"));

        let bare = ModelArtifact::from_json_str(BARE).unwrap();
        assert_eq!(artifact.pipeline, bare.pipeline);
    }

    #[test]
    fn test_container_round_trip() {
        let bare = ModelArtifact::from_json_str(BARE).unwrap();
        let metadata = ArtifactMetadata {
            name: Some("teamwork".to_string()),
            ..Default::default()
        };
        let container = ModelArtifact::to_container(&bare.pipeline, &metadata).unwrap();
        let loaded = ModelArtifact::from_value(container).unwrap();
        assert_eq!(loaded.pipeline, bare.pipeline);
        assert_eq!(loaded.metadata, metadata);
    }

    #[test]
    fn test_corrupt_documents_fail() {
        assert!(matches!(
            ModelArtifact::from_json_str("not json"),
            Err(Error::Artifact(_))
        ));
        assert!(matches!(
            ModelArtifact::from_json_str(r#"{ "model": { "scaler": 1 } }"#),
            Err(Error::Artifact(_))
        ));
        assert!(matches!(
            ModelArtifact::from_json_str("[1, 2, 3]"),
            Err(Error::Artifact(_))
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = ModelArtifact::load("/nonexistent/model.json").unwrap_err();
        assert!(err.to_string().contains("model.json"));
    }
}
