//! Shared application state and request execution

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use pairing_classifiers::{Classifier, PreferenceClassifier};
use pairing_core::{Features, Prediction, Submission};
use pairing_dataset::{Aggregator, DataSummary, DatasetStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;

/// Timestamp format written to the dataset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Pre-trained preference classifier, read-only after startup
    pub classifier: Arc<dyn Classifier>,

    /// Append-only submission dataset
    pub store: Arc<DatasetStore>,

    /// Dashboard statistics over the dataset
    pub aggregator: Arc<Aggregator>,

    /// Prometheus metrics handle for rendering; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Initialize application state from configuration.
    ///
    /// Fails if the model artifact is missing or unusable.
    pub fn new(config: ServerConfig) -> Result<Self> {
        info!("Initializing application state");

        info!("Loading classifier from: {}", config.model_path.display());
        let classifier = PreferenceClassifier::from_artifact(&config.model_path)
            .with_context(|| format!("failed to load model {}", config.model_path.display()))?;
        info!(
            "Loaded classifier {} with {} known activities",
            classifier.name(),
            classifier.categories().len()
        );

        Ok(Self::from_parts(config, Arc::new(classifier)))
    }

    /// Assemble state around an already constructed classifier
    pub fn from_parts(config: ServerConfig, classifier: Arc<dyn Classifier>) -> Self {
        info!("Dataset: {}", config.dataset_path.display());
        let store = DatasetStore::new(config.dataset_path.clone());
        let aggregator = Aggregator::new(classifier.clone()).with_recent_limit(config.recent_limit);

        Self {
            config: Arc::new(config),
            classifier,
            store: Arc::new(store),
            aggregator: Arc::new(aggregator),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Validate and classify one row without touching the dataset
pub async fn classify(state: &AppState, features: &Features) -> pairing_core::Result<Prediction> {
    features.validate(state.classifier.categories())?;
    state.classifier.predict_one(features).await
}

/// Classify a row and log it to the dataset.
///
/// The append is best-effort: a failure is logged and counted, and the
/// prediction is still returned.
pub async fn execute_predict(
    state: &AppState,
    features: Features,
    request_id: &str,
) -> pairing_core::Result<Prediction> {
    let prediction = classify(state, &features).await?;

    metrics::counter!("pairing_predictions_total", "label" => prediction.label.as_str())
        .increment(1);
    debug!(
        request_id,
        "Predicted {} (Solo={:.3}, Team={:.3})",
        prediction.label,
        prediction.probabilities.solo,
        prediction.probabilities.team
    );

    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let row = Submission::from_prediction(&features, prediction.label, timestamp);

    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.append(&row)).await;

    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(e) => Some(format!("append task failed: {}", e)),
    };

    if let Some(reason) = failure {
        metrics::counter!("pairing_dataset_append_failures_total").increment(1);
        warn!(
            request_id,
            "Failed to log submission to {}: {}",
            state.store.path().display(),
            reason
        );
    }

    Ok(prediction)
}

/// Read the whole dataset and compute the dashboard summary
pub async fn execute_summary(state: &AppState) -> pairing_core::Result<DataSummary> {
    metrics::counter!("pairing_summary_requests_total").increment(1);

    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.read_all())
        .await
        .map_err(|e| pairing_core::Error::internal(format!("read task failed: {}", e)))??;

    debug!("Summarizing {} rows", records.len());
    state.aggregator.summarize(&records).await
}
