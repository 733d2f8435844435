//! Summary statistics over the submission dataset
//!
//! Computes everything the dashboard shows in one pass over the rows:
//! preference and trait distributions, the most recent submissions, and the
//! classifier's accuracy against rows that carry a known label.

use pairing_classifiers::Classifier;
use pairing_core::{Features, Preference, Result, Submission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Number of trailing rows reported as recent submissions
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// 2x2 table of actual (rows) vs predicted (columns) labels, Solo first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfusionMatrix(pub [[u64; 2]; 2]);

impl ConfusionMatrix {
    pub fn record(&mut self, actual: Preference, predicted: Preference) {
        self.0[actual.index()][predicted.index()] += 1;
    }

    pub fn total(&self) -> u64 {
        self.0.iter().flatten().sum()
    }

    /// Diagonal count
    pub fn correct(&self) -> u64 {
        self.0[0][0] + self.0[1][1]
    }

    /// Fraction of correct predictions; 0 for an empty matrix
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }
}

/// Dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    /// Binarized teamwork preference counts; absent labels are omitted
    pub preference_distribution: BTreeMap<Preference, u64>,

    /// Raw introversion/extraversion score counts
    pub introversion_distribution: BTreeMap<i64, u64>,

    /// Raw risk-taking score counts
    pub risk_taking_distribution: BTreeMap<i64, u64>,

    /// Trailing rows in dataset order, all columns
    pub recent_submissions: Vec<Submission>,

    /// Classifier accuracy over complete labeled rows
    pub accuracy: f64,

    pub confusion_matrix: ConfusionMatrix,
}

/// Computes [`DataSummary`] from dataset rows
pub struct Aggregator {
    classifier: Arc<dyn Classifier>,
    recent_limit: usize,
}

impl Aggregator {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Summarize the given rows. Never mutates anything; degenerate input
    /// yields zero counts rather than an error.
    pub async fn summarize(&self, records: &[Submission]) -> Result<DataSummary> {
        let (accuracy, confusion_matrix) = self.evaluate(records).await?;

        Ok(DataSummary {
            preference_distribution: preference_distribution(records),
            introversion_distribution: value_counts(records, |r| r.introversion_extraversion),
            risk_taking_distribution: value_counts(records, |r| r.risk_taking),
            recent_submissions: recent(records, self.recent_limit),
            accuracy,
            confusion_matrix,
        })
    }

    /// Accuracy and confusion matrix over complete labeled rows
    async fn evaluate(&self, records: &[Submission]) -> Result<(f64, ConfusionMatrix)> {
        let (truth, rows): (Vec<Preference>, Vec<Features>) = records
            .iter()
            .filter_map(|r| Some((r.preference()?, r.features()?)))
            .unzip();

        if rows.is_empty() {
            debug!("No complete labeled rows; skipping evaluation");
            return Ok((0.0, ConfusionMatrix::default()));
        }

        let predicted = self.classifier.predict_batch(&rows).await?;

        let mut matrix = ConfusionMatrix::default();
        for (actual, predicted) in truth.iter().zip(&predicted) {
            matrix.record(*actual, *predicted);
        }

        debug!(
            "Evaluated {} on {} rows: {}/{} correct",
            self.classifier.name(),
            rows.len(),
            matrix.correct(),
            matrix.total()
        );

        Ok((matrix.accuracy(), matrix))
    }
}

/// Binarized preference counts over rows with a known score
pub fn preference_distribution(records: &[Submission]) -> BTreeMap<Preference, u64> {
    let mut counts = BTreeMap::new();
    for preference in records.iter().filter_map(Submission::preference) {
        *counts.entry(preference).or_insert(0) += 1;
    }
    counts
}

/// Frequency of each known value of an integer column
pub fn value_counts(
    records: &[Submission],
    field: impl Fn(&Submission) -> Option<i64>,
) -> BTreeMap<i64, u64> {
    let mut counts = BTreeMap::new();
    for value in records.iter().filter_map(field) {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Last `limit` rows in dataset order
pub fn recent(records: &[Submission], limit: usize) -> Vec<Submission> {
    let start = records.len().saturating_sub(limit);
    records[start..].to_vec()
}
