//! Artifact loading and inference contract tests
//!
//! Loads artifacts from disk the way the server does at startup and checks
//! the probability/label contract over the whole valid input space.

use pairing_classifiers::{
    ArtifactMetadata, Classifier, LogisticPipeline, LogisticRegression, ModelArtifact,
    OneHotEncoder, PreferenceClassifier, StandardScaler,
};
use pairing_core::{Error, Features, Preference};
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CLUBS: [&str; 8] = [
    "Coding Club",
    "Sports Club",
    "Music Club",
    "Cultural Club",
    "Drama Club",
    "Entrepreneurship Cell",
    "Literary Club",
    "Robotics Club",
];

fn pipeline() -> LogisticPipeline {
    LogisticPipeline {
        numeric_features: vec![
            "introversion_extraversion".to_string(),
            "risk_taking".to_string(),
            "weekly_hobby_hours".to_string(),
        ],
        scaler: StandardScaler {
            mean: vec![3.1, 2.9, 11.5],
            scale: vec![1.3, 1.2, 7.0],
        },
        encoder: OneHotEncoder {
            categories: CLUBS.iter().map(|c| c.to_string()).collect(),
        },
        classifier: LogisticRegression {
            coefficients: vec![1.1, 0.4, -0.15, -0.8, 0.7, 0.2, 0.3, 0.6, 0.5, -0.4, -0.1],
            intercept: -0.1,
        },
    }
}

fn write_artifact(document: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string_pretty(document).unwrap()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_load_container_artifact_from_disk() {
    let metadata = ArtifactMetadata {
        name: Some("teamwork-logreg".to_string()),
        version: Some("1".to_string()),
        ..Default::default()
    };
    let document = ModelArtifact::to_container(&pipeline(), &metadata).unwrap();
    let file = write_artifact(&document);

    let classifier = PreferenceClassifier::from_artifact(file.path()).unwrap();
    assert_eq!(classifier.name(), "teamwork-logreg");
    assert_eq!(classifier.categories().len(), CLUBS.len());

    let prediction = classifier
        .predict_one(&Features::new(5, 1, "Coding Club", 20))
        .await
        .unwrap();
    assert!(matches!(prediction.label, Preference::Solo | Preference::Team));
}

#[tokio::test]
async fn test_load_bare_artifact_from_disk() {
    let file = write_artifact(&serde_json::to_value(pipeline()).unwrap());

    let classifier = PreferenceClassifier::from_artifact(file.path()).unwrap();
    assert_eq!(classifier.name(), "teamwork-preference");
    assert_eq!(classifier.pipeline(), &pipeline());
}

#[test]
fn test_missing_artifact_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = PreferenceClassifier::from_artifact(dir.path().join("model.json"));
    assert!(matches!(result, Err(Error::Artifact(_))));
}

#[test]
fn test_truncated_artifact_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "model": {{ "scaler": {{ "mean": [1.0"#).unwrap();
    file.flush().unwrap();

    let result = PreferenceClassifier::from_artifact(file.path());
    assert!(matches!(result, Err(Error::Artifact(_))));
}

#[test]
fn test_inconsistent_artifact_is_fatal() {
    let mut broken = pipeline();
    broken.classifier.coefficients.truncate(5);
    let file = write_artifact(&serde_json::json!({ "model": broken }));

    let err = PreferenceClassifier::from_artifact(file.path()).unwrap_err();
    assert!(err.to_string().contains("coefficients"));
}

proptest! {
    #[test]
    fn prop_probabilities_are_consistent(
        introversion in 1i64..=5,
        risk in 1i64..=5,
        hours in 0i64..=168,
        club in 0usize..CLUBS.len(),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let classifier = PreferenceClassifier::new("prop", pipeline()).unwrap();
        let features = Features::new(introversion, risk, CLUBS[club], hours);

        let prediction = rt.block_on(classifier.predict_one(&features)).unwrap();
        let probs = prediction.probabilities;

        prop_assert!((probs.solo + probs.team - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&probs.solo));
        prop_assert!((0.0..=1.0).contains(&probs.team));

        let expected = if probs.team > probs.solo { Preference::Team } else { Preference::Solo };
        prop_assert_eq!(prediction.label, expected);
    }
}
