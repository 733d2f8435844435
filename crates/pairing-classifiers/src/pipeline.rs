//! Preprocessing + logistic regression pipeline
//!
//! Rust-native form of the exported training pipeline:
//! - `StandardScaler` over the numeric inputs
//! - `OneHotEncoder` over `club_top1`
//! - `LogisticRegression` producing P(Team)
//!
//! Feature vector layout is numeric columns first (in `numeric_features`
//! order), followed by one indicator per encoder category.

use pairing_core::{Error, Features, Probabilities, Result};
use serde::{Deserialize, Serialize};

/// Numeric columns the pipeline may consume
pub const NUMERIC_COLUMNS: [&str; 3] = [
    "introversion_extraversion",
    "risk_taking",
    "weekly_hobby_hours",
];

/// Standardizes numeric columns: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant columns are exported with scale 0
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect()
    }
}

/// One-hot encoder for the activity column.
///
/// Categories not seen during training encode as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn encode(&self, value: &str) -> Vec<f64> {
        self.categories
            .iter()
            .map(|c| if c == value { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c == value)
    }
}

/// Binary logistic regression, positive class = Team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    /// Probability of the positive class
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>();
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Complete fitted pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    /// Numeric input columns in the order the scaler and coefficients expect
    #[serde(default = "default_numeric_features")]
    pub numeric_features: Vec<String>,

    pub scaler: StandardScaler,

    pub encoder: OneHotEncoder,

    pub classifier: LogisticRegression,
}

fn default_numeric_features() -> Vec<String> {
    NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect()
}

impl LogisticPipeline {
    /// Check that every stage agrees on dimensions and holds finite values
    pub fn validate(&self) -> Result<()> {
        for name in &self.numeric_features {
            if !NUMERIC_COLUMNS.contains(&name.as_str()) {
                return Err(Error::artifact(format!(
                    "unsupported numeric feature '{}'",
                    name
                )));
            }
        }

        let numeric = self.numeric_features.len();
        if self.scaler.mean.len() != numeric || self.scaler.scale.len() != numeric {
            return Err(Error::artifact(format!(
                "scaler expects {} mean/scale values, got {}/{}",
                numeric,
                self.scaler.mean.len(),
                self.scaler.scale.len()
            )));
        }

        if self.encoder.categories.is_empty() {
            return Err(Error::artifact("encoder has no categories"));
        }

        let expected = self.width();
        if self.classifier.coefficients.len() != expected {
            return Err(Error::artifact(format!(
                "classifier expects {} coefficients ({} numeric + {} categories), got {}",
                expected,
                numeric,
                self.encoder.categories.len(),
                self.classifier.coefficients.len()
            )));
        }

        let finite = self
            .scaler
            .mean
            .iter()
            .chain(&self.scaler.scale)
            .chain(&self.classifier.coefficients)
            .chain(std::iter::once(&self.classifier.intercept))
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::artifact("pipeline contains non-finite parameters"));
        }

        Ok(())
    }

    /// Width of the encoded feature vector
    pub fn width(&self) -> usize {
        self.numeric_features.len() + self.encoder.categories.len()
    }

    /// Scale and encode one row
    pub fn transform(&self, features: &Features) -> Result<Vec<f64>> {
        let numeric = self
            .numeric_features
            .iter()
            .map(|name| numeric_value(features, name))
            .collect::<Result<Vec<_>>>()?;

        let mut row = self.scaler.transform(&numeric);
        row.extend(self.encoder.encode(&features.club_top1));
        Ok(row)
    }

    /// Class probabilities for one row
    pub fn predict_proba(&self, features: &Features) -> Result<Probabilities> {
        let row = self.transform(features)?;
        Ok(Probabilities::from_team(self.classifier.predict_proba(&row)))
    }
}

fn numeric_value(features: &Features, name: &str) -> Result<f64> {
    let value = match name {
        "introversion_extraversion" => features.introversion_extraversion,
        "risk_taking" => features.risk_taking,
        "weekly_hobby_hours" => features.weekly_hobby_hours,
        other => {
            return Err(Error::classifier(format!(
                "pipeline references unknown column '{}'",
                other
            )))
        }
    };
    Ok(value as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairing_core::Preference;

    fn pipeline() -> LogisticPipeline {
        LogisticPipeline {
            numeric_features: default_numeric_features(),
            scaler: StandardScaler {
                mean: vec![3.0, 3.0, 10.0],
                scale: vec![1.0, 1.0, 5.0],
            },
            encoder: OneHotEncoder {
                categories: vec!["Coding Club".to_string(), "Sports Club".to_string()],
            },
            classifier: LogisticRegression {
                coefficients: vec![1.5, 0.5, -0.2, -0.8, 0.9],
                intercept: 0.0,
            },
        }
    }

    #[test]
    fn test_scaler_handles_zero_scale() {
        let scaler = StandardScaler {
            mean: vec![2.0, 4.0],
            scale: vec![2.0, 0.0],
        };
        assert_eq!(scaler.transform(&[4.0, 7.0]), vec![1.0, 3.0]);
    }

    #[test]
    fn test_encoder_unknown_is_all_zero() {
        let encoder = pipeline().encoder;
        assert_eq!(encoder.encode("Sports Club"), vec![0.0, 1.0]);
        assert_eq!(encoder.encode("Chess Club"), vec![0.0, 0.0]);
        assert!(!encoder.contains("Chess Club"));
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn test_transform_layout() {
        let row = pipeline()
            .transform(&Features::new(5, 1, "Coding Club", 20))
            .unwrap();
        assert_eq!(row, vec![2.0, -2.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_extraverted_sports_player_prefers_team() {
        let probs = pipeline()
            .predict_proba(&Features::new(5, 4, "Sports Club", 10))
            .unwrap();
        assert_eq!(probs.label(), Preference::Team);
        assert!((probs.solo + probs.team - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_introverted_coder_prefers_solo() {
        let probs = pipeline()
            .predict_proba(&Features::new(1, 2, "Coding Club", 30))
            .unwrap();
        assert_eq!(probs.label(), Preference::Solo);
    }

    #[test]
    fn test_validate_dimension_mismatch() {
        let mut bad = pipeline();
        bad.classifier.coefficients.pop();
        assert!(bad.validate().is_err());

        let mut bad = pipeline();
        bad.scaler.mean.push(0.0);
        assert!(bad.validate().is_err());

        let mut bad = pipeline();
        bad.numeric_features[0] = "shoe_size".to_string();
        assert!(bad.validate().is_err());

        assert!(pipeline().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut bad = pipeline();
        bad.classifier.intercept = f64::NAN;
        assert!(bad.validate().is_err());
    }
}
