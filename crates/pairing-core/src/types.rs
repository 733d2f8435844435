//! Core types for Project Pairing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Self-reported scores (introversion/extraversion, risk taking, teamwork) use a 1-5 scale
pub const SCORE_RANGE: RangeInclusive<i64> = 1..=5;

/// Hours in a week; upper bound for `weekly_hobby_hours`
pub const MAX_WEEKLY_HOURS: i64 = 168;

/// Teamwork scores at or above this value binarize to [`Preference::Team`]
pub const TEAM_THRESHOLD: i64 = 4;

/// Canonical dataset columns, in header order
pub const COLUMNS: [&str; 6] = [
    "timestamp",
    "introversion_extraversion",
    "risk_taking",
    "club_top1",
    "weekly_hobby_hours",
    "teamwork_preference",
];

/// Binary project-work preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Preference {
    Solo,
    Team,
}

impl Preference {
    /// Binarize a raw 1-5 teamwork score
    pub fn from_score(score: i64) -> Self {
        if score >= TEAM_THRESHOLD {
            Self::Team
        } else {
            Self::Solo
        }
    }

    /// Map back onto the 1-5 scale. Only the extremes are ever produced.
    pub fn as_score(&self) -> i64 {
        match self {
            Self::Solo => 1,
            Self::Team => 5,
        }
    }

    /// Class index as used by the model (Solo = 0, Team = 1)
    pub fn index(&self) -> usize {
        match self {
            Self::Solo => 0,
            Self::Team => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Team => "Team",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four model inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub introversion_extraversion: i64,
    pub risk_taking: i64,
    pub club_top1: String,
    pub weekly_hobby_hours: i64,
}

impl Features {
    /// Create a new feature row
    pub fn new(
        introversion_extraversion: i64,
        risk_taking: i64,
        club_top1: impl Into<String>,
        weekly_hobby_hours: i64,
    ) -> Self {
        Self {
            introversion_extraversion,
            risk_taking,
            club_top1: club_top1.into(),
            weekly_hobby_hours,
        }
    }

    /// Check ranges, and that the club is one the model knows.
    ///
    /// An empty `known_clubs` slice skips the category check.
    pub fn validate(&self, known_clubs: &[String]) -> Result<()> {
        check_score("introversion_extraversion", self.introversion_extraversion)?;
        check_score("risk_taking", self.risk_taking)?;

        if !(0..=MAX_WEEKLY_HOURS).contains(&self.weekly_hobby_hours) {
            return Err(Error::validation(
                "weekly_hobby_hours",
                format!(
                    "expected an integer between 0 and {}, got {}",
                    MAX_WEEKLY_HOURS, self.weekly_hobby_hours
                ),
            ));
        }

        if self.club_top1.trim().is_empty() {
            return Err(Error::validation("club_top1", "must not be empty"));
        }

        if !known_clubs.is_empty() && !known_clubs.iter().any(|c| c == &self.club_top1) {
            return Err(Error::validation(
                "club_top1",
                format!(
                    "unknown activity '{}', expected one of: {}",
                    self.club_top1,
                    known_clubs.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

fn check_score(field: &str, value: i64) -> Result<()> {
    if SCORE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(Error::validation(
            field,
            format!(
                "expected an integer between {} and {}, got {}",
                SCORE_RANGE.start(),
                SCORE_RANGE.end(),
                value
            ),
        ))
    }
}

/// Class probabilities as reported by the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    #[serde(rename = "Solo")]
    pub solo: f64,

    #[serde(rename = "Team")]
    pub team: f64,
}

impl Probabilities {
    /// Build the pair from the positive-class probability
    pub fn from_team(team: f64) -> Self {
        Self {
            solo: 1.0 - team,
            team,
        }
    }

    /// Most likely label; ties resolve to the first class
    pub fn label(&self) -> Preference {
        if self.team > self.solo {
            Preference::Team
        } else {
            Preference::Solo
        }
    }
}

/// Result of classifying a single row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "prediction")]
    pub label: Preference,

    #[serde(rename = "prediction_probability")]
    pub probabilities: Probabilities,
}

impl Prediction {
    pub fn from_probabilities(probabilities: Probabilities) -> Self {
        Self {
            label: probabilities.label(),
            probabilities,
        }
    }
}

/// One row of the dataset.
///
/// Every field may be missing in historical rows. Columns beyond the
/// canonical six are carried in `extra` so a row round-trips in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub timestamp: Option<String>,
    pub introversion_extraversion: Option<i64>,
    pub risk_taking: Option<i64>,
    pub club_top1: Option<String>,
    pub weekly_hobby_hours: Option<i64>,
    pub teamwork_preference: Option<i64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Submission {
    /// Row logged for a served prediction
    pub fn from_prediction(
        features: &Features,
        label: Preference,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            introversion_extraversion: Some(features.introversion_extraversion),
            risk_taking: Some(features.risk_taking),
            club_top1: Some(features.club_top1.clone()),
            weekly_hobby_hours: Some(features.weekly_hobby_hours),
            teamwork_preference: Some(label.as_score()),
            extra: serde_json::Map::new(),
        }
    }

    /// Binarized teamwork preference, if known
    pub fn preference(&self) -> Option<Preference> {
        self.teamwork_preference.map(Preference::from_score)
    }

    /// Model inputs, if all four are known
    pub fn features(&self) -> Option<Features> {
        Some(Features {
            introversion_extraversion: self.introversion_extraversion?,
            risk_taking: self.risk_taking?,
            club_top1: self.club_top1.clone()?,
            weekly_hobby_hours: self.weekly_hobby_hours?,
        })
    }

    /// Labeled row with every model input present
    pub fn is_complete(&self) -> bool {
        self.teamwork_preference.is_some() && self.features().is_some()
    }

    /// Cell text for a named column; `None` when unknown
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            "timestamp" => self.timestamp.clone(),
            "introversion_extraversion" => self.introversion_extraversion.map(|v| v.to_string()),
            "risk_taking" => self.risk_taking.map(|v| v.to_string()),
            "club_top1" => self.club_top1.clone(),
            "weekly_hobby_hours" => self.weekly_hobby_hours.map(|v| v.to_string()),
            "teamwork_preference" => self.teamwork_preference.map(|v| v.to_string()),
            other => match self.extra.get(other) {
                None | Some(serde_json::Value::Null) => None,
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(value) => Some(value.to_string()),
            },
        }
    }
}
