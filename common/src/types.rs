//! Detection types
//!
//! Shared by the label-source adapters and the disambiguator:
//! - Label: one classifier guess, normalised to a 0-100 confidence
//! - DetectionResult: the disambiguated meal identity
//! - NutritionRequest: what is handed to the nutrition step

use serde::{Deserialize, Deserializer, Serialize};

/// A name/confidence pair emitted by a label source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// 0-100; out-of-range input is clamped on deserialisation too
    #[serde(deserialize_with = "clamp_confidence")]
    pub confidence: u8,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: u8) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.min(100),
        }
    }
}

fn clamp_confidence<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

/// Coarse confidence of an alternative candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Tier for a label confidence; above 80 counts as high
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence > 80 {
            ConfidenceTier::High
        } else {
            ConfidenceTier::Medium
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Low => write!(f, "low"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub name: String,
    pub confidence_tier: ConfidenceTier,
}

/// Result of one disambiguation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Never empty
    pub primary_meal: String,

    pub alternatives: Vec<Alternative>,

    pub detection_note: String,

    /// Canonical names of every specific dish matched, best first
    pub specific_dishes: Vec<String>,

    /// Components joined into `primary_meal` (empty on the fallback path)
    #[serde(default)]
    pub items: Vec<String>,

    #[serde(default)]
    pub multiple_items: bool,

    pub bread_type: Option<String>,

    pub has_generic_curry: bool,

    pub has_dal: bool,

    /// Advisory only; never feeds back into `primary_meal`
    pub is_indian_meal: bool,

    /// Labels left after noise filtering
    pub processed_labels: Vec<Label>,
}

/// Payload for the downstream nutrition estimator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    pub primary_meal: String,
    pub raw_labels: Vec<String>,
    pub detection_note: String,
    pub is_indian_meal: bool,
}

impl NutritionRequest {
    pub fn from_detection(result: &DetectionResult, raw_labels: &[Label]) -> Self {
        Self {
            primary_meal: result.primary_meal.clone(),
            raw_labels: raw_labels.iter().map(|l| l.name.clone()).collect(),
            detection_note: result.detection_note.clone(),
            is_indian_meal: result.is_indian_meal,
        }
    }
}

/// Nutrition estimate returned by the downstream service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub food_name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub serving: String,
    /// 0-100
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub insight: String,
    #[serde(default)]
    pub vitamins: Vec<String>,
    #[serde(default)]
    pub minerals: Vec<String>,
}
