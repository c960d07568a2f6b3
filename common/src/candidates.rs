//! Local classifier correlation
//!
//! Turns top-k broad categories plus the image colour bucket into
//! `Label`-shaped Indian dish candidates, in this order:
//! 1. colour families (gravy / rice / bread) triggered by any category
//! 2. shape mappings per category, filtered by colour gates
//! 3. colour-only fallbacks when 1 and 2 produced nothing

use crate::color::ColorBucket;
use crate::taxonomy::CorrelationTable;
use crate::types::Label;
use serde::{Deserialize, Serialize};

/// Confidence of the first candidate; each later one is 10 lower
pub const TOP_CANDIDATE_CONFIDENCE: u8 = 90;
const MIN_CANDIDATE_CONFIDENCE: u8 = 10;

/// One guess from a general-purpose image classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// e.g. "consomme" or "French loaf, baguette"
    pub category: String,
    /// 0.0-1.0
    pub probability: f32,
}

impl Prediction {
    pub fn new(category: impl Into<String>, probability: f32) -> Self {
        Self {
            category: category.into(),
            probability,
        }
    }

    /// Lowercased first synonym ("pizza, pizza pie" -> "pizza")
    fn primary_term(&self) -> String {
        self.category
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

/// Correlate predictions and colour into ranked candidates.
///
/// Output is deterministic: the same predictions and bucket always give
/// the same names with the same confidences.
pub fn correlate(
    predictions: &[Prediction],
    bucket: ColorBucket,
    table: &CorrelationTable,
    max_candidates: usize,
) -> Vec<Label> {
    let categories: Vec<String> = predictions
        .iter()
        .map(|p| p.category.to_lowercase())
        .collect();

    let mut names: Vec<&str> = Vec::new();

    for family in &table.families {
        let triggered = categories
            .iter()
            .any(|c| family.triggers.iter().any(|t| c.contains(t.as_str())));
        if triggered {
            let found = family.candidates_for(bucket);
            tracing::debug!(family = %family.name, %bucket, candidates = found.len(), "colour family triggered");
            names.extend(found.iter().map(String::as_str));
        }
    }

    for prediction in predictions {
        let term = prediction.primary_term();
        for mapping in table.shapes.iter().filter(|m| term.contains(m.category.as_str())) {
            let refined: Vec<&str> = mapping
                .candidates
                .iter()
                .map(String::as_str)
                .filter(|c| table.passes_gate(c, bucket))
                .collect();
            if refined.is_empty() {
                names.extend(mapping.candidates.iter().map(String::as_str));
            } else {
                names.extend(refined);
            }
        }
    }

    if names.is_empty() {
        names.extend(table.fallback_for(bucket).iter().map(String::as_str));
    }

    let mut unique: Vec<&str> = Vec::new();
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }

    unique
        .into_iter()
        .take(max_candidates)
        .enumerate()
        .map(|(idx, name)| {
            let step = u8::try_from(idx.saturating_mul(10)).unwrap_or(u8::MAX);
            let confidence = TOP_CANDIDATE_CONFIDENCE
                .saturating_sub(step)
                .max(MIN_CANDIDATE_CONFIDENCE);
            Label::new(name, confidence)
        })
        .collect()
}
