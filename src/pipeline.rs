//! Steps shared by the `detect` and `local` commands

use crate::config::Config;
use crate::error::{Result, ThaliError};
use crate::label_source::cloud::{normalize_labels, parse_response};
use crate::label_source::local::LocalDetection;
use crate::label_source::LabelOutcome;
use serde::Serialize;
use std::path::Path;
use thali_id_common::{
    build_nutrition_prompt, ColorProfile, DetectionResult, Disambiguator, Label, NutritionPrompt,
    NutritionRequest, Prediction, Taxonomy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Labels,
    Vision,
    Local,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub source: SourceKind,
    pub raw_labels: Vec<Label>,
    pub detection: DetectionResult,
    pub nutrition_request: NutritionRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_prompt: Option<NutritionPrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_profile: Option<ColorProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predictions: Vec<Prediction>,
}

/// Labels from a JSON file: a `Label` array, or a label-detection
/// response when `vision` is set
pub fn read_labels(path: &Path, vision: bool, min_score: f32) -> Result<LabelOutcome> {
    if !path.exists() {
        return Err(ThaliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    if vision {
        return Ok(match parse_response(&content) {
            Ok(annotations) => LabelOutcome::from_labels(normalize_labels(&annotations, min_score)),
            Err(reason) => LabelOutcome::Unavailable(reason),
        });
    }

    let labels: Vec<Label> = serde_json::from_str(&content)?;
    Ok(LabelOutcome::from_labels(labels))
}

/// Labels to disambiguate; an unavailable source is an error here
pub fn usable_labels(outcome: LabelOutcome) -> Result<Vec<Label>> {
    match outcome {
        LabelOutcome::Labels(labels) => Ok(labels),
        LabelOutcome::NoDetection => {
            tracing::warn!("no usable labels, falling back to an unidentified meal");
            Ok(Vec::new())
        }
        LabelOutcome::Unavailable(reason) => Err(ThaliError::LabelSource(reason)),
    }
}

pub fn build_report(
    taxonomy: &Taxonomy,
    config: &Config,
    source: SourceKind,
    raw_labels: Vec<Label>,
    with_prompt: bool,
) -> DetectionReport {
    let detection = Disambiguator::new(taxonomy)
        .with_max_alternatives(config.max_alternatives)
        .detect(&raw_labels);
    let nutrition_request = NutritionRequest::from_detection(&detection, &raw_labels);
    let nutrition_prompt = with_prompt.then(|| build_nutrition_prompt(&nutrition_request));

    DetectionReport {
        source,
        raw_labels,
        detection,
        nutrition_request,
        nutrition_prompt,
        color_profile: None,
        predictions: Vec::new(),
    }
}

pub fn build_local_report(
    taxonomy: &Taxonomy,
    config: &Config,
    local: LocalDetection,
    with_prompt: bool,
) -> Result<DetectionReport> {
    let labels = usable_labels(local.outcome)?;
    let mut report = build_report(taxonomy, config, SourceKind::Local, labels, with_prompt);
    report.color_profile = local.profile;
    report.predictions = local.predictions;
    Ok(report)
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn print_summary(report: &DetectionReport) {
    let detection = &report.detection;
    println!("🍛 {}", detection.primary_meal);
    println!("   {}", detection.detection_note);
    if let Some(bread) = &detection.bread_type {
        println!("   bread: {}", bread);
    }
    if let Some(profile) = &report.color_profile {
        println!("   colour: {}", profile.dominant_bucket);
    }
    for alt in &detection.alternatives {
        println!("   alt: {} ({})", alt.name, alt.confidence_tier);
    }
    println!(
        "   indian: {}",
        if detection.is_indian_meal { "yes" } else { "unclear" }
    );
}
