//! On-device classifier adapter
//!
//! A general-purpose classifier only knows broad categories ("soup",
//! "flatbread"). The image's colour profile plus the taxonomy's correlation
//! table turn those into Indian dish candidates. Images listed in a
//! dataset index skip the classifier entirely.

use super::LabelOutcome;
use crate::color::{load_image, profile_image};
use crate::error::{Result, ThaliError};
use crate::scanner::dataset::DatasetIndex;
use image::DynamicImage;
use std::path::Path;
use thali_id_common::taxonomy::CorrelationTable;
use thali_id_common::{correlate, ColorProfile, Label, Prediction};

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_CANDIDATES: usize = 5;
/// Confidence of a dataset-index hit
pub const DATASET_CONFIDENCE: u8 = 100;

pub trait ImageClassifier {
    /// Top `top_k` categories, most probable first
    fn classify(&self, image: &DynamicImage, top_k: usize) -> std::result::Result<Vec<Prediction>, String>;
}

/// Replays a recorded classifier output, whatever the image
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    predictions: Vec<Prediction>,
}

impl StaticClassifier {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let predictions: Vec<Prediction> = serde_json::from_str(json)?;
        Ok(Self::new(predictions))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ThaliError::FileNotFound(path.display().to_string()));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl ImageClassifier for StaticClassifier {
    fn classify(&self, _image: &DynamicImage, top_k: usize) -> std::result::Result<Vec<Prediction>, String> {
        let mut ranked = self.predictions.clone();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked.truncate(top_k);
        Ok(ranked)
    }
}

/// Result of one local run, with what it was derived from
#[derive(Debug, Clone)]
pub struct LocalDetection {
    pub outcome: LabelOutcome,
    pub predictions: Vec<Prediction>,
    pub profile: Option<ColorProfile>,
}

pub struct LocalLabelSource<'t, C> {
    classifier: C,
    correlations: &'t CorrelationTable,
    dataset: Option<&'t DatasetIndex>,
    top_k: usize,
    max_candidates: usize,
    sample_size: u32,
    sample_stride: usize,
}

impl<'t, C: ImageClassifier> LocalLabelSource<'t, C> {
    pub fn new(classifier: C, correlations: &'t CorrelationTable) -> Self {
        Self {
            classifier,
            correlations,
            dataset: None,
            top_k: DEFAULT_TOP_K,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            sample_size: 100,
            sample_stride: 10,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_sampling(mut self, sample_size: u32, sample_stride: usize) -> Self {
        self.sample_size = sample_size;
        self.sample_stride = sample_stride;
        self
    }

    pub fn with_dataset(mut self, dataset: &'t DatasetIndex) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Dataset index first, by file name; otherwise decode and classify
    pub fn detect_path(&self, path: &Path) -> Result<LocalDetection> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(dish) = self.dataset.and_then(|d| d.lookup(&file_name)) {
            tracing::info!(%file_name, %dish, "dataset index hit");
            return Ok(LocalDetection {
                outcome: LabelOutcome::Labels(vec![Label::new(dish, DATASET_CONFIDENCE)]),
                predictions: Vec::new(),
                profile: None,
            });
        }

        let image = load_image(path)?;
        Ok(self.detect_detailed(&image))
    }

    pub fn detect(&self, image: &DynamicImage) -> LabelOutcome {
        self.detect_detailed(image).outcome
    }

    pub fn detect_detailed(&self, image: &DynamicImage) -> LocalDetection {
        let predictions = match self.classifier.classify(image, self.top_k) {
            Ok(predictions) => predictions,
            Err(reason) => {
                tracing::warn!(%reason, "local classifier failed");
                return LocalDetection {
                    outcome: LabelOutcome::Unavailable(reason),
                    predictions: Vec::new(),
                    profile: None,
                };
            }
        };

        let profile = profile_image(image, self.sample_size, self.sample_stride);
        let labels = correlate(
            &predictions,
            profile.dominant_bucket,
            self.correlations,
            self.max_candidates,
        );
        tracing::debug!(
            predictions = predictions.len(),
            bucket = %profile.dominant_bucket,
            candidates = labels.len(),
            "local candidates"
        );

        LocalDetection {
            outcome: LabelOutcome::from_labels(labels),
            predictions,
            profile: Some(profile),
        }
    }
}
