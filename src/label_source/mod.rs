//! Label sources
//!
//! Both adapters produce the same `Label` list the disambiguator consumes.
//! A failing source reports `Unavailable` instead of an error so the caller
//! can fall back to another one.

pub mod cloud;
pub mod local;

use thali_id_common::Label;

pub use cloud::{CloudLabelClient, CloudLabelSource, VisionLabel};
pub use local::{ImageClassifier, LocalLabelSource, StaticClassifier};

#[derive(Debug, Clone, PartialEq)]
pub enum LabelOutcome {
    Labels(Vec<Label>),
    /// The source answered but nothing usable survived filtering
    NoDetection,
    /// The source could not be reached or answered garbage
    Unavailable(String),
}

impl LabelOutcome {
    pub fn from_labels(labels: Vec<Label>) -> Self {
        if labels.is_empty() {
            LabelOutcome::NoDetection
        } else {
            LabelOutcome::Labels(labels)
        }
    }

    /// Labels to disambiguate; empty for `NoDetection`
    pub fn labels(&self) -> &[Label] {
        match self {
            LabelOutcome::Labels(labels) => labels,
            _ => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LabelOutcome::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels() {
        assert_eq!(LabelOutcome::from_labels(vec![]), LabelOutcome::NoDetection);
        let outcome = LabelOutcome::from_labels(vec![Label::new("naan", 80)]);
        assert_eq!(outcome.labels().len(), 1);
        assert!(!outcome.is_unavailable());
    }
}
