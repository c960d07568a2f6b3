//! Cloud label-detection adapter
//!
//! Builds the `images:annotate` request body, hands it to a caller-supplied
//! transport and turns the response envelope into confidence-scored labels.

use super::LabelOutcome;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thali_id_common::Label;

pub const DEFAULT_MIN_SCORE: f32 = 0.65;
pub const DEFAULT_MAX_RESULTS: u32 = 15;

/// One entry of `labelAnnotations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionLabel {
    pub description: String,
    /// 0.0-1.0
    #[serde(default)]
    pub score: f32,
}

/// Transport for label-detection requests
///
/// Receives the JSON request body and returns the raw response body, or a
/// reason when the call failed (network, HTTP status, quota).
pub trait CloudLabelClient {
    fn annotate(&self, request: &Value) -> Result<String, String>;
}

impl<F> CloudLabelClient for F
where
    F: Fn(&Value) -> Result<String, String>,
{
    fn annotate(&self, request: &Value) -> Result<String, String> {
        self(request)
    }
}

pub struct CloudLabelSource<C> {
    client: C,
    min_score: f32,
    max_results: u32,
}

impl<C: CloudLabelClient> CloudLabelSource<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Labels for encoded image bytes (JPEG, PNG, ...)
    pub fn detect(&self, image_bytes: &[u8]) -> LabelOutcome {
        let request = build_request(&STANDARD.encode(image_bytes), self.max_results);
        self.send(&request)
    }

    /// Labels for an already base64-encoded image, with or without a
    /// `data:image/...;base64,` prefix
    pub fn detect_base64(&self, encoded: &str) -> LabelOutcome {
        let request = build_request(strip_data_url(encoded), self.max_results);
        self.send(&request)
    }

    fn send(&self, request: &Value) -> LabelOutcome {
        let body = match self.client.annotate(request) {
            Ok(body) => body,
            Err(reason) => {
                tracing::warn!(%reason, "label detection call failed");
                return LabelOutcome::Unavailable(reason);
            }
        };

        match parse_response(&body) {
            Ok(annotations) => {
                let labels = normalize_labels(&annotations, self.min_score);
                tracing::debug!(
                    received = annotations.len(),
                    kept = labels.len(),
                    "cloud labels filtered"
                );
                LabelOutcome::from_labels(labels)
            }
            Err(reason) => {
                tracing::warn!(%reason, "unusable label detection response");
                LabelOutcome::Unavailable(reason)
            }
        }
    }
}

/// Request body for one image
pub fn build_request(base64_image: &str, max_results: u32) -> Value {
    json!({
        "requests": [{
            "image": { "content": base64_image },
            "features": [{ "type": "LABEL_DETECTION", "maxResults": max_results }]
        }]
    })
}

pub fn strip_data_url(encoded: &str) -> &str {
    match encoded.strip_prefix("data:image/") {
        Some(rest) => rest.split_once(";base64,").map_or(encoded, |(_, data)| data),
        None => encoded,
    }
}

/// `responses[0].labelAnnotations` of a response body
///
/// A reported error or a body without `responses` is an `Err`; a response
/// without annotations is an empty list.
pub fn parse_response(body: &str) -> Result<Vec<VisionLabel>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid response JSON: {}", e))?;

    if let Some(error) = value.get("error") {
        return Err(error_message(error));
    }

    let first = value
        .get("responses")
        .and_then(Value::as_array)
        .ok_or_else(|| "response has no 'responses' array".to_string())?
        .first();

    let Some(first) = first else {
        return Ok(Vec::new());
    };
    if let Some(error) = first.get("error") {
        return Err(error_message(error));
    }

    match first.get("labelAnnotations") {
        Some(annotations) => serde_json::from_value(annotations.clone())
            .map_err(|e| format!("invalid labelAnnotations: {}", e)),
        None => Ok(Vec::new()),
    }
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Keep annotations scoring above `min_score`, as percentages
pub fn normalize_labels(annotations: &[VisionLabel], min_score: f32) -> Vec<Label> {
    annotations
        .iter()
        .filter(|a| a.score > min_score && !a.description.trim().is_empty())
        .map(|a| {
            let confidence = (a.score * 100.0).round().clamp(0.0, 100.0) as u8;
            Label::new(a.description.trim(), confidence)
        })
        .collect()
}
