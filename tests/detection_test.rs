//! Detection tests
//!
//! Label lists through the pipeline, checked on the serialized report

use serde_json::Value;
use tempfile::tempdir;
use thali_id::config::{load_taxonomy_file, Config};
use thali_id::pipeline::{self, SourceKind};
use thali_id_common::{Label, Taxonomy};

fn report_json(labels: Vec<Label>) -> Value {
    let taxonomy = Taxonomy::builtin().unwrap();
    let report = pipeline::build_report(&taxonomy, &Config::default(), SourceKind::Labels, labels, false);
    serde_json::to_value(&report).unwrap()
}

/// Generic curry with naan composes a two-item meal
#[test]
fn test_curry_and_naan_report() {
    let json = report_json(vec![Label::new("curry", 70), Label::new("naan", 80)]);
    let detection = &json["detection"];

    assert_eq!(detection["primaryMeal"], "Dal + Naan");
    assert_eq!(detection["multipleItems"], true);
    assert_eq!(detection["breadType"], "Naan");
    assert_eq!(detection["hasGenericCurry"], true);
    assert_eq!(detection["alternatives"].as_array().unwrap().len(), 0);
    assert_eq!(json["nutritionRequest"]["primaryMeal"], "Dal + Naan");
    assert!(json.get("nutritionPrompt").is_none());
}

/// Typical cloud output for a thali
#[test]
fn test_thali_labels() {
    let json = report_json(vec![
        Label::new("Food", 98),
        Label::new("Tableware", 94),
        Label::new("Ingredient", 90),
        Label::new("Recipe", 88),
        Label::new("Staple food", 86),
        Label::new("Curry", 84),
        Label::new("Chapati", 80),
        Label::new("Basmati", 76),
        Label::new("Indian cuisine", 75),
    ]);
    let detection = &json["detection"];

    assert_eq!(detection["primaryMeal"], "Dal + Roti + Basmati");
    assert_eq!(detection["isIndianMeal"], true);
    // stop terms are gone, "Indian cuisine" survives the exact-match filter
    let processed = detection["processedLabels"].as_array().unwrap();
    assert_eq!(processed.len(), 4);
    assert!(detection["alternatives"].as_array().unwrap().is_empty());
}

/// Tiers serialize in lowercase
#[test]
fn test_alternative_tiers() {
    let json = report_json(vec![
        Label::new("Biryani", 88),
        Label::new("Raita", 40),
        Label::new("Salad", 85),
    ]);
    let alternatives = json["detection"]["alternatives"].as_array().unwrap();

    assert_eq!(alternatives[0]["name"], "Salad");
    assert_eq!(alternatives[0]["confidenceTier"], "high");
    assert_eq!(alternatives[1]["name"], "Raita");
    assert_eq!(alternatives[1]["confidenceTier"], "medium");
}

/// Empty input is still a complete report
#[test]
fn test_empty_labels() {
    let json = report_json(Vec::new());
    assert_eq!(json["detection"]["primaryMeal"], "Mixed Meal");
    assert_eq!(json["detection"]["detectionNote"], "Cuisine unclear");
    assert_eq!(json["rawLabels"].as_array().unwrap().len(), 0);
}

/// No result ever names the meal "Indian Meal"
#[test]
fn test_no_indian_meal_fallback() {
    let inputs = vec![
        vec![Label::new("Indian food", 90)],
        vec![Label::new("Indian meal", 95), Label::new("dish", 80)],
        vec![Label::new("south indian cuisine", 70)],
        vec![Label::new("yellow", 99), Label::new("indian", 60)],
    ];
    for labels in inputs {
        let json = report_json(labels);
        assert_ne!(json["detection"]["primaryMeal"], "Indian Meal");
    }
}

/// A taxonomy file replaces the built-in dishes
#[test]
fn test_custom_taxonomy_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("taxonomy.json");
    std::fs::write(
        &path,
        r#"{
            "dishes": [
                {"canonicalName": "Bisi Bele Bath", "dishType": "RICE_DISH", "matchKeywords": ["bisi bele bath", "bisibelebath"]}
            ],
            "breads": [
                {"canonicalName": "Appam", "category": "FLAT_BREAD", "keywords": ["appam"], "indian": true}
            ]
        }"#,
    )
    .unwrap();

    let taxonomy = load_taxonomy_file(&path).unwrap();
    let report = pipeline::build_report(
        &taxonomy,
        &Config::default(),
        SourceKind::Labels,
        vec![Label::new("Bisibelebath", 81), Label::new("Appam", 77)],
        true,
    );

    assert_eq!(report.detection.primary_meal, "Appam + Bisi Bele Bath");
    assert!(report.detection.is_indian_meal);
    let prompt = report.nutrition_prompt.unwrap();
    assert!(prompt.user.contains("This appears to be Indian food."));
}

/// Labels read from a vision response file honour the score threshold
#[test]
fn test_vision_response_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("response.json");
    std::fs::write(
        &path,
        r#"{"responses":[{"labelAnnotations":[
            {"description":"Dosa","score":0.91},
            {"description":"Sambar","score":0.72},
            {"description":"Chutney","score":0.5}
        ]}]}"#,
    )
    .unwrap();

    let outcome = pipeline::read_labels(&path, true, 0.65).unwrap();
    let labels = pipeline::usable_labels(outcome).unwrap();
    assert_eq!(labels.len(), 2);

    let taxonomy = Taxonomy::builtin().unwrap();
    let report = pipeline::build_report(&taxonomy, &Config::default(), SourceKind::Vision, labels, false);
    assert_eq!(report.detection.primary_meal, "Dosa");
    assert_eq!(report.detection.alternatives[0].name, "Sambar");
}
