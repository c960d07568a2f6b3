//! Label source tests
//!
//! Local classifier path and colour profiling on real image files

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use thali_id::color;
use thali_id::config::Config;
use thali_id::label_source::{LabelOutcome, LocalLabelSource, StaticClassifier};
use thali_id::pipeline;
use thali_id::scanner::{self, dataset::DatasetIndex};
use thali_id_common::{ColorBucket, Prediction, Taxonomy};

fn write_solid_png(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(48, 48, Rgb(rgb))
        .save(&path)
        .expect("Failed to write image");
    path
}

/// Green soup photo resolves to a spinach curry
#[test]
fn test_local_green_soup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image_path = write_solid_png(dir.path(), "palak.png", [45, 130, 55]);
    let predictions_path = dir.path().join("predictions.json");
    std::fs::write(
        &predictions_path,
        r#"[{"category":"soup","probability":0.62},{"category":"plate","probability":0.21}]"#,
    )
    .unwrap();

    let taxonomy = Taxonomy::builtin().unwrap();
    let classifier = StaticClassifier::from_file(&predictions_path).unwrap();
    let img = color::load_image(&image_path).unwrap();
    let detection = LocalLabelSource::new(classifier, taxonomy.correlations()).detect_detailed(&img);

    assert_eq!(detection.profile.unwrap().dominant_bucket, ColorBucket::Green);
    assert_eq!(detection.predictions.len(), 2);

    let report = pipeline::build_local_report(&taxonomy, &Config::default(), detection, false).unwrap();
    assert_eq!(report.detection.primary_meal, "Palak Paneer");
    assert_eq!(report.raw_labels[0].confidence, 90);
    assert_eq!(report.detection.alternatives[0].name, "Saag");
    assert!(report.detection.is_indian_meal);
}

/// Yellow gravy becomes dal tadka
#[test]
fn test_local_yellow_consomme() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image_path = write_solid_png(dir.path(), "dal.png", [225, 175, 45]);

    let taxonomy = Taxonomy::builtin().unwrap();
    let classifier = StaticClassifier::new(vec![Prediction::new("consomme", 0.55)]);
    let img = color::load_image(&image_path).unwrap();
    let outcome = LocalLabelSource::new(classifier, taxonomy.correlations()).detect(&img);

    assert_eq!(outcome.labels()[0].name, "Dal Tadka");
}

/// Unrelated categories on an off-palette image produce nothing
#[test]
fn test_local_no_detection() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image_path = write_solid_png(dir.path(), "desk.png", [80, 90, 170]);

    let taxonomy = Taxonomy::builtin().unwrap();
    let classifier = StaticClassifier::new(vec![Prediction::new("laptop", 0.8)]);
    let img = color::load_image(&image_path).unwrap();
    let detection = LocalLabelSource::new(classifier, taxonomy.correlations()).detect_detailed(&img);
    assert_eq!(detection.outcome, LabelOutcome::NoDetection);

    // still a complete report
    let report = pipeline::build_local_report(&taxonomy, &Config::default(), detection, false).unwrap();
    assert_eq!(report.detection.primary_meal, "Mixed Meal");
}

/// Folder profiling keeps file-name order and skips broken files
#[test]
fn test_profile_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_solid_png(dir.path(), "b_rice.png", [245, 245, 240]);
    write_solid_png(dir.path(), "a_chole.png", [140, 95, 35]);
    write_solid_png(dir.path(), "c_sambar.png", [230, 120, 30]);
    std::fs::write(dir.path().join("d_broken.png"), b"not an image").unwrap();

    let profiles = color::profile_folder(dir.path(), 100, 10).unwrap();
    let buckets: Vec<(&str, ColorBucket)> = profiles
        .iter()
        .map(|p| (p.file_name.as_str(), p.profile.dominant_bucket))
        .collect();

    assert_eq!(
        buckets,
        vec![
            ("a_chole.png", ColorBucket::Brown),
            ("b_rice.png", ColorBucket::White),
            ("c_sambar.png", ColorBucket::Orange),
        ]
    );
}

/// Profile output serializes flat
#[test]
fn test_profile_json_shape() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_solid_png(dir.path(), "x.png", [245, 245, 240]);

    let profiles = color::profile_folder(dir.path(), 50, 5).unwrap();
    let out = dir.path().join("out").join("profiles.json");
    pipeline::write_json(&profiles, &out).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json[0]["fileName"], "x.png");
    assert_eq!(json[0]["dominantBucket"], "white");
    assert_eq!(json[0]["rgb"]["r"], 245);
}

/// An image from an indexed dataset folder is named after its folder
#[test]
fn test_local_dataset_index() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dish_dir = dir.path().join("dal_makhani");
    std::fs::create_dir_all(&dish_dir).unwrap();
    let image_path = write_solid_png(&dish_dir, "img_0042.png", [240, 240, 240]);

    let build = scanner::dataset::build_index(dir.path()).unwrap();
    let index_path = dir.path().join("index.json");
    pipeline::write_json(&build.index, &index_path).unwrap();
    let index = DatasetIndex::load(&index_path).unwrap();

    let taxonomy = Taxonomy::builtin().unwrap();
    let classifier = StaticClassifier::new(vec![Prediction::new("laptop", 0.9)]);
    let detection = LocalLabelSource::new(classifier, taxonomy.correlations())
        .with_dataset(&index)
        .detect_path(&image_path)
        .unwrap();
    let report = pipeline::build_local_report(&taxonomy, &Config::default(), detection, false).unwrap();

    assert_eq!(report.detection.primary_meal, "Dal Makhani");
    assert_eq!(report.raw_labels[0].confidence, 100);
    assert!(report.color_profile.is_none());
}
