//! Category/colour correlation table for the local classifier path
//!
//! A general-purpose classifier knows "soup" and "flatbread", not "dal
//! tadka". These tables turn its broad categories plus the image colour
//! bucket into Indian dish candidates.

use crate::color::ColorBucket;
use serde::{Deserialize, Serialize};

/// Candidates offered when the image falls in one of `colors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCandidates {
    pub colors: Vec<ColorBucket>,
    pub candidates: Vec<String>,
}

/// A visually similar group (gravies, rice, breads) whose members are
/// told apart by colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFamily {
    pub name: String,
    /// Substrings of a classifier category that put the image in this family
    pub triggers: Vec<String>,
    pub by_color: Vec<ColorCandidates>,
}

impl ColorFamily {
    pub fn candidates_for(&self, bucket: ColorBucket) -> &[String] {
        self.by_color
            .iter()
            .find(|c| c.colors.contains(&bucket))
            .map(|c| c.candidates.as_slice())
            .unwrap_or(&[])
    }
}

/// Classifier category -> dishes with the same shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMapping {
    pub category: String,
    pub candidates: Vec<String>,
}

/// A candidate only kept when the image has this colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGate {
    pub candidate: String,
    pub color: ColorBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorrelationTable {
    pub families: Vec<ColorFamily>,
    pub shapes: Vec<ShapeMapping>,
    pub gates: Vec<ColorGate>,
    /// Used only when nothing else produced a candidate
    pub color_fallbacks: Vec<ColorCandidates>,
}

impl CorrelationTable {
    /// Whether `candidate` survives the colour gates for `bucket`
    pub fn passes_gate(&self, candidate: &str, bucket: ColorBucket) -> bool {
        self.gates
            .iter()
            .filter(|g| g.candidate == candidate)
            .all(|g| g.color == bucket)
    }

    pub fn fallback_for(&self, bucket: ColorBucket) -> &[String] {
        self.color_fallbacks
            .iter()
            .find(|c| c.colors.contains(&bucket))
            .map(|c| c.candidates.as_slice())
            .unwrap_or(&[])
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn by_color(colors: &[ColorBucket], candidates: &[&str]) -> ColorCandidates {
    ColorCandidates {
        colors: colors.to_vec(),
        candidates: strings(candidates),
    }
}

fn shape(category: &str, candidates: &[&str]) -> ShapeMapping {
    ShapeMapping {
        category: category.to_string(),
        candidates: strings(candidates),
    }
}

/// Built-in correlation table, tuned against MobileNet-style ImageNet labels
pub fn builtin_correlations() -> CorrelationTable {
    use ColorBucket::*;

    let families = vec![
        ColorFamily {
            name: "gravy".into(),
            triggers: strings(&["soup", "consomme", "bisque", "stew", "sauce", "puree"]),
            by_color: vec![
                by_color(&[Green], &["Palak Paneer", "Saag", "Hariyali Chicken"]),
                by_color(
                    &[Orange, Red],
                    &["Paneer Butter Masala", "Butter Chicken", "Pav Bhaji", "Dal Makhani"],
                ),
                by_color(&[Yellow], &["Dal Tadka", "Kadhi", "Sambar"]),
                by_color(&[Brown], &["Chole", "Rajma", "Chicken Curry"]),
            ],
        },
        ColorFamily {
            name: "rice".into(),
            triggers: strings(&["rice", "couscous", "pilaf", "cereal"]),
            by_color: vec![
                by_color(&[White], &["Plain Rice", "Idli"]),
                by_color(&[Yellow, Orange], &["Biryani", "Pulao", "Lemon Rice"]),
                by_color(&[Brown], &["Chicken Biryani", "Hyderabadi Biryani"]),
            ],
        },
        ColorFamily {
            name: "bread".into(),
            triggers: strings(&["bread", "tortilla", "chapati", "dough"]),
            by_color: vec![
                by_color(&[White], &["Naan", "Kulcha"]),
                by_color(&[Brown, Orange], &["Roti", "Paratha", "Puri", "Chapati"]),
            ],
        },
    ];

    let shapes = vec![
        // round and flat
        shape("flatbread", &["Roti", "Naan", "Paratha", "Thepla"]),
        shape("tortilla", &["Roti", "Chapati", "Phulka", "Puri"]),
        shape("disk brake", &["Roti", "Dosa", "Papad"]),
        shape("doormat", &["Naan", "Paratha", "Bhatura"]),
        shape("petri dish", &["Dosa", "Idli", "Uttapam"]),
        shape("toilet seat", &["Dosa", "Idli"]),
        shape("jellyfish", &["Poori", "Bhatura"]),
        shape("dough", &["Idli", "Bhatura", "Rasgulla", "Gulab Jamun"]),
        // liquid
        shape("consomme", &["Gravy", "Dal", "Sambar", "Rasam", "Kadhi"]),
        shape("soup", &["Gravy", "Dal", "Sambar", "Kadhi", "Rasam"]),
        shape("bisque", &["Butter Masala", "Tikka Masala", "Pav Bhaji", "Sambar"]),
        shape("lentil", &["Dal Tadka", "Dal Makhani"]),
        shape("mashed potato", &["Upma", "Pongal", "Halwa", "Khichdi"]),
        shape("butternut squash", &["Sambar", "Pav Bhaji", "Dal Fry"]),
        // grains
        shape("fried rice", &["Biryani", "Pulao", "Fried Rice"]),
        shape("carbonara", &["Biryani", "Pulao", "Khichdi"]),
        shape("casserole", &["Biryani", "Pulao"]),
        shape("couscous", &["Upma", "Poha"]),
        shape("wok", &["Biryani", "Fried Rice", "Noodles"]),
        // stuffed
        shape("burrito", &["Kathi Roll", "Dosa", "Spring Roll"]),
        shape("spring roll", &["Spring Roll", "Kathi Roll"]),
        shape("samosa", &["Samosa"]),
        shape("wallet", &["Samosa", "Pattice"]),
        shape("envelope", &["Samosa"]),
        shape("projector", &["Samosa", "Sandwich"]),
        // sweets
        shape("chocolate sauce", &["Gulab Jamun", "Chocolate Barfi"]),
        shape("meatball", &["Gulab Jamun", "Ladoo"]),
        shape("ping-pong ball", &["Rasgulla", "Ladoo"]),
        shape("trifle", &["Fruit Salad", "Kheer", "Falooda"]),
    ];

    let gates = [
        ("Palak Paneer", Green),
        ("Saag", Green),
        ("Dal Tadka", Yellow),
        ("Kadhi", Yellow),
        ("Rasgulla", White),
        ("Idli", White),
        ("Gulab Jamun", Brown),
    ]
    .into_iter()
    .map(|(candidate, color)| ColorGate {
        candidate: candidate.to_string(),
        color,
    })
    .collect();

    let color_fallbacks = vec![
        by_color(&[Green], &["Green Salad", "Chutney", "Palak"]),
        by_color(&[Orange], &["Sambar", "Carrot Halwa"]),
        by_color(&[White], &["Rice", "Idli", "Curd"]),
    ];

    CorrelationTable {
        families,
        shapes,
        gates,
        color_fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_candidates_for_bucket() {
        let table = builtin_correlations();
        let gravy = &table.families[0];
        assert_eq!(gravy.candidates_for(ColorBucket::Green)[0], "Palak Paneer");
        assert_eq!(
            gravy.candidates_for(ColorBucket::Red),
            gravy.candidates_for(ColorBucket::Orange)
        );
        assert!(gravy.candidates_for(ColorBucket::Black).is_empty());
    }

    #[test]
    fn test_gates() {
        let table = builtin_correlations();
        assert!(table.passes_gate("Idli", ColorBucket::White));
        assert!(!table.passes_gate("Idli", ColorBucket::Brown));
        // ungated candidates always pass
        assert!(table.passes_gate("Dosa", ColorBucket::Black));
    }

    #[test]
    fn test_fallback_for() {
        let table = builtin_correlations();
        assert_eq!(table.fallback_for(ColorBucket::White), ["Rice", "Idli", "Curd"]);
        assert!(table.fallback_for(ColorBucket::Unknown).is_empty());
    }
}
