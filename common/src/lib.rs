//! Thali ID Common Library
//!
//! Pure identification core shared by the CLI and any service wrapper:
//! taxonomy, colour classification, classifier correlation, the dish
//! disambiguator and the nutrition hand-off. No file or network I/O.

pub mod candidates;
pub mod color;
pub mod disambiguator;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod taxonomy;
pub mod text;
pub mod types;

pub use candidates::{correlate, Prediction};
pub use color::{classify_rgb, ColorBucket, ColorProfile, Rgb};
pub use disambiguator::{detect, Disambiguator};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_nutrition_response};
pub use prompts::{build_nutrition_prompt, NutritionPrompt};
pub use taxonomy::{BreadEntry, DishEntry, DishType, Taxonomy, TaxonomyData};
pub use text::normalize_label;
pub use types::{
    Alternative, ConfidenceTier, DetectionResult, Label, NutritionInfo, NutritionRequest,
};
