//! Nutrition prompt generation
//!
//! Builds the two-part prompt handed to the text-generation service that
//! estimates nutrition for a detected meal. The meal name must reach the
//! service unchanged, so the prompt pins it as `foodName`.

use crate::types::NutritionRequest;
use serde::{Deserialize, Serialize};

pub const NUTRITION_SYSTEM_PROMPT: &str = "You are a JSON-only nutrition API. Return ONLY valid JSON, no text.
IMPORTANT: Do NOT use \"Indian Meal\" as a fallback. Use neutral names like \"Mixed Meal\" when uncertain.";

const INDIAN_HINT: &str = "This appears to be Indian food.";
const UNCERTAIN_HINT: &str = "Cuisine type is uncertain.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionPrompt {
    pub system: String,
    pub user: String,
}

/// Nutrition prompt for a detection
///
/// # Arguments
/// * `request` - meal name, raw labels and detection context
///
/// # Returns
/// System and user prompt texts
pub fn build_nutrition_prompt(request: &NutritionRequest) -> NutritionPrompt {
    let meal = request.primary_meal.as_str();
    let hint = if request.is_indian_meal {
        INDIAN_HINT
    } else {
        UNCERTAIN_HINT
    };

    let mut lines = vec![
        "Provide nutrition data for this meal in JSON format.".to_string(),
        String::new(),
        format!("MEAL: {}", meal),
        format!("RAW LABELS: {}", request.raw_labels.join(", ")),
    ];
    if !request.detection_note.is_empty() {
        lines.push(format!("CONTEXT: {}", request.detection_note));
    }
    lines.push(hint.to_string());
    lines.push(String::new());
    lines.push(format!(
        "CRITICAL: Use the EXACT meal name \"{}\" as foodName. Do NOT change it to \"Indian Meal\".",
        meal
    ));
    lines.push(String::new());
    lines.push("Return JSON:".to_string());
    lines.push(response_template(meal));

    NutritionPrompt {
        system: NUTRITION_SYSTEM_PROMPT.to_string(),
        user: lines.join("\n"),
    }
}

/// Example object the service is asked to fill in
fn response_template(meal: &str) -> String {
    serde_json::json!({
        "foodName": meal,
        "calories": 400,
        "protein": 12,
        "carbs": 60,
        "fat": 10,
        "fiber": 6,
        "serving": "1 serving",
        "healthScore": 70,
        "insight": "balanced meal",
        "vitamins": ["B6", "C"],
        "minerals": ["Iron", "Potassium"],
    })
    .to_string()
}
