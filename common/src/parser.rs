//! Nutrition response parser
//!
//! Text-generation services wrap their JSON in markdown fences or prose
//! often enough that the body cannot be parsed as-is.

use crate::error::{Error, Result};
use crate::types::NutritionInfo;
use serde_json::Value;

/// Extract the JSON part of a response
///
/// Tried in order:
/// 1. a ```json ... ``` block
/// 2. the outermost `{...}` object
/// 3. error
///
/// # Examples
/// ```
/// use thali_id_common::extract_json;
///
/// let response = "Sure!\n```json\n{\"foodName\": \"Dal\"}\n```";
/// assert_eq!(extract_json(response).unwrap(), "{\"foodName\": \"Dal\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            return Ok(response[start..start + end_offset].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON object in response".into()))
}

/// Parse a nutrition response
///
/// Accepts the object itself or one nested under `primaryMeal`. A missing
/// `foodName` is filled with `expected_meal`; a different one is replaced
/// by it, since the service must not rename the meal.
///
/// # Arguments
/// * `response` - raw response text
/// * `expected_meal` - the meal name that was sent
pub fn parse_nutrition_response(response: &str, expected_meal: &str) -> Result<NutritionInfo> {
    let json_str = extract_json(response)?;
    let mut value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("nutrition JSON: {}", e)))?;

    if let Some(nested) = value.get("primaryMeal").filter(|v| v.is_object()).cloned() {
        value = nested;
    }

    let Some(object) = value.as_object_mut() else {
        return Err(Error::Parse("nutrition response is not an object".into()));
    };

    let returned = object
        .get("foodName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if returned != expected_meal {
        if !returned.is_empty() {
            tracing::warn!(%returned, expected = expected_meal, "service renamed the meal, restoring the requested name");
        }
        object.insert("foodName".into(), Value::String(expected_meal.to_string()));
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(format!("nutrition fields: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain_object() {
        let response = r#"{"foodName": "Biryani", "calories": 520}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_fenced() {
        let response = "Here you go:\n```json\n{\"foodName\": \"Biryani\"}\n```\nEnjoy";
        assert_eq!(extract_json(response).unwrap(), "{\"foodName\": \"Biryani\"}");
    }

    #[test]
    fn test_extract_json_missing() {
        assert!(matches!(extract_json("no data"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_nutrition_response() {
        let response = r#"{"foodName":"Dal + Naan","calories":450,"protein":15.5,"carbs":62,"fat":12,"fiber":8,"serving":"1 plate","healthScore":72,"insight":"good protein","vitamins":["B1"],"minerals":["Iron"]}"#;
        let info = parse_nutrition_response(response, "Dal + Naan").unwrap();
        assert_eq!(info.food_name, "Dal + Naan");
        assert_eq!(info.calories, 450.0);
        assert_eq!(info.protein, 15.5);
        assert_eq!(info.health_score, 72.0);
        assert_eq!(info.minerals, vec!["Iron"]);
    }

    #[test]
    fn test_parse_nested_primary_meal() {
        let response = r#"{"primaryMeal":{"foodName":"Biryani","calories":520}}"#;
        let info = parse_nutrition_response(response, "Biryani").unwrap();
        assert_eq!(info.calories, 520.0);
        assert!(info.vitamins.is_empty());
    }

    #[test]
    fn test_parse_restores_renamed_meal() {
        let response = r#"{"foodName":"Indian Meal","calories":600}"#;
        let info = parse_nutrition_response(response, "Mixed Meal").unwrap();
        assert_eq!(info.food_name, "Mixed Meal");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_nutrition_response("{not json}", "Dal").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
