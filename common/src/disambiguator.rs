//! Dish disambiguation
//!
//! Converts a noisy label list into one `DetectionResult` with a fixed
//! priority ladder:
//! 1. drop uninformative labels (stoplist)
//! 2. specific dishes, ranked by confidence
//! 3. bread (all labels, first position wins)
//! 4. rice (not masala, not already a dish)
//! 5. compose "main + bread + rice"
//! 6. fallback ladder when nothing was composed
//! 7. alternatives from the unused labels
//!
//! `detect` is pure and total: no I/O, no retained state, and every input
//! (including an empty one) yields a result with a non-empty primary meal.

use crate::taxonomy::{BreadEntry, DishEntry, Taxonomy};
use crate::text::{normalize_label, title_case};
use crate::types::{Alternative, ConfidenceTier, DetectionResult, Label};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;
/// Generic dal-family name used for bare "curry"/"gravy" labels
pub const GENERIC_DAL_NAME: &str = "Dal";
pub const INDIAN_MIXED_MEAL: &str = "Indian Mixed Meal";
pub const MIXED_MEAL: &str = "Mixed Meal";
pub const CUISINE_UNCLEAR: &str = "Cuisine unclear";

/// A label with its input position and normalised text
#[derive(Debug)]
struct Candidate<'l> {
    index: usize,
    label: &'l Label,
    normalized: String,
}

#[derive(Debug, Clone, Copy)]
struct DishMatch<'t> {
    entry: &'t DishEntry,
    index: usize,
    confidence: u8,
}

/// One component of the composed meal and the label it came from
#[derive(Debug)]
struct Item {
    name: String,
    index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Disambiguator<'t> {
    taxonomy: &'t Taxonomy,
    max_alternatives: usize,
}

impl<'t> Disambiguator<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self {
            taxonomy,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }

    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives;
        self
    }

    pub fn detect(&self, labels: &[Label]) -> DetectionResult {
        let vocab = self.taxonomy.vocabulary();

        let all: Vec<Candidate> = labels
            .iter()
            .enumerate()
            .map(|(index, label)| Candidate {
                index,
                label,
                normalized: normalize_label(&label.name),
            })
            .collect();

        // 1. noise filter
        let filtered: Vec<&Candidate> = all
            .iter()
            .filter(|c| !c.normalized.is_empty() && !vocab.is_stop(&c.normalized))
            .collect();

        // 2. specific dishes
        let (matches, consumed) = self.match_dishes(&filtered);

        // 3. bread: every label, unless a non-bread dish already owns it
        // ("pani puri" is a snack, not a puri)
        let bread_hit: Option<(usize, &BreadEntry)> = all
            .iter()
            .filter(|c| consumed.get(&c.index).map_or(true, |e| e.dish_type.is_bread()))
            .find_map(|c| {
                self.taxonomy
                    .match_bread(&c.normalized)
                    .map(|entry| (c.index, entry))
            });

        // 4. rice
        let rice_hit = filtered
            .iter()
            .filter(|c| !consumed.contains_key(&c.index))
            .find(|c| vocab.is_rice(&c.normalized));

        // 5. composition
        let main_dish = matches.iter().find(|m| m.entry.dish_type.is_main());
        let bread_dish = matches.iter().find(|m| m.entry.dish_type.is_bread());
        let rice_dish = matches.iter().find(|m| m.entry.dish_type.is_rice());

        let main_item = match main_dish {
            Some(m) => Some(Item {
                name: m.entry.canonical_name.clone(),
                index: Some(m.index),
            }),
            None => filtered
                .iter()
                .filter(|c| !consumed.contains_key(&c.index))
                .filter(|c| Some(c.index) != bread_hit.map(|(i, _)| i))
                .filter(|c| Some(c.index) != rice_hit.map(|r| r.index))
                .find(|c| vocab.is_generic_curry(&c.normalized) || vocab.is_generic_dal(&c.normalized))
                .map(|c| Item {
                    name: if vocab.renames_to_dal(&c.normalized) {
                        GENERIC_DAL_NAME.to_string()
                    } else {
                        title_case(&c.label.name)
                    },
                    index: Some(c.index),
                }),
        };

        let bread_item = match bread_dish {
            Some(m) => Some(Item {
                name: m.entry.canonical_name.clone(),
                index: Some(m.index),
            }),
            None => bread_hit.map(|(index, entry)| Item {
                name: entry.canonical_name.clone(),
                index: Some(index),
            }),
        };

        let rice_item = match rice_dish {
            Some(m) => Some(Item {
                name: m.entry.canonical_name.clone(),
                index: Some(m.index),
            }),
            None => rice_hit.map(|c| Item {
                name: title_case(&c.label.name),
                index: Some(c.index),
            }),
        };

        let mut items: Vec<Item> = Vec::new();
        for item in [main_item, bread_item, rice_item].into_iter().flatten() {
            let duplicate = items
                .iter()
                .any(|existing| existing.name.to_lowercase() == item.name.to_lowercase());
            if !duplicate && items.len() < 3 {
                items.push(item);
            }
        }

        debug!(
            specific = matches.len(),
            items = ?items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            "composition"
        );

        // 6. primary meal, falling back when nothing was composed
        let mut used: Vec<usize> = items.iter().filter_map(|i| i.index).collect();
        let mut fallback_used = false;

        let (primary_meal, detection_note) = if items.len() >= 2 {
            let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
            (
                names.join(" + "),
                format!("Detected {} items: {}", names.len(), names.join(", ")),
            )
        } else if let Some(item) = items.first() {
            (item.name.clone(), format!("Detected {}", item.name))
        } else {
            fallback_used = true;
            let best = ranked(&filtered)
                .into_iter()
                .find(|c| !vocab.is_descriptor(&c.normalized));

            if let Some(best) = best {
                used.push(best.index);
                let name = best.label.name.trim().to_string();
                let note = format!("Detected {} ({}% confidence)", name, best.label.confidence);
                (name, note)
            } else if all.iter().any(|c| vocab.has_indian_context(&c.normalized)) {
                (
                    INDIAN_MIXED_MEAL.to_string(),
                    "Indian cuisine detected (specific dish unclear)".to_string(),
                )
            } else {
                (MIXED_MEAL.to_string(), CUISINE_UNCLEAR.to_string())
            }
        };

        debug!(%primary_meal, fallback = fallback_used, "primary meal chosen");

        // 7. alternatives
        let item_names: Vec<String> = items.iter().map(|i| i.name.to_lowercase()).collect();
        let primary_lower = primary_meal.to_lowercase();
        let mut alternatives: Vec<Alternative> = Vec::new();

        for c in ranked(&filtered) {
            if alternatives.len() >= self.max_alternatives {
                break;
            }
            if used.contains(&c.index)
                || vocab.is_descriptor(&c.normalized)
                || vocab.is_generic_main(&c.normalized)
            {
                continue;
            }

            let name = self.display_name(c);
            let lower = name.to_lowercase();
            let duplicate = lower == primary_lower
                || item_names.contains(&lower)
                || alternatives.iter().any(|a| a.name.to_lowercase() == lower);
            if duplicate {
                continue;
            }

            let confidence_tier = if fallback_used {
                ConfidenceTier::Low
            } else {
                ConfidenceTier::from_confidence(c.label.confidence)
            };
            alternatives.push(Alternative {
                name,
                confidence_tier,
            });
        }

        // 8. advisory flags
        let has_generic_curry = filtered.iter().any(|c| vocab.is_generic_curry(&c.normalized));
        let has_dal = filtered.iter().any(|c| vocab.is_generic_dal(&c.normalized));
        let indian_bread = bread_hit.map_or(false, |(_, entry)| entry.indian);
        let is_indian_meal = !matches.is_empty() || indian_bread || has_dal;

        DetectionResult {
            primary_meal,
            alternatives,
            detection_note,
            specific_dishes: matches
                .iter()
                .map(|m| m.entry.canonical_name.clone())
                .collect(),
            multiple_items: items.len() > 1,
            items: items.into_iter().map(|i| i.name).collect(),
            bread_type: bread_hit.map(|(_, entry)| entry.canonical_name.clone()),
            has_generic_curry,
            has_dal,
            is_indian_meal,
            processed_labels: filtered.iter().map(|c| c.label.clone()).collect(),
        }
    }

    /// Specific-dish matches ranked by confidence (ties keep input order),
    /// one per canonical dish, plus every label index a dish claimed
    fn match_dishes(
        &self,
        filtered: &[&Candidate],
    ) -> (Vec<DishMatch<'t>>, HashMap<usize, &'t DishEntry>) {
        let mut matches: Vec<DishMatch<'t>> = Vec::new();
        let mut consumed: HashMap<usize, &'t DishEntry> = HashMap::new();

        for c in filtered {
            let Some(entry) = self.taxonomy.match_dish(&c.normalized) else {
                continue;
            };
            consumed.insert(c.index, entry);

            match matches
                .iter_mut()
                .find(|m| m.entry.canonical_name == entry.canonical_name)
            {
                Some(existing) if c.label.confidence > existing.confidence => {
                    existing.index = c.index;
                    existing.confidence = c.label.confidence;
                }
                Some(_) => {}
                None => matches.push(DishMatch {
                    entry,
                    index: c.index,
                    confidence: c.label.confidence,
                }),
            }
        }

        matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        (matches, consumed)
    }

    /// Canonical dish or bread name when the label resolves to one
    fn display_name(&self, c: &Candidate) -> String {
        if let Some(dish) = self.taxonomy.match_dish(&c.normalized) {
            return dish.canonical_name.clone();
        }
        if let Some(bread) = self.taxonomy.match_bread(&c.normalized) {
            return bread.canonical_name.clone();
        }
        c.label.name.trim().to_string()
    }
}

/// Highest confidence first; stable, so equal confidences keep input order
fn ranked<'a, 'l>(candidates: &[&'a Candidate<'l>]) -> Vec<&'a Candidate<'l>> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.label.confidence.cmp(&a.label.confidence));
    ranked
}

/// One-shot detection with default settings
pub fn detect(taxonomy: &Taxonomy, labels: &[Label]) -> DetectionResult {
    Disambiguator::new(taxonomy).detect(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::builtin().unwrap()
    }

    fn labels(items: &[(&str, u8)]) -> Vec<Label> {
        items.iter().map(|(n, c)| Label::new(*n, *c)).collect()
    }

    #[test]
    fn test_specific_dish_alone() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Chana Masala", 92)]));
        assert_eq!(result.primary_meal, "Chana Masala");
        assert_eq!(result.specific_dishes, vec!["Chana Masala"]);
        assert!(result.is_indian_meal);
    }

    #[test]
    fn test_generic_curry_with_naan() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("curry", 70), ("naan", 80)]));
        assert_eq!(result.primary_meal, "Dal + Naan");
        assert_eq!(result.items, vec!["Dal", "Naan"]);
        assert!(result.multiple_items);
        assert!(result.has_generic_curry);
        assert!(result.alternatives.is_empty());
        assert_eq!(result.detection_note, "Detected 2 items: Dal, Naan");
    }

    #[test]
    fn test_pure_colour_falls_back_to_mixed_meal() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("yellow", 95)]));
        assert_eq!(result.primary_meal, MIXED_MEAL);
        assert_eq!(result.detection_note, CUISINE_UNCLEAR);
        assert!(result.processed_labels.is_empty());
        assert!(!result.is_indian_meal);
    }

    #[test]
    fn test_biryani_with_raita_alternative() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("biryani", 88), ("raita", 40)]));
        assert_eq!(result.primary_meal, "Biryani");
        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(result.alternatives[0].name, "raita");
        assert_eq!(result.alternatives[0].confidence_tier, ConfidenceTier::Medium);
    }

    #[test]
    fn test_roti_alone_is_indian() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("roti", 75)]));
        assert_eq!(result.primary_meal, "Roti");
        assert_eq!(result.bread_type.as_deref(), Some("Roti"));
        assert!(result.is_indian_meal);
    }

    #[test]
    fn test_empty_input() {
        let t = taxonomy();
        let result = detect(&t, &[]);
        assert_eq!(result.primary_meal, MIXED_MEAL);
        assert_eq!(result.detection_note, CUISINE_UNCLEAR);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_highest_confidence_dish_is_primary() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("dal tadka", 70), ("palak paneer", 90)]));
        assert_eq!(result.primary_meal, "Palak Paneer");
        assert_eq!(result.specific_dishes, vec!["Palak Paneer", "Dal Tadka"]);
        assert_eq!(result.alternatives[0].name, "Dal Tadka");
    }

    #[test]
    fn test_three_item_composition() {
        let t = taxonomy();
        let result = detect(
            &t,
            &labels(&[("jeera rice", 71), ("Dal Makhani", 90), ("Butter Naan", 85)]),
        );
        assert_eq!(result.primary_meal, "Dal Makhani + Naan + Jeera Rice");
    }

    #[test]
    fn test_plain_rice_with_gravy() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("gravy", 82), ("steamed rice", 78)]));
        assert_eq!(result.primary_meal, "Dal + Steamed Rice");
    }

    #[test]
    fn test_masala_is_not_rice() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("masala rice", 80)]));
        // rice check skips it; it is still a generic curry label
        assert_eq!(result.primary_meal, "Masala Rice");
        assert!(result.has_generic_curry);
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Curry", 80), ("curry", 75)]));
        assert_eq!(result.primary_meal, "Dal");
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn test_pani_puri_is_not_bread() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Pani Puri", 88)]));
        assert_eq!(result.primary_meal, "Pani Puri");
        assert_eq!(result.bread_type, None);
    }

    #[test]
    fn test_chole_bhature_reports_bread_type() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Chole Bhature", 91)]));
        assert_eq!(result.primary_meal, "Chole Bhature");
        assert_eq!(result.bread_type.as_deref(), Some("Bhatura"));
    }

    #[test]
    fn test_curry_with_each_indian_bread() {
        let t = taxonomy();
        for bread in t.breads().iter().filter(|b| b.indian) {
            let label = bread.canonical_name.to_lowercase();
            let result = detect(&t, &labels(&[("curry", 70), (label.as_str(), 80)]));
            assert_eq!(result.primary_meal, format!("Dal + {}", bread.canonical_name), "{}", label);
            assert_eq!(result.bread_type.as_deref(), Some(bread.canonical_name.as_str()));
            assert!(result.specific_dishes.is_empty(), "{}", label);
        }
    }

    #[test]
    fn test_bare_bread_names_stay_bread() {
        let t = taxonomy();
        for (label, bread) in [("puri", "Puri"), ("paratha", "Paratha"), ("bhatura", "Bhatura")] {
            let result = detect(&t, &labels(&[(label, 85)]));
            assert_eq!(result.primary_meal, bread);
            assert_eq!(result.bread_type.as_deref(), Some(bread));
            assert!(result.specific_dishes.is_empty());
            assert!(result.is_indian_meal);
        }
    }

    #[test]
    fn test_garnish_is_not_a_dish() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("dal", 80), ("lemon", 60)]));
        assert_eq!(result.primary_meal, "Dal");
        assert!(result.specific_dishes.is_empty());
        assert_eq!(result.alternatives[0].name, "lemon");
    }

    #[test]
    fn test_generic_curry_not_offered_as_alternative() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Chana Masala", 90), ("curry", 75), ("salad", 60)]));
        assert_eq!(result.primary_meal, "Chana Masala");
        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(result.alternatives[0].name, "salad");
        assert!(result.has_generic_curry);
    }

    #[test]
    fn test_fallback_picks_best_label_verbatim() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("food", 98), ("Pasta", 72), ("Noodle", 81)]));
        assert_eq!(result.primary_meal, "Noodle");
        assert_eq!(result.detection_note, "Detected Noodle (81% confidence)");
        assert_eq!(result.alternatives[0].name, "Pasta");
        assert_eq!(result.alternatives[0].confidence_tier, ConfidenceTier::Low);
        assert!(!result.is_indian_meal);
    }

    #[test]
    fn test_indian_context_fallback() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Indian cuisine", 90), ("dish", 88)]));
        assert_eq!(result.primary_meal, INDIAN_MIXED_MEAL);
    }

    #[test]
    fn test_never_renames_to_indian_meal() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("dal", 60), ("Indian meal", 95)]));
        assert_eq!(result.primary_meal, "Dal");
        assert!(result.is_indian_meal);
        assert!(result.alternatives.iter().all(|a| a.name != "Indian meal"));
    }

    #[test]
    fn test_high_tier_alternative() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("samosa", 93), ("pakora", 85), ("chutney", 60)]));
        assert_eq!(result.primary_meal, "Samosa");
        assert_eq!(result.alternatives[0].name, "Pakora");
        assert_eq!(result.alternatives[0].confidence_tier, ConfidenceTier::High);
        assert_eq!(result.alternatives[1].confidence_tier, ConfidenceTier::Medium);
    }

    #[test]
    fn test_alternatives_capped() {
        let t = taxonomy();
        let result = Disambiguator::new(&t).with_max_alternatives(2).detect(&labels(&[
            ("biryani", 90),
            ("salad", 70),
            ("pickle", 65),
            ("papad", 60),
        ]));
        assert_eq!(result.alternatives.len(), 2);
    }

    #[test]
    fn test_duplicate_dish_labels_do_not_become_alternatives() {
        let t = taxonomy();
        let result = detect(&t, &labels(&[("Chana Masala", 92), ("chole", 80)]));
        assert_eq!(result.specific_dishes, vec!["Chana Masala"]);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let t = taxonomy();
        let input = labels(&[("curry", 70), ("naan", 80), ("rice", 66), ("plate", 99)]);
        let first = serde_json::to_string(&detect(&t, &input)).unwrap();
        let second = serde_json::to_string(&detect(&t, &input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_swapped_taxonomy() {
        let json = r#"{
            "dishes": [
                {"canonicalName": "Avial", "dishType": "CURRY", "matchKeywords": ["avial", "aviyal"]}
            ],
            "breads": []
        }"#;
        let t = Taxonomy::from_json(json).unwrap();
        let result = detect(&t, &labels(&[("Aviyal", 77)]));
        assert_eq!(result.primary_meal, "Avial");
    }
}
