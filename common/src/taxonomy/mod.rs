//! Dish taxonomy
//!
//! Static keyword tables that turn classifier labels into canonical Indian
//! dish and bread names. A `Taxonomy` is built once (from the built-in
//! tables or a JSON file), validated, and then only read; callers share it
//! by reference.

mod builtin;
pub mod correlation;
pub mod matcher;

pub use builtin::{builtin_breads, builtin_dishes, builtin_vocabulary};
pub use correlation::{
    builtin_correlations, ColorCandidates, ColorFamily, ColorGate, CorrelationTable, ShapeMapping,
};
pub use matcher::{KeywordHit, KeywordMatcher, MatchDirection};

use crate::error::{Error, Result};
use crate::text::{mentions, normalize_label};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DishType {
    Curry,
    Dal,
    Bread,
    RiceDish,
    FriedBread,
    StuffedBread,
    Snack,
}

impl DishType {
    /// Fills the curry/dal slot of a composed meal
    pub fn is_main(&self) -> bool {
        matches!(self, DishType::Curry | DishType::Dal | DishType::Snack)
    }

    pub fn is_bread(&self) -> bool {
        matches!(
            self,
            DishType::Bread | DishType::FriedBread | DishType::StuffedBread
        )
    }

    pub fn is_rice(&self) -> bool {
        matches!(self, DishType::RiceDish)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreadCategory {
    FriedBread,
    LeavenedBread,
    StuffedBread,
    FlatBread,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishEntry {
    pub canonical_name: String,
    pub dish_type: DishType,
    pub match_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadEntry {
    pub canonical_name: String,
    pub category: BreadCategory,
    pub keywords: Vec<String>,
    /// Counts as Indian evidence for `is_indian_meal`
    #[serde(default)]
    pub indian: bool,
}

/// Word lists that carry no dish identity of their own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenericVocabulary {
    /// Labels dropped outright (exact match after normalisation)
    pub stoplist: Vec<String>,
    pub generic_curry: Vec<String>,
    pub generic_dal: Vec<String>,
    /// Generic labels shown to the user as "Dal"
    pub rename_to_dal: Vec<String>,
    pub rice: Vec<String>,
    /// A rice label mentioning one of these is a gravy, not rice
    pub rice_exclusions: Vec<String>,
    pub indian_context: Vec<String>,
    /// Ingredient words that never name a dish on their own
    /// ("lemon" is not Lemon Rice)
    pub ingredients: Vec<String>,
}

impl Default for GenericVocabulary {
    fn default() -> Self {
        builtin_vocabulary()
    }
}

impl GenericVocabulary {
    pub fn is_stop(&self, normalized: &str) -> bool {
        self.stoplist.iter().any(|s| s == normalized)
    }

    /// Stop term on its own, or as the leading/trailing words
    /// ("indian cuisine", "food storage")
    pub fn is_descriptor(&self, normalized: &str) -> bool {
        self.stoplist.iter().any(|s| {
            normalized == s
                || normalized.starts_with(&format!("{} ", s))
                || normalized.ends_with(&format!(" {}", s))
        })
    }

    pub fn is_generic_curry(&self, normalized: &str) -> bool {
        self.generic_curry.iter().any(|kw| mentions(normalized, kw))
    }

    pub fn is_generic_dal(&self, normalized: &str) -> bool {
        self.generic_dal.iter().any(|kw| mentions(normalized, kw))
    }

    /// Whole label is a generic term, so it must not match a dish by
    /// being contained in one of its keywords
    pub fn is_generic_term(&self, normalized: &str) -> bool {
        self.generic_curry
            .iter()
            .chain(&self.generic_dal)
            .chain(&self.rice)
            .chain(&self.indian_context)
            .any(|kw| normalized == kw)
            || self.is_stop(normalized)
    }

    /// Whole label is a curry or dal term ("curry", "lentils")
    pub fn is_generic_main(&self, normalized: &str) -> bool {
        self.generic_curry
            .iter()
            .chain(&self.generic_dal)
            .any(|kw| kw == normalized || normalized.strip_suffix('s') == Some(kw.as_str()))
    }

    pub fn is_ingredient(&self, normalized: &str) -> bool {
        self.ingredients
            .iter()
            .any(|kw| kw == normalized || normalized.strip_suffix('s') == Some(kw.as_str()))
    }

    /// Exactly a rename term, or a bare dal keyword ("daal", "lentils")
    pub fn renames_to_dal(&self, normalized: &str) -> bool {
        self.rename_to_dal.iter().any(|kw| kw == normalized)
            || self.generic_dal.iter().any(|kw| {
                kw == normalized || normalized.strip_suffix('s') == Some(kw.as_str())
            })
    }

    pub fn is_rice(&self, normalized: &str) -> bool {
        self.rice.iter().any(|kw| mentions(normalized, kw))
            && !self.rice_exclusions.iter().any(|ex| normalized.contains(ex.as_str()))
    }

    pub fn has_indian_context(&self, normalized: &str) -> bool {
        self.indian_context.iter().any(|kw| normalized.contains(kw.as_str()))
    }
}

/// Serialisable form of a taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyData {
    pub dishes: Vec<DishEntry>,
    pub breads: Vec<BreadEntry>,
    #[serde(default)]
    pub vocabulary: GenericVocabulary,
    #[serde(default)]
    pub correlations: CorrelationTable,
}

impl TaxonomyData {
    pub fn builtin() -> Self {
        Self {
            dishes: builtin_dishes(),
            breads: builtin_breads(),
            vocabulary: builtin_vocabulary(),
            correlations: builtin_correlations(),
        }
    }
}

/// Validated taxonomy with compiled keyword matchers
#[derive(Debug, Clone)]
pub struct Taxonomy {
    data: TaxonomyData,
    dish_matcher: KeywordMatcher,
    bread_matcher: KeywordMatcher,
}

impl Taxonomy {
    /// Built-in tables
    pub fn builtin() -> Result<Self> {
        Self::from_data(TaxonomyData::builtin())
    }

    /// Load from a JSON document (file reading lives in the binary crate)
    pub fn from_json(json: &str) -> Result<Self> {
        let data: TaxonomyData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Validate, normalise keywords and compile the matchers
    pub fn from_data(mut data: TaxonomyData) -> Result<Self> {
        normalize_data(&mut data);
        validate(&data)?;

        let dish_matcher = KeywordMatcher::new(data.dishes.iter().enumerate().flat_map(
            |(i, d)| d.match_keywords.iter().map(move |kw| (i, kw.as_str())),
        ))?;
        let bread_matcher = KeywordMatcher::new(data.breads.iter().enumerate().flat_map(
            |(i, b)| b.keywords.iter().map(move |kw| (i, kw.as_str())),
        ))?;

        tracing::debug!(
            dishes = data.dishes.len(),
            breads = data.breads.len(),
            keywords = dish_matcher.len() + bread_matcher.len(),
            "taxonomy compiled"
        );

        Ok(Self {
            data,
            dish_matcher,
            bread_matcher,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &TaxonomyData {
        &self.data
    }

    pub fn dishes(&self) -> &[DishEntry] {
        &self.data.dishes
    }

    pub fn breads(&self) -> &[BreadEntry] {
        &self.data.breads
    }

    pub fn vocabulary(&self) -> &GenericVocabulary {
        &self.data.vocabulary
    }

    pub fn correlations(&self) -> &CorrelationTable {
        &self.data.correlations
    }

    /// Specific dish for a normalised label. Generic terms, ingredients and
    /// bread names never match by containment in a keyword: "puri" is the
    /// bread, not Pani Puri.
    pub fn match_dish(&self, normalized: &str) -> Option<&DishEntry> {
        let vocab = &self.data.vocabulary;
        let allow_reverse = !vocab.is_generic_term(normalized)
            && !vocab.is_ingredient(normalized)
            && self.match_bread(normalized).is_none();
        self.dish_matcher
            .lookup(normalized, allow_reverse)
            .map(|hit| &self.data.dishes[hit.entry])
    }

    /// Bread for a normalised label; forward matches only, since short
    /// bread names inside longer keywords are not evidence of bread
    pub fn match_bread(&self, normalized: &str) -> Option<&BreadEntry> {
        self.bread_matcher
            .forward(normalized)
            .map(|entry| &self.data.breads[entry])
    }
}

fn normalize_data(data: &mut TaxonomyData) {
    for dish in &mut data.dishes {
        dish.canonical_name = dish.canonical_name.trim().to_string();
        for kw in &mut dish.match_keywords {
            *kw = normalize_label(kw);
        }
    }
    for bread in &mut data.breads {
        bread.canonical_name = bread.canonical_name.trim().to_string();
        for kw in &mut bread.keywords {
            *kw = normalize_label(kw);
        }
    }
    let vocab = &mut data.vocabulary;
    for list in [
        &mut vocab.stoplist,
        &mut vocab.generic_curry,
        &mut vocab.generic_dal,
        &mut vocab.rename_to_dal,
        &mut vocab.rice,
        &mut vocab.rice_exclusions,
        &mut vocab.indian_context,
        &mut vocab.ingredients,
    ] {
        for term in list.iter_mut() {
            *term = normalize_label(term);
        }
    }
}

fn validate(data: &TaxonomyData) -> Result<()> {
    if data.dishes.is_empty() {
        return Err(Error::Taxonomy("no dish entries".into()));
    }

    check_table(
        "dish",
        data.dishes
            .iter()
            .map(|d| (d.canonical_name.as_str(), d.match_keywords.as_slice())),
    )?;
    check_table(
        "bread",
        data.breads
            .iter()
            .map(|b| (b.canonical_name.as_str(), b.keywords.as_slice())),
    )?;

    let vocab = &data.vocabulary;
    if vocab.stoplist.iter().any(|s| s.is_empty()) {
        return Err(Error::Taxonomy("empty stoplist term".into()));
    }

    for family in &data.correlations.families {
        if family.triggers.is_empty() || family.triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::Taxonomy(format!(
                "colour family '{}' has no usable triggers",
                family.name
            )));
        }
    }
    for mapping in &data.correlations.shapes {
        if mapping.category.trim().is_empty() || mapping.candidates.is_empty() {
            return Err(Error::Taxonomy(format!(
                "shape mapping '{}' is incomplete",
                mapping.category
            )));
        }
    }

    Ok(())
}

fn check_table<'a>(
    table: &str,
    entries: impl Iterator<Item = (&'a str, &'a [String])>,
) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for (name, keywords) in entries {
        if name.is_empty() {
            return Err(Error::Taxonomy(format!("{} entry with empty name", table)));
        }
        if keywords.is_empty() {
            return Err(Error::Taxonomy(format!(
                "{} entry '{}' has no keywords",
                table, name
            )));
        }
        for kw in keywords {
            if kw.is_empty() {
                return Err(Error::Taxonomy(format!(
                    "{} entry '{}' has an empty keyword",
                    table, name
                )));
            }
            if let Some(owner) = owners.insert(kw.as_str(), name) {
                if owner != name {
                    return Err(Error::Taxonomy(format!(
                        "{} keyword '{}' claimed by both '{}' and '{}'",
                        table, kw, owner, name
                    )));
                }
            }
        }
    }

    Ok(())
}
