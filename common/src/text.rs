//! Label text helpers

use regex::Regex;

/// Lowercase, turn punctuation and `_`/`-` into single spaces.
///
/// Classifiers emit "Fried_rice", "fried-rice" and "Fried  Rice" for the
/// same thing; every comparison goes through this first.
pub fn normalize_label(value: &str) -> String {
    lazy_static::lazy_static! {
        static ref SEPARATOR_RE: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
    }
    SEPARATOR_RE
        .replace_all(value.trim(), " ")
        .trim()
        .to_lowercase()
}

/// "jeera rice" -> "Jeera Rice"
pub fn title_case(value: &str) -> String {
    normalize_label(value)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `needle` occurs in `haystack` as a run of whole words.
/// Both sides must already be normalised.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = start == 0 || haystack[..start].ends_with(' ');
        let after_ok = end == haystack.len() || haystack[end..].starts_with(' ');
        before_ok && after_ok
    })
}

/// True when `keyword` starts at a word boundary in `label` and ends at one,
/// allowing a plural "s"/"es" ("samosas" mentions "samosa", "rotisserie"
/// does not mention "roti"). Both sides must already be normalised.
pub fn mentions(label: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    label.match_indices(keyword).any(|(start, _)| {
        let before_ok = start == 0 || label[..start].ends_with(' ');
        let rest = &label[start + keyword.len()..];
        let rest = rest
            .strip_prefix("es")
            .filter(|r| r.is_empty() || r.starts_with(' '))
            .or_else(|| rest.strip_prefix('s'))
            .unwrap_or(rest);
        before_ok && (rest.is_empty() || rest.starts_with(' '))
    })
}
