//! Compiled keyword lookup
//!
//! Every keyword of one table is compiled into a single `RegexSet`, so a
//! label is screened against the whole table in one pass instead of one
//! substring scan per keyword.

use crate::error::Result;
use crate::text::contains_words;
use regex::RegexSet;

/// Shortest label allowed to match by being contained in a keyword
pub const MIN_REVERSE_LEN: usize = 4;

/// How a label reached its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDirection {
    /// The label contains the keyword ("samosas" -> "samosa")
    Forward,
    /// The keyword contains the label ("tikka" -> "chicken tikka masala")
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit {
    /// Index into the table the matcher was built from
    pub entry: usize,
    pub direction: MatchDirection,
}

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    set: RegexSet,
    /// (normalised keyword, entry index), parallel to the patterns in `set`
    keywords: Vec<(String, usize)>,
}

impl KeywordMatcher {
    /// Build from (entry index, normalised keyword) pairs
    pub fn new<'a, I>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let keywords: Vec<(String, usize)> = keywords
            .into_iter()
            .map(|(entry, kw)| (kw.to_string(), entry))
            .collect();

        let patterns = keywords
            .iter()
            .map(|(kw, _)| format!(r"\b{}(?:e?s)?\b", regex::escape(kw)));
        let set = RegexSet::new(patterns)?;

        Ok(Self { set, keywords })
    }

    /// Entry whose keyword occurs in `label`. When several entries match,
    /// the longest keyword wins ("chole bhature" beats "chole"); ties go to
    /// the earlier entry.
    pub fn forward(&self, label: &str) -> Option<usize> {
        self.set
            .matches(label)
            .iter()
            .map(|i| &self.keywords[i])
            .max_by(|(a_kw, a_entry), (b_kw, b_entry)| {
                a_kw.len().cmp(&b_kw.len()).then(b_entry.cmp(a_entry))
            })
            .map(|(_, entry)| *entry)
    }

    /// Entry whose keyword contains `label` as whole words. Only answers
    /// when exactly one entry qualifies; "paneer" sits inside several
    /// paneer dishes and identifies none of them.
    pub fn reverse(&self, label: &str) -> Option<usize> {
        if label.chars().count() < MIN_REVERSE_LEN {
            return None;
        }

        let mut found: Option<usize> = None;
        for (kw, entry) in &self.keywords {
            if kw != label && contains_words(kw, label) {
                match found {
                    Some(existing) if existing != *entry => return None,
                    _ => found = Some(*entry),
                }
            }
        }
        found
    }

    /// Forward first, then reverse when allowed
    pub fn lookup(&self, label: &str, allow_reverse: bool) -> Option<KeywordHit> {
        if let Some(entry) = self.forward(label) {
            return Some(KeywordHit {
                entry,
                direction: MatchDirection::Forward,
            });
        }
        if allow_reverse {
            return self.reverse(label).map(|entry| KeywordHit {
                entry,
                direction: MatchDirection::Reverse,
            });
        }
        None
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
