//! Protected-term guard for cultural phrases sent to machine translation
//!
//! Phrases like "nasi lemak" or "teh tarik" come back from MT systems as
//! "fat rice" or "pulled tea". Before translation every protected phrase is
//! swapped for an anchor token that the MT system leaves alone, and after
//! translation the anchors are swapped back for the original Malay phrase.
//!
//! Format: `_{CATEGORY}{n}_`, numbered per category in detection order.
//! Each distinct phrase gets its own anchor, so two different foods in one
//! sentence never collapse into one: `_FOOD1_`, `_FOOD2_`, `_DRINK1_`.

use crate::capitalize_first;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

/// Protected phrase → category. Several phrases share a category.
pub const PROTECTED_TERMS: &[(&str, &str)] = &[
    ("nasi lemak", "FOOD"),
    ("nasi kandar", "FOOD"),
    ("nasi goreng", "FOOD"),
    ("nasi kerabu", "FOOD"),
    ("roti canai", "FOOD"),
    ("roti jala", "FOOD"),
    ("mee goreng", "FOOD"),
    ("char kuey teow", "FOOD"),
    ("laksa", "FOOD"),
    ("rendang", "FOOD"),
    ("satay", "FOOD"),
    ("cendol", "FOOD"),
    ("kuih", "FOOD"),
    ("teh tarik", "DRINK"),
    ("teh ais", "DRINK"),
    ("teh o ais", "DRINK"),
    ("kopi o", "DRINK"),
    ("milo ais", "DRINK"),
    ("milo dinosaur", "DRINK"),
    ("pasar malam", "PLACE"),
    ("kopitiam", "PLACE"),
    ("hari raya", "FESTIVAL"),
    ("deepavali", "FESTIVAL"),
    ("balik kampung", "CUSTOM"),
    ("duit raya", "CUSTOM"),
];

/// One protected phrase and the anchor that replaced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedTerm {
    /// The anchor token written into the MT input (e.g. `_FOOD1_`)
    pub placeholder: String,
    /// The phrase as detected, lowercased and single-spaced
    pub original: String,
}

impl ProtectedTerm {
    pub fn new(category: &str, index: usize, original: impl Into<String>) -> Self {
        ProtectedTerm {
            placeholder: format!("_{}{}_", category, index),
            original: original.into(),
        }
    }

    /// The phrase written back into translated text
    pub fn restored(&self) -> String {
        capitalize_first(&self.original)
    }
}

/// MT-ready text and the side table needed to undo the substitution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuardedText {
    pub text: String,
    /// Substituted terms in detection order
    pub terms: Vec<ProtectedTerm>,
}

impl GuardedText {
    /// Replace every anchor in `translated` with its original phrase
    ///
    /// Matching is case-insensitive since MT systems sometimes lowercase the
    /// anchors. If one anchor appears twice in the side table the first entry
    /// wins.
    pub fn restore(&self, translated: &str) -> String {
        let mut result = translated.to_string();
        let mut seen = HashSet::new();

        for term in &self.terms {
            if !seen.insert(term.placeholder.to_lowercase()) {
                continue;
            }

            let anchor = Regex::new(&format!("(?i){}", regex::escape(&term.placeholder)))
                .expect("escaped anchor is a valid pattern");
            let restored = term.restored();
            result = anchor
                .replace_all(&result, regex::NoExpand(&restored))
                .into_owned();
        }

        result
    }
}

/// The protected-phrase table compiled into one matcher
#[derive(Debug, Clone)]
pub struct ProtectedTerms {
    pattern: Regex,
    categories: HashMap<String, String>,
}

impl ProtectedTerms {
    /// Build from the bundled [`PROTECTED_TERMS`] table
    pub fn new() -> Self {
        Self::from_table(PROTECTED_TERMS.iter().copied())
    }

    /// Build from `(phrase, category)` pairs
    pub fn from_table<'a, I>(table: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut categories = HashMap::new();
        for (phrase, category) in table {
            let phrase = phrase
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if !phrase.is_empty() {
                categories.insert(phrase, category.to_uppercase());
            }
        }

        // Longer phrases first so "teh o ais" is not cut short by "teh ais"
        let mut phrases: Vec<&String> = categories.keys().collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = phrases
            .iter()
            .map(|phrase| {
                phrase
                    .split(' ')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");

        // An empty table compiles to a pattern that never matches
        let source = if alternation.is_empty() {
            r"\b\B".to_string()
        } else {
            format!(r"(?i)\b(?:{})\b", alternation)
        };
        let pattern = Regex::new(&source).expect("protected table compiles to a valid pattern");

        Self {
            pattern,
            categories,
        }
    }

    /// Swap every protected phrase in `text` for an anchor token
    pub fn protect(&self, text: &str) -> GuardedText {
        let mut terms: Vec<ProtectedTerm> = Vec::new();
        let mut counters: HashMap<String, usize> = HashMap::new();

        let guarded = self
            .pattern
            .replace_all(text, |caps: &Captures<'_>| {
                let phrase = caps[0]
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();

                if let Some(existing) = terms.iter().find(|t| t.original == phrase) {
                    return existing.placeholder.clone();
                }

                let category = self
                    .categories
                    .get(&phrase)
                    .cloned()
                    .unwrap_or_else(|| "TERM".to_string());
                let counter = counters.entry(category.clone()).or_insert(0);
                *counter += 1;

                let term = ProtectedTerm::new(&category, *counter, phrase);
                let placeholder = term.placeholder.clone();
                terms.push(term);
                placeholder
            })
            .into_owned();

        GuardedText {
            text: guarded,
            terms,
        }
    }

    /// Rewrite any case variant of a protected phrase to its table spelling
    pub fn recase(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| {
                caps[0]
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .into_owned()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for ProtectedTerms {
    fn default() -> Self {
        Self::new()
    }
}
