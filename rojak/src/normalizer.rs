//! Spelling canonicalization and clause splitting
//!
//! Texting shorthand is expanded to its standard spelling before the rules
//! and the model see the sentence, and a comma is inserted between a
//! reporting verb and the pronoun that opens the following clause:
//!
//! ```ignore
//! let normalizer = Normalizer::new();
//! assert_eq!(normalizer.normalize("Sy rasa dia x dtg"), "Saya rasa, dia tak datang");
//! ```

use crate::capitalize_first;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Shorthand → standard spelling
const SPELLING_VARIANTS: &[(&str, &str)] = &[
    ("sy", "saya"),
    ("aq", "aku"),
    ("ak", "aku"),
    ("awk", "awak"),
    ("nk", "nak"),
    ("x", "tak"),
    ("tk", "tak"),
    ("xde", "tak ada"),
    ("takde", "tak ada"),
    ("tade", "tak ada"),
    ("dgn", "dengan"),
    ("utk", "untuk"),
    ("yg", "yang"),
    ("mkn", "makan"),
    ("mnm", "minum"),
    ("dtg", "datang"),
    ("dh", "dah"),
    ("sbb", "sebab"),
    ("mcm", "macam"),
    ("camne", "macam mana"),
    ("cmne", "macam mana"),
    ("nape", "kenapa"),
    ("knp", "kenapa"),
    ("org", "orang"),
    ("bkn", "bukan"),
    ("tgk", "tengok"),
    ("skrg", "sekarang"),
    ("lg", "lagi"),
    ("jgn", "jangan"),
    ("blh", "boleh"),
    ("bleh", "boleh"),
    ("ape", "apa"),
    ("mane", "mana"),
    ("ni", "ini"),
    ("tu", "itu"),
];

/// Verbs that usually introduce a reported clause
const CLAUSE_VERBS: &[&str] = &[
    "rasa", "fikir", "kata", "cakap", "ingat", "harap", "tahu", "dengar", "nampak", "agak",
];

const CLAUSE_PRONOUNS: &[&str] = &[
    "saya", "aku", "dia", "kau", "engkau", "awak", "kamu", "kami", "kita", "mereka", "korang",
    "diorang", "dorang",
];

#[derive(Debug, Clone)]
pub struct Normalizer {
    variants: Regex,
    canonical: HashMap<&'static str, &'static str>,
}

impl Normalizer {
    pub fn new() -> Self {
        let mut keys: Vec<&str> = SPELLING_VARIANTS.iter().map(|(variant, _)| *variant).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let variants = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
            .expect("spelling table compiles to a valid pattern");

        Self {
            variants,
            canonical: SPELLING_VARIANTS.iter().copied().collect(),
        }
    }

    /// Canonicalize spelling, then split clauses
    pub fn normalize(&self, text: &str) -> String {
        self.split_clauses(&self.canonicalize(text))
    }

    /// Replace every shorthand word with its standard spelling in one pass
    pub fn canonicalize(&self, text: &str) -> String {
        self.variants
            .replace_all(text, |caps: &Captures<'_>| {
                let found = &caps[0];
                let canonical: &str = match self.canonical.get(found.to_lowercase().as_str()) {
                    Some(canonical) => canonical,
                    None => found,
                };

                if found.chars().next().is_some_and(char::is_uppercase) {
                    capitalize_first(canonical)
                } else {
                    canonical.to_string()
                }
            })
            .into_owned()
    }

    /// Insert a comma after a clause verb that is followed by a pronoun
    pub fn split_clauses(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let opens_clause = tokens.get(i + 1).is_some_and(|next| {
                    let word: String = next
                        .chars()
                        .filter(|c| c.is_alphabetic())
                        .flat_map(char::to_lowercase)
                        .collect();
                    CLAUSE_PRONOUNS.contains(&word.as_str())
                });

                if opens_clause && CLAUSE_VERBS.contains(&token.to_lowercase().as_str()) {
                    format!("{},", token)
                } else {
                    token.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
