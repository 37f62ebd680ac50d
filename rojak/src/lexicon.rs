//! Slang and reverse lexicons
//!
//! Both lexicons are flat JSON objects on disk:
//!
//! ```json
//! {
//!     "@metadata": { ... },
//!     "jom": "let's",
//!     "kedai mamak": "Indian-Muslim eatery"
//! }
//! ```
//!
//! Keys are lowercased and their inner whitespace collapsed on load. Both
//! lexicons are immutable once built and are meant to be shared read-only.

use crate::error::LexiconError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Lowercase a key and collapse its inner whitespace to single spaces
fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Read a JSON object file into raw key/value pairs, skipping `@` metadata
/// keys and non-string values.
fn read_entries(path: &Path) -> Result<Vec<(String, String)>, LexiconError> {
    let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json: Value = serde_json::from_str(&content).map_err(|source| LexiconError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let obj = json.as_object().ok_or_else(|| LexiconError::NotAnObject {
        path: path.to_path_buf(),
    })?;

    let mut entries = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        if key.starts_with('@') {
            continue;
        }

        if let Some(text) = value.as_str() {
            entries.push((key.clone(), text.to_string()));
        } else {
            warn!(
                "Lexicon entry '{}' in {} is not a string, skipping",
                key,
                path.display()
            );
        }
    }

    Ok(entries)
}

/// Malay slang term (single or multi-word) → short English gloss
#[derive(Debug, Clone, Default)]
pub struct SlangLexicon {
    entries: HashMap<String, String>,
    /// Longest key, counted in words
    max_phrase_words: usize,
}

impl SlangLexicon {
    /// Build a lexicon from `(term, gloss)` pairs
    ///
    /// Blank terms are ignored. When two terms normalize to the same key the
    /// last one wins.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        let mut max_phrase_words = 0;

        for (term, gloss) in entries {
            let key = normalize_key(term.as_ref());
            if key.is_empty() {
                continue;
            }
            max_phrase_words = max_phrase_words.max(key.split(' ').count());
            map.insert(key, gloss.into());
        }

        Self {
            entries: map,
            max_phrase_words,
        }
    }

    /// Load the lexicon from a JSON file
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let lexicon = Self::from_entries(read_entries(path)?);
        info!(
            "Loaded {} slang terms from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Load the lexicon, degrading to an empty one if the file is missing or
    /// malformed
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{}; continuing with an empty slang lexicon", e);
            Self::default()
        })
    }

    /// Gloss for a normalized term (lowercase, single-spaced)
    pub fn gloss(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(String::as_str)
    }

    /// Number of words in the longest term
    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// English word → Malay slang replacement, used by the reply path
#[derive(Debug, Clone, Default)]
pub struct ReverseLexicon(HashMap<String, String>);

impl ReverseLexicon {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        ReverseLexicon(
            entries
                .into_iter()
                .map(|(word, replacement)| (normalize_key(word.as_ref()), replacement.into()))
                .filter(|(word, _)| !word.is_empty())
                .collect(),
        )
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let lexicon = Self::from_entries(read_entries(path)?);
        info!(
            "Loaded {} English→Malay words from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{}; continuing with an empty English→Malay lexicon", e);
            Self::default()
        })
    }

    /// Case-insensitive lookup of a single English word
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.0.get(&word.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
