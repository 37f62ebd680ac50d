//! Inline slang glossing
//!
//! Recognized slang is rendered as `term(gloss)` directly in the source text:
//!
//! ```ignore
//! let expander = SlangExpander::new(lexicon);
//! assert_eq!(
//!     expander.expand("Jom lepak kedai mamak ni!"),
//!     "Jom(let's) lepak(hang out) kedai mamak(Indian-Muslim eatery) ni(this)!"
//! );
//! ```
//!
//! Multi-word phrases win over their parts, longest phrase first. Whitespace
//! between tokens is copied from the input, so text without slang comes back
//! byte-identical, and an already glossed phrase is left as it is.

use crate::lexicon::SlangLexicon;
use regex::{Match, Regex};
use std::sync::LazyLock;

/// Verbs that are never glossed on their own; the override rules and the
/// model handle them.
pub const NEVER_GLOSSED_VERBS: &[&str] = &["makan", "minum", "pergi", "balik", "tidur", "datang"];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Split a token into leading punctuation, core and trailing punctuation
///
/// The core runs from the first to the last alphanumeric character.
pub(crate) fn split_affixes(token: &str) -> (&str, &str, &str) {
    let core_start = token
        .find(|c: char| c.is_alphanumeric())
        .unwrap_or(token.len());
    let core_end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(core_start);

    (
        &token[..core_start],
        &token[core_start..core_end],
        &token[core_end..],
    )
}

/// Lowercased alphabetic-only projection of a token
fn projection(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A phrase window may only carry punctuation at its outer edges
fn edges_only(window: &[&str]) -> bool {
    let last = window.len() - 1;
    window.iter().enumerate().all(|(k, token)| {
        let (prefix, _, suffix) = split_affixes(token);
        (k == 0 || prefix.is_empty()) && (k == last || suffix.is_empty())
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Annotates slang terms with their glosses
#[derive(Debug, Clone, Default)]
pub struct SlangExpander {
    lexicon: SlangLexicon,
}

impl SlangExpander {
    pub fn new(lexicon: SlangLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &SlangLexicon {
        &self.lexicon
    }

    /// Gloss every recognized term in `text`
    pub fn expand(&self, text: &str) -> String {
        let tokens: Vec<Match<'_>> = TOKEN.find_iter(text).collect();
        let mut out = String::with_capacity(text.len() + 32);
        let mut cursor = 0;
        let mut i = 0;

        while i < tokens.len() {
            out.push_str(&text[cursor..tokens[i].start()]);

            if let Some(last) = self.existing_gloss(text, &tokens, i) {
                out.push_str(&text[tokens[i].start()..tokens[last].end()]);
                cursor = tokens[last].end();
                i = last + 1;
                continue;
            }

            match self.match_at(text, &tokens, i) {
                Some((consumed, rendered)) => {
                    out.push_str(&rendered);
                    cursor = tokens[i + consumed - 1].end();
                    i += consumed;
                }
                None => {
                    out.push_str(tokens[i].as_str());
                    cursor = tokens[i].end();
                    i += 1;
                }
            }
        }

        out.push_str(&text[cursor..]);
        out
    }

    /// Longest lexicon match starting at token `i`, as `(tokens consumed,
    /// rendered annotation)`
    fn match_at(&self, text: &str, tokens: &[Match<'_>], i: usize) -> Option<(usize, String)> {
        let available = tokens.len() - i;
        let longest = self.lexicon.max_phrase_words().min(available);

        for n in (2..=longest).rev() {
            let window: Vec<&str> = tokens[i..i + n].iter().map(Match::as_str).collect();
            if !edges_only(&window) {
                continue;
            }

            let key = window
                .iter()
                .map(|token| projection(token))
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(gloss) = self.lexicon.gloss(&key) {
                return Some((n, render(text, &tokens[i..i + n], gloss)));
            }
        }

        let key = projection(tokens[i].as_str());
        if key.is_empty() || NEVER_GLOSSED_VERBS.contains(&key.as_str()) {
            return None;
        }

        self.lexicon
            .gloss(&key)
            .map(|gloss| (1, render(text, &tokens[i..=i], gloss)))
    }

    /// If tokens starting at `i` already read `term(gloss)` for a lexicon
    /// term, return the index of the token holding the closing parenthesis.
    fn existing_gloss(&self, text: &str, tokens: &[Match<'_>], i: usize) -> Option<usize> {
        let longest = self.lexicon.max_phrase_words().min(tokens.len() - i);

        for n in (1..=longest).rev() {
            let last = &tokens[i + n - 1];
            // a lone token may open with its own punctuation, e.g. "(lepak(hang"
            let skip = if n == 1 {
                split_affixes(last.as_str()).0.len()
            } else {
                0
            };
            let Some(open) = last.as_str()[skip..].find('(').map(|p| p + skip) else {
                continue;
            };

            let head = &last.as_str()[..open];
            let mut window: Vec<&str> = tokens[i..i + n - 1].iter().map(Match::as_str).collect();
            window.push(head);
            if head.is_empty() || !split_affixes(head).2.is_empty() || !edges_only(&window) {
                continue;
            }

            let key = window
                .iter()
                .map(|token| projection(token))
                .collect::<Vec<_>>()
                .join(" ");
            let Some(gloss) = self.lexicon.gloss(&key) else {
                continue;
            };

            let open_abs = last.start() + open;
            let Some(close_rel) = text[open_abs..].find(')') else {
                continue;
            };
            let close_abs = open_abs + close_rel;

            if collapse_whitespace(&text[open_abs + 1..close_abs]) != collapse_whitespace(gloss) {
                continue;
            }

            return tokens[i + n - 1..]
                .iter()
                .position(|token| token.start() <= close_abs && close_abs < token.end())
                .map(|offset| i + n - 1 + offset);
        }

        None
    }
}

/// `prefix` + source text of the phrase + `(gloss)` + `suffix`
fn render(text: &str, window: &[Match<'_>], gloss: &str) -> String {
    let first = window[0];
    let last = window[window.len() - 1];
    let (prefix, _, _) = split_affixes(first.as_str());
    let (_, _, suffix) = split_affixes(last.as_str());

    let term = &text[first.start() + prefix.len()..last.end() - suffix.len()];
    format!("{}{}({}){}", prefix, term, gloss, suffix)
}
