//! English → colloquial Malay reply drafting
//!
//! A literal word-for-word swap through the reverse lexicon. There is no
//! phrase matching; words the lexicon does not know are kept as they are.

use crate::lexicon::ReverseLexicon;
use crate::slang::split_affixes;

/// Result of the word swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    pub text: String,
    /// English words the lexicon had no entry for, in order
    pub unresolved: Vec<String>,
}

impl ReplyDraft {
    pub fn fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Swap each space-delimited word for its Malay equivalent
///
/// A token is first looked up as-is; failing that, its core is looked up and
/// the surrounding punctuation put back (`"friend!"` → `"geng!"`).
pub fn eng_to_malay(text: &str, lexicon: &ReverseLexicon) -> ReplyDraft {
    let mut unresolved = Vec::new();

    let converted = text
        .split(' ')
        .map(|token| {
            if token.is_empty() {
                return token.to_string();
            }

            if let Some(replacement) = lexicon.lookup(token) {
                return replacement.to_string();
            }

            let (prefix, core, suffix) = split_affixes(token);
            match lexicon.lookup(core) {
                Some(replacement) if !core.is_empty() => {
                    format!("{}{}{}", prefix, replacement, suffix)
                }
                _ => {
                    if !core.is_empty() {
                        unresolved.push(core.to_string());
                    }
                    token.to_string()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    ReplyDraft {
        text: converted,
        unresolved,
    }
}
