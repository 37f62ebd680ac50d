//! Rule-based pipeline for colloquial Malay
//!
//! The pieces that turn a chatty Malay sentence into something a learner (or
//! an MT system) can work with:
//!
//! - [`lexicon`] loads the slang and English→Malay dictionaries
//! - [`slang`] glosses slang inline: `Jom(let's) lepak(hang out)`
//! - [`normalizer`] expands texting shorthand and splits clauses
//! - [`guard`] shields cultural terms from the MT system
//! - [`overrides`] answers idioms and introductions without any MT at all
//! - [`reply`] swaps English words for their Malay slang equivalents
//! - [`coach`] scores a pronunciation attempt

pub mod coach;
pub mod error;
pub mod guard;
pub mod lexicon;
pub mod normalizer;
pub mod overrides;
pub mod reply;
pub mod slang;

pub use coach::{CoachReport, score as score_pronunciation};
pub use error::LexiconError;
pub use guard::{GuardedText, ProtectedTerm, ProtectedTerms};
pub use lexicon::{ReverseLexicon, SlangLexicon};
pub use normalizer::Normalizer;
pub use overrides::{OverrideRules, RuleFamily, RuleOutcome};
pub use reply::{ReplyDraft, eng_to_malay};
pub use slang::SlangExpander;

/// Uppercase the first character, leave the rest alone
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
