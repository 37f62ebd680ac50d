//! Translation pipeline orchestration
//!
//! Malay → English runs through five stages:
//!
//! 1. **Annotate** - gloss slang inline (`Jom(let's)`); always the first line
//! 2. **Normalize** - expand texting shorthand and split clauses
//! 3. **Guard** - swap cultural terms for anchors the model leaves alone
//! 4. **Override** - hand-written translations for idioms and introductions
//! 5. **Model** - only when no override fired, under a timeout
//!
//! The result is `annotated + "\n\n" + meaning`. A missing, failing or slow
//! model never fails the request; the meaning line becomes
//! [`TRANSLATION_UNAVAILABLE`] instead.
//!
//! # Example
//!
//! ```ignore
//! let pipeline = Pipeline::new(slang, reverse, Arc::new(MockSpeech::new()))
//!     .with_translator(Arc::new(GoogleTranslateProvider::from_env()?));
//!
//! let out = pipeline.translate("Jom lepak kedai mamak ni!").await;
//! assert_eq!(
//!     out,
//!     "Jom(let's) lepak(hang out) kedai mamak(Indian-Muslim eatery) ni(this)!\n\n\
//!      Let's hang out at a Mamak shop!"
//! );
//! ```

use crate::error::{MtError, MtResult};
use crate::speech::SpeechSynthesizer;
use crate::translator::MachineTranslator;
use regex::Regex;
use rojak::{
    GuardedText, Normalizer, OverrideRules, ProtectedTerms, ReverseLexicon, RuleOutcome,
    SlangExpander, SlangLexicon, eng_to_malay,
};
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Meaning line used when the model cannot produce one
pub const TRANSLATION_UNAVAILABLE: &str = "⚠️ Translation unavailable at the moment.";

pub const MALAY: &str = "ms";
pub const ENGLISH: &str = "en";

static MAMAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bmamak\b").unwrap());
static UNCLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\buncle\b").unwrap());

/// Library-level knobs, all with working defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub translate_timeout: Duration,
    pub speech_timeout: Duration,
    /// Send partially resolved replies through the model (`en → ms`)
    pub reply_model_fallback: bool,
    /// Longest sentence still read as a self-introduction
    pub intro_word_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            translate_timeout: Duration::from_secs(20),
            speech_timeout: Duration::from_secs(20),
            reply_model_fallback: false,
            intro_word_limit: rojak::overrides::DEFAULT_INTRO_WORD_LIMIT,
        }
    }
}

/// Every intermediate stage of a translation, before the model is called
#[derive(Debug, Clone)]
pub struct Analysis {
    pub annotated: String,
    pub normalized: String,
    pub guarded: GuardedText,
    pub outcome: RuleOutcome,
}

/// The Malay ⇄ English pipeline, built once and shared between requests
pub struct Pipeline {
    expander: SlangExpander,
    normalizer: Normalizer,
    guard: ProtectedTerms,
    rules: OverrideRules,
    reverse: ReverseLexicon,
    translator: Option<Arc<dyn MachineTranslator>>,
    speech: Arc<dyn SpeechSynthesizer>,
    options: PipelineOptions,
}

impl Pipeline {
    /// A pipeline with no translation model and default options
    pub fn new(
        slang: SlangLexicon,
        reverse: ReverseLexicon,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let options = PipelineOptions::default();
        Self {
            expander: SlangExpander::new(slang),
            normalizer: Normalizer::new(),
            guard: ProtectedTerms::new(),
            rules: OverrideRules::with_intro_word_limit(options.intro_word_limit),
            reverse,
            translator: None,
            speech,
            options,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn MachineTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.rules = OverrideRules::with_intro_word_limit(options.intro_word_limit);
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Name of the configured model, if any
    pub fn translator_name(&self) -> Option<&str> {
        self.translator.as_deref().map(|t| t.provider_name())
    }

    pub fn speech_name(&self) -> &str {
        self.speech.provider_name()
    }

    /// Run the rule-based stages without calling the model
    pub fn analyze(&self, text: &str) -> Analysis {
        let annotated = self.expander.expand(text);
        let normalized = self.normalizer.normalize(text);
        let guarded = self.guard.protect(&normalized);
        let outcome = self.rules.apply_to(text, &normalized);

        debug!(
            annotated = %annotated,
            normalized = %normalized,
            guarded = %guarded.text,
            protected = guarded.terms.len(),
            override_hit = outcome.is_match(),
            "Analyzed input"
        );

        Analysis {
            annotated,
            normalized,
            guarded,
            outcome,
        }
    }

    /// Colloquial Malay → annotated Malay plus an English meaning line
    ///
    /// Blank input gives an empty string. Never fails.
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let Analysis {
            annotated,
            guarded,
            outcome,
            ..
        } = self.analyze(text);

        let meaning = match outcome {
            RuleOutcome::Translated(meaning) => {
                info!("Override rule answered, model skipped");
                meaning
            }
            RuleOutcome::NoMatch => match self.model_meaning(text, &guarded).await {
                Ok(meaning) => meaning,
                Err(e) => {
                    warn!(error = %e, "Model translation failed");
                    TRANSLATION_UNAVAILABLE.to_string()
                }
            },
        };

        if meaning.is_empty() {
            annotated
        } else {
            format!("{}\n\n{}", annotated, meaning)
        }
    }

    async fn model_meaning(&self, source: &str, guarded: &GuardedText) -> MtResult<String> {
        let raw = self.call_model(&guarded.text, MALAY, ENGLISH).await?;
        let corrected = correct_in_context(source, &raw);
        let restored = guarded.restore(&corrected);
        Ok(collapse_whitespace(&restored))
    }

    /// English → colloquial Malay by word substitution
    ///
    /// With `reply_model_fallback` on, a sentence the lexicon only partly
    /// covers is handed to the model. A failed fallback keeps the substituted
    /// text and appends a warning.
    pub async fn reply(&self, text: &str) -> String {
        let draft = eng_to_malay(text, &self.reverse);

        if draft.fully_resolved() || !self.options.reply_model_fallback {
            return draft.text;
        }

        debug!(unresolved = ?draft.unresolved, "Reply falls back to the model");

        match self.call_model(&draft.text, ENGLISH, MALAY).await {
            Ok(translated) => self.guard.recase(&translated),
            Err(e) => {
                warn!(error = %e, "Reply fallback failed");
                format!("{} ⚠️ AI translation failed: {}", draft.text, e)
            }
        }
    }

    /// Synthesize Malay speech, MP3 bytes
    pub async fn speak(&self, text: &str) -> MtResult<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(MtError::SpeechError("No text to speak".to_string()));
        }

        bounded(
            self.options.speech_timeout,
            self.speech.synthesize(text, MALAY),
        )
        .await
    }

    async fn call_model(&self, text: &str, source: &str, target: &str) -> MtResult<String> {
        let translator = self.translator.as_deref().ok_or_else(|| {
            MtError::ModelUnavailable("no translation model configured".to_string())
        })?;

        debug!(provider = translator.provider_name(), source, target, "Calling model");
        bounded(
            self.options.translate_timeout,
            translator.translate(text, source, target),
        )
        .await
    }
}

/// Await `fut`, failing with `MtError::Timeout` once `limit` passes
async fn bounded<T>(limit: Duration, fut: impl Future<Output = MtResult<T>>) -> MtResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| MtError::Timeout(limit))?
}

/// Models render "mamak" as "uncle"; put the word back when the source used it
fn correct_in_context(source: &str, translated: &str) -> String {
    if MAMAK.is_match(source) {
        UNCLE.replace_all(translated, "Mamak").into_owned()
    } else {
        translated.to_string()
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMode, MockSpeech, MockTranslator};

    fn slang() -> SlangLexicon {
        SlangLexicon::from_entries([
            ("jom", "let's"),
            ("lepak", "hang out"),
            ("mamak", "Indian-Muslim eatery"),
            ("kedai mamak", "Indian-Muslim eatery"),
            ("ni", "this"),
        ])
    }

    fn reverse() -> ReverseLexicon {
        ReverseLexicon::from_entries([("i", "aku"), ("want", "nak"), ("eat", "makan")])
    }

    fn pipeline(mock: &MockTranslator) -> Pipeline {
        Pipeline::new(slang(), reverse(), Arc::new(MockSpeech::new()))
            .with_translator(Arc::new(mock.clone()))
    }

    // ========== Translate Tests ==========

    #[tokio::test]
    async fn test_blank_input() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock);
        assert_eq!(pipeline.translate("").await, "");
        assert_eq!(pipeline.translate("   ").await, "");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_idiom_skips_model() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let out = pipeline(&mock).translate("Jom lepak kedai mamak ni!").await;

        let (annotated, meaning) = out.split_once("\n\n").unwrap();
        assert!(annotated.contains("Jom(let's)"));
        assert_eq!(meaning, "Let's hang out at a Mamak shop!");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_introduction_skips_model() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let out = pipeline(&mock).translate("Nama saya Ali").await;
        assert_eq!(out, "Nama saya Ali\n\nMy name is Ali");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_protected_terms_restored() {
        let mock = MockTranslator::with_mappings([("Saya suka _FOOD1_", "en", "I like _food1_")]);
        let out = pipeline(&mock).translate("Saya suka nasi lemak").await;
        assert_eq!(out, "Saya suka nasi lemak\n\nI like Nasi lemak");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_uncle_corrected_when_source_says_mamak() {
        let mock = MockTranslator::with_mappings([("Saya suka mamak", "en", "I like  uncle")]);
        let out = pipeline(&mock).translate("Saya suka mamak").await;
        assert!(out.ends_with("\n\nI like Mamak"));
    }

    #[tokio::test]
    async fn test_uncle_kept_without_mamak() {
        let mock = MockTranslator::with_mappings([("Saya suka pakcik", "en", "I like uncle")]);
        let out = pipeline(&mock).translate("Saya suka pakcik").await;
        assert!(out.ends_with("\n\nI like uncle"));
    }

    #[tokio::test]
    async fn test_model_error_gives_notice() {
        let mock = MockTranslator::new(MockMode::Error("model crashed".to_string()));
        let out = pipeline(&mock).translate("Saya suka baca buku").await;
        assert_eq!(
            out,
            format!("Saya suka baca buku\n\n{}", TRANSLATION_UNAVAILABLE)
        );
    }

    #[tokio::test]
    async fn test_missing_model_gives_notice() {
        let pipeline = Pipeline::new(slang(), reverse(), Arc::new(MockSpeech::new()));
        assert!(pipeline.translator_name().is_none());

        let out = pipeline.translate("jom tengok wayang").await;
        assert_eq!(
            out,
            format!("jom(let's) tengok wayang\n\n{}", TRANSLATION_UNAVAILABLE)
        );
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let mock = MockTranslator::with_delay(MockMode::NoOp, 200);
        let pipeline = pipeline(&mock).with_options(PipelineOptions {
            translate_timeout: Duration::from_millis(20),
            ..PipelineOptions::default()
        });

        let out = pipeline.translate("Saya suka baca buku").await;
        assert!(out.ends_with(TRANSLATION_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_analyze_stages() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let analysis = pipeline(&mock).analyze("Sy nk makan nasi lemak");

        assert_eq!(analysis.normalized, "Saya nak makan nasi lemak");
        assert_eq!(analysis.guarded.text, "Saya nak makan _FOOD1_");
        assert_eq!(analysis.guarded.terms[0].original, "nasi lemak");
        assert!(!analysis.outcome.is_match());
    }

    // ========== Reply Tests ==========

    #[tokio::test]
    async fn test_reply_substitution_only_by_default() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let out = pipeline(&mock).reply("I want eat pizza").await;
        assert_eq!(out, "aku nak makan pizza");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_reply_fallback_uses_model() {
        let mock = MockTranslator::with_mappings([(
            "aku nak makan Nasi Lemak",
            "ms",
            "Aku nak makan Nasi Lemak sekarang",
        )]);
        let pipeline = pipeline(&mock).with_options(PipelineOptions {
            reply_model_fallback: true,
            ..PipelineOptions::default()
        });

        let out = pipeline.reply("I want eat Nasi Lemak").await;
        assert_eq!(out, "Aku nak makan nasi lemak sekarang");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_reply_fallback_skipped_when_resolved() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = pipeline(&mock).with_options(PipelineOptions {
            reply_model_fallback: true,
            ..PipelineOptions::default()
        });

        assert_eq!(pipeline.reply("I want eat").await, "aku nak makan");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_reply_fallback_failure_warns_inline() {
        let mock = MockTranslator::new(MockMode::Error("offline".to_string()));
        let pipeline = pipeline(&mock).with_options(PipelineOptions {
            reply_model_fallback: true,
            ..PipelineOptions::default()
        });

        let out = pipeline.reply("I want pizza").await;
        assert!(out.starts_with("aku nak pizza ⚠️ AI translation failed: "));
        assert!(out.contains("offline"));
    }

    // ========== Speech Tests ==========

    #[tokio::test]
    async fn test_speak_returns_audio() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let audio = pipeline(&mock).speak("Selamat pagi").await.unwrap();
        assert!(!audio.is_empty());
    }

    #[tokio::test]
    async fn test_speak_blank_rejected() {
        let mock = MockTranslator::new(MockMode::NoOp);
        assert!(pipeline(&mock).speak(" ").await.is_err());
    }

    #[tokio::test]
    async fn test_speak_failure_propagates() {
        let pipeline = Pipeline::new(slang(), reverse(), Arc::new(MockSpeech::failing("down")));
        match pipeline.speak("hai").await {
            Err(MtError::SpeechError(msg)) => assert_eq!(msg, "down"),
            other => panic!("Expected SpeechError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_speak_times_out() {
        let pipeline = Pipeline::new(
            slang(),
            reverse(),
            Arc::new(MockSpeech::new().with_delay(200)),
        )
        .with_options(PipelineOptions {
            speech_timeout: Duration::from_millis(20),
            ..PipelineOptions::default()
        });

        match pipeline.speak("hai").await {
            Err(err @ MtError::Timeout(_)) => {
                assert_eq!(err, MtError::Timeout(Duration::from_millis(20)));
                assert_eq!(err.to_string(), "Timed out after 20ms");
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    // ========== Helper Tests ==========

    #[test]
    fn test_correct_in_context() {
        assert_eq!(correct_in_context("kedai mamak", "uncle shop"), "Mamak shop");
        assert_eq!(correct_in_context("pakcik", "uncle shop"), "uncle shop");
        assert_eq!(correct_in_context("Mamak", "Uncles"), "Uncles");
    }
}
