//! Deterministic providers for testing
//!
//! Lets the pipeline and the web handlers run without API keys or network
//! access.
//!
//! # Example
//!
//! ```ignore
//! use rojak_mt::{MachineTranslator, MockMode, MockTranslator};
//!
//! let mock = MockTranslator::new(MockMode::Suffix);
//! assert_eq!(mock.translate("hai", "ms", "en").await?, "hai_en");
//! ```

use crate::error::{MtError, MtResult};
use crate::speech::SpeechSynthesizer;
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_en"
    /// Placeholders pass through intact
    Suffix,

    /// Predefined `(text, target_locale) → translation` mappings,
    /// falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Simulate a provider error
    Error(String),

    /// Simulate a model that is not loaded
    Unavailable,

    /// Return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
///
/// Counts its calls so tests can assert the model was never consulted.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Each call sleeps `delay_ms` before answering
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a `Mappings` mock from `(text, target_locale, translation)` triples
    pub fn with_mappings<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(text, target, translation)| {
                ((text.to_string(), target.to_string()), translation.to_string())
            })
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    /// Number of `translate` calls so far, shared between clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::Unavailable => Err(MtError::ModelUnavailable(
                "mock model not loaded".to_string(),
            )),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

/// Speech mock returning fixed bytes or a fixed error
#[derive(Debug, Clone)]
pub struct MockSpeech {
    result: Result<Vec<u8>, String>,
    delay_ms: u64,
}

impl MockSpeech {
    /// Answers with a fake MP3 frame header followed by the spoken text
    pub fn new() -> Self {
        Self {
            result: Ok(Vec::new()),
            delay_ms: 0,
        }
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            result: Ok(bytes),
            delay_ms: 0,
        }
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            result: Err(msg.into()),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str, _lang: &str) -> MtResult<Vec<u8>> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.result {
            Ok(bytes) if bytes.is_empty() => {
                let mut audio = vec![0xFF, 0xFB];
                audio.extend_from_slice(text.as_bytes());
                Ok(audio)
            }
            Ok(bytes) => Ok(bytes.clone()),
            Err(msg) => Err(MtError::SpeechError(msg.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Speech"
    }
}
