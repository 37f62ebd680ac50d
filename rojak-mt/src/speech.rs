//! Text-to-speech providers
//!
//! # Example
//!
//! ```ignore
//! use rojak_mt::{GoogleSpeechProvider, SpeechSynthesizer};
//!
//! let speech = GoogleSpeechProvider::new()?;
//! let mp3 = speech.synthesize("Selamat pagi", "ms").await?;
//! std::fs::write("pagi.mp3", mp3)?;
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::{normalize_locale, validate_locale};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// MIME type of the audio every synthesizer returns
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Trait for speech synthesis providers
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken in `lang`, returning MP3 bytes
    async fn synthesize(&self, text: &str, lang: &str) -> MtResult<Vec<u8>>;

    fn provider_name(&self) -> &str;
}

const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Google Translate's public speech endpoint
///
/// The endpoint only accepts short strings, so text is split at word
/// boundaries and the MP3 chunks are concatenated.
#[derive(Debug, Clone)]
pub struct GoogleSpeechProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleSpeechProvider {
    /// Maximum characters the endpoint accepts per request
    pub const MAX_CHUNK_CHARS: usize = 100;

    pub fn new() -> MtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_TTS_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Split text into chunks of at most `max_chars` characters, breaking
    /// between words. A single word longer than the limit is cut hard.
    pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_chars {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_chars) {
                    chunks.push(piece.iter().collect());
                }
                continue;
            }

            let needed = if current.is_empty() { word_len } else { word_len + 1 };
            if current_len + needed > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    async fn fetch_chunk(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> MtResult<Vec<u8>> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| MtError::ConfigError(format!("Invalid speech endpoint: {}", e)))?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MtError::SpeechError(format!(
                "speech endpoint returned {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechProvider {
    async fn synthesize(&self, text: &str, lang: &str) -> MtResult<Vec<u8>> {
        validate_locale(lang)?;
        let lang = normalize_locale(lang);

        let chunks = Self::chunk_text(text, Self::MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(MtError::SpeechError("No text to speak".to_string()));
        }

        debug!(chunks = chunks.len(), lang = %lang, "Synthesizing speech");

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, &lang, idx, chunks.len()).await?);
        }

        Ok(audio)
    }

    fn provider_name(&self) -> &str {
        "Google TTS"
    }
}
