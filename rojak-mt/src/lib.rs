//! Machine translation and speech for the rojak pipeline
//!
//! The rule-based stages live in the `rojak` crate; this crate adds the
//! external providers and the [`Pipeline`] that sequences everything.
//!
//! # Workflow Example
//!
//! ```ignore
//! use rojak::{ReverseLexicon, SlangLexicon};
//! use rojak_mt::{GoogleSpeechProvider, GoogleTranslateProvider, Pipeline};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let slang = SlangLexicon::load_or_empty(Path::new("data/slang_dict.json"));
//!     let reverse = ReverseLexicon::load_or_empty(Path::new("data/eng_to_malay.json"));
//!
//!     let pipeline = Pipeline::new(slang, reverse, Arc::new(GoogleSpeechProvider::new()?))
//!         .with_translator(Arc::new(GoogleTranslateProvider::from_env()?));
//!
//!     println!("{}", pipeline.translate("Sy nk makan nasi lemak").await);
//!     println!("{}", pipeline.reply("I want to eat with my friend").await);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod google_translate;
pub mod mock;
pub mod pipeline;
pub mod speech;
pub mod translator;

// Integration tests (only available during testing)
#[cfg(test)]
mod integration_tests;

pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockSpeech, MockTranslator};
pub use pipeline::{Analysis, Pipeline, PipelineOptions, TRANSLATION_UNAVAILABLE};
pub use speech::{AUDIO_MIME, GoogleSpeechProvider, SpeechSynthesizer};
pub use translator::MachineTranslator;
