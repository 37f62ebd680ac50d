use clap::Parser;
use rojak::{ReverseLexicon, SlangLexicon};
use rojak_mt::{
    GoogleSpeechProvider, GoogleTranslateProvider, MockMode, MockSpeech, MockTranslator, MtResult,
    Pipeline, PipelineOptions,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Server settings; every flag can also come from the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "rojak-web", version, about = "HTTP API for the colloquial Malay helper")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "ROJAK_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Slang → English gloss dictionary
    #[arg(long, env = "ROJAK_SLANG_DICT", default_value = "data/slang_dict.json")]
    pub slang_dict: PathBuf,

    /// English → Malay dictionary for replies
    #[arg(long, env = "ROJAK_ENG_DICT", default_value = "data/eng_to_malay.json")]
    pub eng_dict: PathBuf,

    /// Directory served under /static
    #[arg(long, env = "ROJAK_STATIC_DIR", default_value = "rojak-web/src/static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "ROJAK_MT_TIMEOUT_SECS", default_value_t = 20)]
    pub mt_timeout_secs: u64,

    #[arg(long, env = "ROJAK_TTS_TIMEOUT_SECS", default_value_t = 20)]
    pub tts_timeout_secs: u64,

    /// Send partially translated replies through the model
    #[arg(long, env = "ROJAK_REPLY_FALLBACK")]
    pub reply_fallback: bool,

    /// Longest sentence still read as a self-introduction
    #[arg(long, env = "ROJAK_INTRO_WORD_LIMIT", default_value_t = rojak::overrides::DEFAULT_INTRO_WORD_LIMIT)]
    pub intro_word_limit: usize,

    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Compatible translation endpoint to use instead of Google's
    #[arg(long, env = "ROJAK_MT_BASE_URL")]
    pub mt_base_url: Option<String>,

    /// Use mock providers, no network access
    #[arg(long)]
    pub mock: bool,
}

impl ServerConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            translate_timeout: Duration::from_secs(self.mt_timeout_secs),
            speech_timeout: Duration::from_secs(self.tts_timeout_secs),
            reply_model_fallback: self.reply_fallback,
            intro_word_limit: self.intro_word_limit,
        }
    }

    /// Load dictionaries and wire up the providers
    ///
    /// Missing dictionaries or a missing API key degrade the pipeline; only
    /// a broken HTTP client setup is an error.
    pub fn build_pipeline(&self) -> MtResult<Pipeline> {
        let slang = SlangLexicon::load_or_empty(&self.slang_dict);
        let reverse = ReverseLexicon::load_or_empty(&self.eng_dict);
        info!(
            slang_terms = slang.len(),
            english_words = reverse.len(),
            "Dictionaries loaded"
        );

        if self.mock {
            warn!("Running with mock providers");
            return Ok(Pipeline::new(slang, reverse, Arc::new(MockSpeech::new()))
                .with_translator(Arc::new(MockTranslator::new(MockMode::Suffix)))
                .with_options(self.pipeline_options()));
        }

        let speech = GoogleSpeechProvider::new()?;
        let mut pipeline =
            Pipeline::new(slang, reverse, Arc::new(speech)).with_options(self.pipeline_options());

        match self
            .google_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        {
            Some(key) => {
                let mut provider = GoogleTranslateProvider::new(key.to_string())?;
                if let Some(base_url) = &self.mt_base_url {
                    provider = provider.with_base_url(base_url.as_str());
                }
                pipeline = pipeline.with_translator(Arc::new(provider));
            }
            None => warn!("GOOGLE_TRANSLATE_API_KEY not set, only override rules will translate"),
        }

        Ok(pipeline)
    }
}
