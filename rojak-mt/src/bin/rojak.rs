use clap::{Arg, ArgAction, Command};
use rojak::{ReverseLexicon, RuleOutcome, SlangLexicon};
use rojak_mt::{
    GoogleSpeechProvider, GoogleTranslateProvider, MachineTranslator, MockMode, MockSpeech,
    MockTranslator, Pipeline, SpeechSynthesizer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("rojak")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Colloquial Malay ⇄ English helper")
        .arg(
            Arg::new("text")
                .help("Text to translate (Malay), or to reply to with --reply (English)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("reply")
                .long("reply")
                .short('r')
                .help("Turn English into colloquial Malay instead")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock providers instead of Google")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show every pipeline stage")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("slang")
                .long("slang")
                .value_name("PATH")
                .help("Slang dictionary")
                .default_value("data/slang_dict.json"),
        )
        .arg(
            Arg::new("dict")
                .long("dict")
                .value_name("PATH")
                .help("English → Malay dictionary")
                .default_value("data/eng_to_malay.json"),
        )
        .get_matches();

    let text = matches
        .get_one::<String>("text")
        .ok_or("missing text argument")?;
    let reply = matches.get_flag("reply");
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");
    let slang_path = matches
        .get_one::<String>("slang")
        .map(PathBuf::from)
        .ok_or("missing --slang")?;
    let dict_path = matches
        .get_one::<String>("dict")
        .map(PathBuf::from)
        .ok_or("missing --dict")?;

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let slang = SlangLexicon::load_or_empty(&slang_path);
    let reverse = ReverseLexicon::load_or_empty(&dict_path);

    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!(
            "📚 {} slang terms, {} English words",
            slang.len(),
            reverse.len()
        );
    }

    let translator: Option<Arc<dyn MachineTranslator>> = if use_mock {
        Some(Arc::new(MockTranslator::new(MockMode::Suffix)))
    } else {
        match GoogleTranslateProvider::from_env() {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                eprintln!("⚠️  {}", e);
                eprintln!("   Overrides still apply; use --mock to try the model path");
                None
            }
        }
    };

    let speech: Arc<dyn SpeechSynthesizer> = if use_mock {
        Arc::new(MockSpeech::new())
    } else {
        Arc::new(GoogleSpeechProvider::new()?)
    };

    let mut pipeline = Pipeline::new(slang, reverse, speech);
    if let Some(translator) = translator {
        pipeline = pipeline.with_translator(translator);
    }

    if verbose {
        println!(
            "🤖 Model: {}",
            pipeline.translator_name().unwrap_or("none")
        );
        println!();
    }

    if reply {
        println!("{}", pipeline.reply(text).await);
        return Ok(());
    }

    if verbose && !text.trim().is_empty() {
        let analysis = pipeline.analyze(text);
        println!("🏷️  Annotated:  {}", analysis.annotated);
        println!("🔤 Normalized: {}", analysis.normalized);
        println!("🛡️  Guarded:    {}", analysis.guarded.text);
        for term in &analysis.guarded.terms {
            println!("   {} = \"{}\"", term.placeholder, term.original);
        }
        match &analysis.outcome {
            RuleOutcome::Translated(meaning) => println!("✅ Override:   {}", meaning),
            RuleOutcome::NoMatch => println!("➡️  Override:   none, asking the model"),
        }
        println!();
    }

    println!("{}", pipeline.translate(text).await);

    Ok(())
}
