//! End-to-end tests for the translation pipeline
//!
//! Run against the bundled dictionaries under `data/`. The mock tests need no
//! network; the ignored ones call the real Google APIs.
//!
//! # Running Integration Tests
//!
//! ```bash
//! export GOOGLE_TRANSLATE_API_KEY=your_api_key
//! cargo test -p rojak-mt integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use crate::*;
    use rojak::{ReverseLexicon, SlangLexicon};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data")
    }

    fn bundled_pipeline(translator: Arc<dyn MachineTranslator>) -> Pipeline {
        let slang = SlangLexicon::load(&data_dir().join("slang_dict.json"))
            .expect("bundled slang dictionary loads");
        let reverse = ReverseLexicon::load(&data_dir().join("eng_to_malay.json"))
            .expect("bundled English dictionary loads");

        Pipeline::new(slang, reverse, Arc::new(MockSpeech::new())).with_translator(translator)
    }

    /// Skip test if API key not available
    fn require_api_key() -> bool {
        std::env::var("GOOGLE_TRANSLATE_API_KEY").is_ok()
    }

    // ============================================================================
    // Mock-backed flows
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_mamak_idiom() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = bundled_pipeline(Arc::new(mock.clone()));

        let out = pipeline.translate("Jom lepak kedai mamak ni!").await;
        println!("{}", out);

        let (annotated, meaning) = out.split_once("\n\n").expect("meaning line present");
        assert!(annotated.starts_with("Jom(let's)"));
        assert!(annotated.contains("lepak(hang out)"));
        assert!(annotated.ends_with("!"));
        assert_eq!(meaning, "Let's hang out at a Mamak shop!");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_e2e_self_introduction() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = bundled_pipeline(Arc::new(mock.clone()));

        let out = pipeline.translate("Nama saya Ali").await;
        assert_eq!(out.split_once("\n\n").map(|(_, m)| m), Some("My name is Ali"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_e2e_shorthand_and_protected_food() {
        let mock = MockTranslator::with_mappings([(
            "Saya nak makan _FOOD1_ dengan _DRINK1_",
            "en",
            "I want to eat _FOOD1_ with _DRINK1_",
        )]);
        let pipeline = bundled_pipeline(Arc::new(mock.clone()));

        let out = pipeline.translate("Sy nk makan nasi lemak dgn teh tarik").await;
        println!("{}", out);

        assert!(out.ends_with("\n\nI want to eat Nasi lemak with Teh tarik"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_e2e_blank_input() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let pipeline = bundled_pipeline(Arc::new(mock.clone()));

        assert_eq!(pipeline.translate("").await, "");
        assert_eq!(pipeline.translate(" \t ").await, "");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_e2e_model_unavailable() {
        let pipeline = bundled_pipeline(Arc::new(MockTranslator::new(MockMode::Unavailable)));

        let out = pipeline.translate("Saya suka baca buku").await;
        assert_eq!(out, format!("Saya suka baca buku\n\n{}", TRANSLATION_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_e2e_no_slang_line_is_identical() {
        let pipeline = bundled_pipeline(Arc::new(MockTranslator::new(MockMode::NoOp)));

        let out = pipeline.translate("Saya suka baca buku").await;
        assert!(out.starts_with("Saya suka baca buku\n\n"));
    }

    #[tokio::test]
    async fn test_e2e_reply() {
        let pipeline = bundled_pipeline(Arc::new(MockTranslator::new(MockMode::Suffix)));

        let out = pipeline.reply("I want to eat with my friend").await;
        println!("{}", out);
        assert!(out.starts_with("aku nak"));
        assert!(out.contains("makan"));
        assert!(out.ends_with("geng"));
    }

    // ============================================================================
    // Real API
    // ============================================================================

    #[tokio::test]
    #[ignore]
    async fn test_e2e_real_model() {
        if !require_api_key() {
            eprintln!("⚠️  Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let provider = GoogleTranslateProvider::from_env().unwrap();
        let pipeline = bundled_pipeline(Arc::new(provider));

        let start = Instant::now();
        let out = pipeline.translate("Saya suka makan nasi lemak pagi-pagi").await;
        println!("⏱️  {:?}\n{}", start.elapsed(), out);

        assert!(!out.ends_with(TRANSLATION_UNAVAILABLE));
        assert!(out.contains("Nasi lemak"));
    }
}
