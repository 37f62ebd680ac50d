//! Machine translation trait and locale helpers
//!
//! The pipeline only ever talks to a `dyn MachineTranslator`, so the real
//! Google provider and the deterministic mock are interchangeable.
//!
//! # Example
//!
//! ```ignore
//! use rojak_mt::{GoogleTranslateProvider, MachineTranslator};
//!
//! let provider = GoogleTranslateProvider::from_env()?;
//! let meaning = provider.translate("Saya suka _FOOD1_", "ms", "en").await?;
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "ms", "ms-MY")
    /// * `target_locale` - Target language code (e.g., "en")
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Name used in logs to identify which provider handled a request
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// - `ms-MY` → `ms`
/// - `en-GB` → `en`
/// - `ms` → `ms` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code only holds alphanumerics, hyphens and underscores
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
