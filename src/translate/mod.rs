//! Translation Module
//!
//! Providers behind one capability trait:
//! - Google: unofficial web translate endpoint
//! - OpenRouter: LLM chat completion
//!
//! The [`router::TranslationRouter`] owns the fallback chain.

pub mod google;
pub mod openrouter;
pub mod router;

use crate::config::Config;
use crate::error::ShiftResult;
use crate::language::AUTO;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use google::GoogleTranslator;
pub use openrouter::OpenRouterTranslator;
pub use router::TranslationRouter;

/// The configured (source, target) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.source_language, &config.target_language)
    }
}

/// A provider response identical to its input, modulo case and surrounding
/// whitespace. Both quota-limited web endpoints and LLMs answer this way when
/// they fail, and so does a text that is legitimately the same in both
/// languages; the two cannot be told apart.
pub fn is_noop(input: &str, output: &str) -> bool {
    input.trim().to_lowercase() == output.trim().to_lowercase()
}

/// A provider answer worth pasting: not blank and not a no-op. Pasting a
/// blank answer would erase the selection.
pub fn is_usable(input: &str, output: &str) -> bool {
    !output.trim().is_empty() && !is_noop(input, output)
}

/// Trait for translation providers
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// LLM-style providers get a non-LLM fallback in the router
    fn is_llm(&self) -> bool {
        false
    }

    /// Translate `text` from `source` (or [`AUTO`]) to `target`.
    /// Empty or whitespace-only input must come back unchanged without a
    /// network call.
    async fn translate(&self, text: &str, source: &str, target: &str) -> ShiftResult<String>;

    /// Auto-detect the source and translate into `pair.target`; if that is a
    /// no-op the text is probably already in the target language, so
    /// translate into `pair.source` instead.
    /// A failed first call counts as a no-op.
    async fn translate_bidirectional(&self, text: &str, pair: &LanguagePair) -> ShiftResult<String> {
        match self.translate(text, AUTO, &pair.target).await {
            Ok(first) if is_usable(text, &first) => return Ok(first),
            Ok(_) => debug!("{}: auto → {} gave nothing usable", self.name(), pair.target),
            Err(e) => warn!("{}: auto → {} failed: {}", self.name(), pair.target, e),
        }
        self.translate(text, AUTO, &pair.source).await
    }
}

/// Closed set of providers selectable from the config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    OpenRouter,
}

impl ProviderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "google" => Some(ProviderKind::Google),
            "openrouter" => Some(ProviderKind::OpenRouter),
            _ => None,
        }
    }

    /// Provider from the config; unknown names fall back to Google
    pub fn from_config(config: &Config) -> Self {
        match Self::from_name(&config.translation_provider) {
            Some(kind) => kind,
            None => {
                warn!(
                    "Unknown translation provider '{}', falling back to google",
                    config.translation_provider
                );
                ProviderKind::Google
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "Google Translate",
            ProviderKind::OpenRouter => "OpenRouter AI",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderKind::OpenRouter)
    }
}

/// Factory to create a provider
pub fn create_translator(kind: ProviderKind, config: &Config) -> ShiftResult<Arc<dyn Translator>> {
    let timeout = config.timing.provider_timeout();
    let translator: Arc<dyn Translator> = match kind {
        ProviderKind::Google => Arc::new(GoogleTranslator::new(timeout)?),
        ProviderKind::OpenRouter => Arc::new(OpenRouterTranslator::new(
            &config.openrouter_api_key,
            &config.openrouter_model,
            timeout,
        )?),
    };
    info!("✅ Translation provider '{}' initialized", kind.display_name());
    Ok(translator)
}

/// Router for the configured provider. LLM-style providers get Google as
/// fallback.
pub fn build_router(config: &Config) -> ShiftResult<TranslationRouter> {
    let primary = create_translator(ProviderKind::from_config(config), config)?;
    let is_llm = primary.is_llm();
    let router = TranslationRouter::new(primary, LanguagePair::from_config(config));

    if is_llm {
        let fallback = create_translator(ProviderKind::Google, config)?;
        return Ok(router.with_fallback(fallback));
    }
    Ok(router)
}
