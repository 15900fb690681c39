//! Translation Router
//!
//! Calls the primary provider for a resolved [`Direction`], retries the
//! opposite direction for auto-detection, then falls back to a secondary
//! provider. At most one retry and one fallback per call; provider errors
//! never escape, the original text comes back instead.

use super::{is_noop, is_usable, LanguagePair, Translator};
use crate::direction::Direction;
use crate::error::ShiftResult;
use crate::language::AUTO;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of routing one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Provider that produced `text` (`None` when nothing succeeded)
    pub provider: Option<String>,
}

impl Translation {
    /// Whether the result differs from `input`
    pub fn changed(&self, input: &str) -> bool {
        !is_noop(input, &self.text)
    }
}

pub struct TranslationRouter {
    primary: Arc<dyn Translator>,
    fallback: Option<Arc<dyn Translator>>,
    pair: LanguagePair,
}

impl TranslationRouter {
    pub fn new(primary: Arc<dyn Translator>, pair: LanguagePair) -> Self {
        Self {
            primary,
            fallback: None,
            pair,
        }
    }

    /// Secondary provider used when the primary keeps answering with no-ops
    pub fn with_fallback(mut self, fallback: Arc<dyn Translator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// (source, target) for an explicit direction; `AutoDetect` detects the
    /// source and aims at the target language
    fn languages(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::ForwardSourceToTarget => (&self.pair.source, &self.pair.target),
            Direction::ReverseTargetToSource => (&self.pair.target, &self.pair.source),
            Direction::AutoDetect => (AUTO, &self.pair.target),
        }
    }

    /// Keep a provider answer only if it is a real translation
    fn accept(provider: &str, text: &str, result: ShiftResult<String>) -> Option<String> {
        match result {
            Ok(translated) if is_usable(text, &translated) => Some(translated),
            Ok(_) => {
                debug!("{} returned the input unchanged or nothing", provider);
                None
            }
            Err(e) => {
                warn!("⚠️ Translation via {} failed: {}", provider, e);
                None
            }
        }
    }

    pub async fn route(&self, text: &str, direction: Direction) -> Translation {
        if text.trim().is_empty() {
            return Translation {
                text: text.to_string(),
                provider: None,
            };
        }

        let (source, target) = self.languages(direction);
        let primary = match direction {
            // Auto-detect into the target, retrying into the source once
            Direction::AutoDetect => self.primary.translate_bidirectional(text, &self.pair).await,
            _ => self.primary.translate(text, source, target).await,
        };
        if let Some(translated) = Self::accept(self.primary.name(), text, primary) {
            return self.done(translated, self.primary.name());
        }

        if let Some(fallback) = &self.fallback {
            info!(
                "↪️ {} gave no translation, falling back to {}",
                self.primary.name(),
                fallback.name()
            );
            let result = fallback.translate(text, source, target).await;
            if let Some(translated) = Self::accept(fallback.name(), text, result) {
                return self.done(translated, fallback.name());
            }
        }

        warn!("No provider produced a translation; returning the original text");
        Translation {
            text: text.to_string(),
            provider: None,
        }
    }

    fn done(&self, text: String, provider: &str) -> Translation {
        Translation {
            text,
            provider: Some(provider.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShiftError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls and answers from a fixed table (input echoed otherwise)
    struct TableTranslator {
        llm: bool,
        fail: bool,
        table: Vec<((&'static str, &'static str), &'static str)>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl TableTranslator {
        fn new(table: Vec<((&'static str, &'static str), &'static str)>) -> Self {
            Self {
                llm: false,
                fail: false,
                table,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Translator for TableTranslator {
        fn name(&self) -> &str {
            if self.llm {
                "llm"
            } else {
                "table"
            }
        }

        fn is_llm(&self) -> bool {
            self.llm
        }

        async fn translate(&self, text: &str, source: &str, target: &str) -> ShiftResult<String> {
            self.calls
                .lock()?
                .push((source.to_string(), target.to_string()));
            if self.fail {
                return Err(ShiftError::provider(self.name(), "connection refused"));
            }
            Ok(self
                .table
                .iter()
                .find(|((s, t), _)| *s == source && *t == target)
                .map(|(_, out)| out.to_string())
                .unwrap_or_else(|| text.to_string()))
        }
    }

    #[tokio::test]
    async fn test_forward_uses_explicit_pair() {
        let provider = Arc::new(TableTranslator::new(vec![(("hebrew", "english"), "hello")]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("hebrew", "english"));

        let result = router.route("שלום", Direction::ForwardSourceToTarget).await;
        assert_eq!(result.text, "hello");
        assert_eq!(result.provider.as_deref(), Some("table"));
        assert_eq!(provider.calls(), vec![("hebrew".into(), "english".into())]);
    }

    #[tokio::test]
    async fn test_reverse_swaps_pair() {
        let provider = Arc::new(TableTranslator::new(vec![(("english", "hebrew"), "שלום")]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("hebrew", "english"));

        let result = router.route("hello", Direction::ReverseTargetToSource).await;
        assert_eq!(result.text, "שלום");
        assert_eq!(provider.calls(), vec![("english".into(), "hebrew".into())]);
    }

    #[tokio::test]
    async fn test_auto_detect_retries_once_then_gives_up() {
        let provider = Arc::new(TableTranslator::new(vec![]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("spanish", "english"));

        let result = router.route("hola", Direction::AutoDetect).await;
        assert_eq!(result.text, "hola");
        assert_eq!(result.provider, None);
        assert_eq!(
            provider.calls(),
            vec![("auto".into(), "english".into()), ("auto".into(), "spanish".into())]
        );
    }

    #[tokio::test]
    async fn test_explicit_direction_does_not_retry() {
        let provider = Arc::new(TableTranslator::new(vec![]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("hebrew", "english"));

        router.route("Tel Aviv", Direction::ReverseTargetToSource).await;
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_after_llm_error() {
        let mut llm = TableTranslator::new(vec![]);
        llm.llm = true;
        llm.fail = true;
        let llm = Arc::new(llm);
        let google = Arc::new(TableTranslator::new(vec![(("hebrew", "english"), "peace")]));

        let router = TranslationRouter::new(llm.clone(), LanguagePair::new("hebrew", "english"))
            .with_fallback(google.clone());

        let result = router.route("שלום", Direction::ForwardSourceToTarget).await;
        assert_eq!(result.text, "peace");
        assert_eq!(result.provider.as_deref(), Some("table"));
        assert_eq!(llm.calls().len(), 1);
        assert_eq!(google.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_answer_keeps_original() {
        let provider = Arc::new(TableTranslator::new(vec![(("hebrew", "english"), "")]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("hebrew", "english"));

        let result = router.route("שלום", Direction::ForwardSourceToTarget).await;
        assert_eq!(result.text, "שלום");
        assert_eq!(result.provider, None);
    }

    #[tokio::test]
    async fn test_blank_auto_answer_retries_into_source() {
        let provider = Arc::new(TableTranslator::new(vec![
            (("auto", "english"), "  "),
            (("auto", "spanish"), "hola"),
        ]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("spanish", "english"));

        let result = router.route("hello", Direction::AutoDetect).await;
        assert_eq!(result.text, "hola");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_text_makes_no_calls() {
        let provider = Arc::new(TableTranslator::new(vec![]));
        let router = TranslationRouter::new(provider.clone(), LanguagePair::new("hebrew", "english"));

        let result = router.route("   ", Direction::AutoDetect).await;
        assert_eq!(result.text, "   ");
        assert!(provider.calls().is_empty());
    }
}
