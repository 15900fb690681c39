#![allow(dead_code)]

pub mod mock_desktop;
pub mod mock_translator;

use mock_desktop::MockDesktop;
use mock_translator::MockTranslator;
use shiftlang::clipboard::ClipboardBridge;
use shiftlang::config::{Config, Timing};
use shiftlang::pipeline::Pipeline;
use shiftlang::translate::{LanguagePair, TranslationRouter};
use std::sync::Arc;

/// Config for `source` ↔ `target` with delays shrunk for tests
pub fn test_config(source: &str, target: &str) -> Config {
    Config {
        source_language: source.to_string(),
        target_language: target.to_string(),
        timing: Timing {
            capture_timeout_ms: 150,
            capture_poll_ms: 5,
            cooldown_ms: 1500,
            provider_timeout_secs: 1,
            release_delay_ms: 0,
            copy_settle_ms: 0,
            paste_delay_ms: 0,
            clear_delay_ms: 0,
        },
        ..Config::default()
    }
}

pub fn router(config: &Config, primary: &MockTranslator) -> TranslationRouter {
    TranslationRouter::new(Arc::new(primary.clone()), LanguagePair::from_config(config))
}

pub fn router_with_fallback(
    config: &Config,
    primary: &MockTranslator,
    fallback: &MockTranslator,
) -> TranslationRouter {
    router(config, primary).with_fallback(Arc::new(fallback.clone()))
}

/// Pipeline whose clipboard and key injection both go to `desktop`
pub fn pipeline(desktop: &MockDesktop, router: TranslationRouter, config: &Config) -> Pipeline {
    Pipeline::new(
        ClipboardBridge::new(Arc::new(desktop.clone())),
        Box::new(desktop.clone()),
        router,
        config,
    )
}
