//! Self-check for the `diagnose` command

use crate::clipboard::ClipboardBridge;
use crate::config::Config;
use crate::error::ShiftResult;
use crate::language;
use crate::listener::Keyboard;
use crate::translate::openrouter::{self, API_KEY_ENV};
use crate::translate::{is_noop, LanguagePair, ProviderKind, Translator};
use std::fmt;
use std::sync::Arc;

const SAMPLE_TEXT: &str = "Hello World";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct Report {
    pub checks: Vec<Check>,
}

impl Report {
    pub fn push(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        self.checks.push(Check {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        });
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ShiftLang diagnostics")?;
        for check in &self.checks {
            let mark = if check.passed { "✅" } else { "❌" };
            writeln!(f, "  {} {:<12} {}", mark, check.name, check.detail)?;
        }
        Ok(())
    }
}

pub fn check_keyboards(report: &mut Report, keyboards: &ShiftResult<Vec<Keyboard>>) {
    match keyboards {
        Ok(found) => {
            let names: Vec<&str> = found.iter().map(|k| k.name.as_str()).collect();
            report.push("keyboards", true, format!("{} found: {}", found.len(), names.join(", ")));
        }
        Err(e) => report.push(
            "keyboards",
            false,
            format!("{} (is your user in the 'input' group?)", e),
        ),
    }
}

/// Write a marker, read it back, then clear
pub async fn check_clipboard(report: &mut Report, clipboard: &ClipboardBridge) {
    let marker = format!("shiftlang-diagnose-{}", std::process::id());
    let result = match clipboard.write(&marker).await {
        Ok(()) => clipboard.read().await.map(|read| read == marker),
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => report.push("clipboard", true, "round-trip ok"),
        Ok(false) => report.push("clipboard", false, "read back a different value"),
        Err(e) => report.push("clipboard", false, e.to_string()),
    }
    let _ = clipboard.clear().await;
}

/// Translate a sample sentence from English into the other side of the
/// pair. With English as the target that is the source language.
pub async fn check_provider(
    report: &mut Report,
    translator: &Arc<dyn Translator>,
    pair: &LanguagePair,
) {
    let name = format!("provider:{}", translator.name());
    let target = if language::canonical_name(&pair.target) == "english" {
        &pair.source
    } else {
        &pair.target
    };

    match translator.translate(SAMPLE_TEXT, "english", target).await {
        Ok(out) if !is_noop(SAMPLE_TEXT, &out) => {
            report.push(&name, true, format!("\"{}\" → \"{}\"", SAMPLE_TEXT, out))
        }
        Ok(_) => report.push(&name, false, format!("returned the input unchanged ({})", target)),
        Err(e) => report.push(&name, false, e.to_string()),
    }
}

/// Providers that need a key get a line saying whether one is available
pub fn check_api_key(report: &mut Report, kind: ProviderKind, config: &Config) {
    if !kind.requires_api_key() {
        return;
    }
    if !openrouter::resolve_api_key(&config.openrouter_api_key).is_empty() {
        report.push("api key", true, "set");
    } else if openrouter::is_free_model(&config.openrouter_model) {
        report.push("api key", true, "not set, free models only");
    } else {
        report.push(
            "api key",
            false,
            format!(
                "'{}' needs a key (openrouter_api_key or {})",
                config.openrouter_model, API_KEY_ENV
            ),
        );
    }
}
