//! OpenRouter LLM Translation
//!
//! Sends a translation prompt to an OpenRouter chat-completion model.
//! Free-tier models work without a key; the key (config or
//! `OPENROUTER_API_KEY`) unlocks the rest.

use super::Translator;
use crate::error::{ShiftError, ShiftResult};
use crate::language::{self, AUTO};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openrouter/free";
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Chat completion response (only the fields we read)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Handles OpenRouter LLM translation
pub struct OpenRouterTranslator {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterTranslator {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> ShiftResult<Self> {
        let api_key = resolve_api_key(api_key);
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.trim().to_string()
        };

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Configured key, or `OPENROUTER_API_KEY` when the config leaves it blank
pub fn resolve_api_key(configured: &str) -> String {
    if configured.trim().is_empty() {
        std::env::var(API_KEY_ENV).unwrap_or_default().trim().to_string()
    } else {
        configured.trim().to_string()
    }
}

/// Free-tier models answer without a key
pub fn is_free_model(model: &str) -> bool {
    let model = model.trim();
    model.is_empty() || model == DEFAULT_MODEL || model.ends_with(":free")
}

pub fn build_prompt(text: &str, source: &str, target: &str) -> String {
    let source_lang = if source.eq_ignore_ascii_case(AUTO) {
        "the detected language".to_string()
    } else {
        language::display_name(source)
    };
    let target_lang = language::display_name(target);

    format!(
        r#"Translate the following text from {source_lang} to {target_lang}.
Only provide the translation, without any explanations, quotes, or additional text.

Text to translate:
{text}"#
    )
}

/// Trim the reply and drop quotes the model wrapped around it
pub fn clean_response(content: &str) -> String {
    content
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn is_llm(&self) -> bool {
        true
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> ShiftResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let prompt = build_prompt(text, source, target);
        let mut request = self.http.post(API_URL).json(&serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        }));
        if self.has_api_key() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("❌ OpenRouter authentication failed: API key is missing or invalid");
            warn!("   Get a key at https://openrouter.ai/keys and set openrouter_api_key");
            return Err(ShiftError::provider(self.name(), "unauthorized"));
        }
        if !status.is_success() {
            warn!("❌ OpenRouter API Error ({}): {}", status, body_text);
            return Err(ShiftError::provider(self.name(), format!("HTTP {}", status)));
        }

        debug!("🧠 OpenRouter raw body: {}", body_text);

        let completion: CompletionResponse = serde_json::from_str(&body_text).map_err(|e| {
            ShiftError::provider(self.name(), format!("unexpected response: {}", e))
        })?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ShiftError::provider(self.name(), "response has no choices"))?;

        Ok(clean_response(&content))
    }
}
