//! Google web translate provider (unofficial `translate_a/single` endpoint)

use super::Translator;
use crate::error::{ShiftError, ShiftResult};
use crate::language;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// The endpoint rejects longer payloads
pub const MAX_CHARS: usize = 5000;

pub struct GoogleTranslator {
    http: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> ShiftResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    fn request_url(text: &str, source: &str, target: &str) -> String {
        format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            ENDPOINT,
            urlencoding::encode(&language::google_code(source)),
            urlencoding::encode(&language::google_code(target)),
            urlencoding::encode(text)
        )
    }
}

/// Join the sentence segments of `[[["Translated", "Original", ...], ...], ...]`
pub fn parse_response(raw: &serde_json::Value) -> Option<String> {
    let sentences = raw.get(0)?.as_array()?;
    let mut result = String::new();
    for sentence in sentences {
        if let Some(segment) = sentence.get(0).and_then(|v| v.as_str()) {
            result.push_str(segment);
        }
    }
    Some(result)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> ShiftResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        if text.chars().count() > MAX_CHARS {
            return Err(ShiftError::provider(
                self.name(),
                format!("text longer than {} characters", MAX_CHARS),
            ));
        }

        let url = Self::request_url(text, source, target);
        debug!("🌐 Google translate {} → {}", source, target);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("❌ Google Translate error: {}", status);
            return Err(ShiftError::provider(self.name(), format!("HTTP {}", status)));
        }

        let raw: serde_json::Value = response.json().await?;
        parse_response(&raw)
            .ok_or_else(|| ShiftError::provider(self.name(), "invalid response format"))
    }
}
