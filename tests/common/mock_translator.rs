//! Mock Translator for Testing
//!
//! Records every call and answers from scripted replies.

use async_trait::async_trait;
use shiftlang::translate::Translator;
use shiftlang::{ShiftError, ShiftResult};
use std::sync::{Arc, Mutex};

/// One recorded `translate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Mock provider: replies matched on (source, target), input echoed otherwise
#[derive(Debug, Clone)]
pub struct MockTranslator {
    name: String,
    llm: bool,
    fail: bool,
    replies: Vec<(String, String, String)>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockTranslator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            llm: false,
            fail: false,
            replies: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `reply` for calls from `source` to `target`
    pub fn with_reply(mut self, source: &str, target: &str, reply: &str) -> Self {
        self.replies
            .push((source.to_string(), target.to_string(), reply.to_string()));
        self
    }

    /// Behave as an LLM-style provider
    pub fn as_llm(mut self) -> Self {
        self.llm = true;
        self
    }

    /// Every call fails with a network-style error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// (source, target) of every call, in order
    pub fn directions(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|call| (call.source, call.target))
            .collect()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_llm(&self) -> bool {
        self.llm
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> ShiftResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        self.calls.lock().unwrap().push(Call {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });

        if self.fail {
            return Err(ShiftError::provider(&self.name, "connection reset by peer"));
        }

        Ok(self
            .replies
            .iter()
            .find(|(s, t, _)| s == source && t == target)
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or_else(|| text.to_string()))
    }
}
