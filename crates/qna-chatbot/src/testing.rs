//! In-process fakes for the provider traits

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, FragmentStream, LlmProvider};

/// Embeds text by keyword presence, one dimension per keyword
pub(crate) struct KeywordEmbedder {
    keywords: Vec<&'static str>,
    pub(crate) calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub(crate) fn new(keywords: Vec<&'static str>) -> Self {
        Self {
            keywords,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        Ok(self
            .keywords
            .iter()
            .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
            .collect())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Chat model that replays fixed fragments and records every prompt
pub(crate) struct ScriptedLlm {
    fragments: Vec<String>,
    fail_after_fragments: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub(crate) fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail_after_fragments: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Stream the fragments, then fail
    pub(crate) fn failing(fragments: &[&str]) -> Self {
        Self {
            fail_after_fragments: true,
            ..Self::new(fragments)
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str) {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.record(prompt);
        if self.fail_after_fragments {
            return Err(Error::llm("scripted failure"));
        }
        Ok(self.fragments.concat())
    }

    async fn complete_stream(&self, prompt: &str) -> Result<FragmentStream> {
        self.record(prompt);
        let mut items: Vec<Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        if self.fail_after_fragments {
            items.push(Err(Error::llm("scripted failure")));
        }
        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
