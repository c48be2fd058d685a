//! Semantic classification of cluster text through a chat-completion model.

use async_trait::async_trait;
use tracing::{debug, info};
use triage_core::config::{LlmConfig, OllamaConfig};
use triage_core::vocab::{ROOT_CAUSES, STAGES, VOCABULARY_VERSION};
use triage_core::{Classification, Classifier, TriageError};

use crate::provider::{CompletionRequest, LlmError, LlmProvider, Message};

/// System prompt template, with the closed vocabulary substituted in at construction.
const SYSTEM_TEMPLATE: &str = include_str!("../../../data/prompts/cluster-classifier-system.md");
const STAGES_PLACEHOLDER: &str = "<<<stages>>>";
const ROOT_CAUSES_PLACEHOLDER: &str = "<<<root_causes>>>";

/// Upper bound on cluster text sent to the model, in characters.
const MAX_INPUT_CHARS: usize = 12_000;

/// [`Classifier`] backed by any [`LlmProvider`].
pub struct LlmClassifier {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
}

impl LlmClassifier {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
            system_prompt: render_system_prompt(),
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(llm: &LlmConfig, ollama: &OllamaConfig) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(llm, ollama)?;
        info!(
            provider = provider.name(),
            vocabulary = VOCABULARY_VERSION,
            "LLM classifier ready"
        );
        Ok(Self::new(provider, llm.temperature, llm.max_tokens))
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

fn render_system_prompt() -> String {
    let bullets = |labels: &[&str]| {
        labels
            .iter()
            .map(|l| format!("- {l}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    SYSTEM_TEMPLATE
        .replace(STAGES_PLACEHOLDER, &bullets(STAGES))
        .replace(ROOT_CAUSES_PLACEHOLDER, &bullets(ROOT_CAUSES))
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, TriageError> {
        let user_prompt = format!(
            "Support tickets:\n\n{}\n\nRespond ONLY with valid JSON, no explanation.",
            truncate_chars(text, MAX_INPUT_CHARS)
        );

        let request = CompletionRequest {
            messages: vec![
                Message::system(self.system_prompt.clone()),
                Message::user(user_prompt),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_output: true,
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| TriageError::Classifier(format!("{}: {e}", self.provider.name())))?;

        debug!("LLM response: {}", response);

        let json_str = extract_json(&response);
        serde_json::from_str::<Classification>(json_str).map_err(|e| {
            TriageError::Classifier(format!("unparseable classification ({e}): {response}"))
        })
    }
}

/// Extract JSON from an LLM response, handling markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```") {
        let after_tick = &trimmed[start + 3..];
        // Skip past any language identifier on the same line
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Replays a canned response and records the last request.
    struct FakeProvider {
        reply: Result<String, u16>,
        last: Arc<Mutex<Option<CompletionRequest>>>,
    }

    impl FakeProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            *self.last.lock().unwrap() = Some(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    body: "boom".into(),
                }),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn classifier(provider: FakeProvider) -> LlmClassifier {
        LlmClassifier::new(Box::new(provider), 0.0, 512)
    }

    #[test]
    fn prompt_lists_the_whole_vocabulary() {
        let prompt = render_system_prompt();
        assert!(!prompt.contains(STAGES_PLACEHOLDER));
        assert!(!prompt.contains(ROOT_CAUSES_PLACEHOLDER));
        for label in STAGES.iter().chain(ROOT_CAUSES.iter()) {
            assert!(prompt.contains(label), "missing {label}");
        }
    }

    #[test]
    fn template_has_each_placeholder_once() {
        assert_eq!(SYSTEM_TEMPLATE.matches(STAGES_PLACEHOLDER).count(), 1);
        assert_eq!(SYSTEM_TEMPLATE.matches(ROOT_CAUSES_PLACEHOLDER).count(), 1);
    }

    #[tokio::test]
    async fn parses_fenced_json_reply() {
        let c = classifier(FakeProvider::replying(
            "Here you go:\n```json\n{\"stage\": \"Stage 3 - Live Production\", \"root_cause\": \"Platform Issue - API Timeout\", \"confidence\": \"0.9\", \"reasoning\": \"timeouts\"}\n```",
        ));
        let out = c.classify("checkout API timing out").await.unwrap();
        assert_eq!(out.root_cause, "Platform Issue - API Timeout");
        assert_eq!(out.confidence, serde_json::json!("0.9"));
    }

    #[tokio::test]
    async fn request_is_json_mode_with_system_prompt() {
        let provider = FakeProvider::replying("{}");
        let last = Arc::clone(&provider.last);
        let c = LlmClassifier::new(Box::new(provider), 0.2, 300);
        c.classify("merchant text").await.unwrap();

        let request = last.lock().unwrap().take().unwrap();
        assert!(request.json_output);
        assert_eq!(request.max_tokens, 300);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, c.system_prompt());
        assert!(request.messages[1].content.contains("merchant text"));
    }

    #[tokio::test]
    async fn provider_failure_is_classifier_error() {
        let c = classifier(FakeProvider {
            reply: Err(503),
            last: Arc::default(),
        });
        let err = c.classify("x").await.unwrap_err();
        assert!(matches!(err, TriageError::Classifier(msg) if msg.contains("fake") && msg.contains("503")));
    }

    #[tokio::test]
    async fn prose_reply_is_classifier_error() {
        let c = classifier(FakeProvider::replying("I cannot help with that."));
        assert!(matches!(c.classify("x").await, Err(TriageError::Classifier(_))));
    }

    #[test]
    fn extract_json_variants() {
        assert_eq!(extract_json(r#"{"a": 1}"#), r#"{"a": 1}"#);
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), r#"{"a": 1}"#);
        assert_eq!(extract_json("Sure: {\"a\": 1} done"), r#"{"a": 1}"#);
        assert_eq!(extract_json("nothing"), "nothing");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
