pub mod claude;
pub mod ollama;
pub mod openai;

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use tracing::info;
use triage_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider, Message};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat backends the classifier can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    OpenAi,
    Anthropic,
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LlmError::NotConfigured(format!("unknown LLM provider: '{other}'"))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        })
    }
}

fn required_key(key: &Option<String>, var: &str) -> Result<String, LlmError> {
    key.clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LlmError::NotConfigured(format!("{var} not set")))
}

/// Build the backend named by `LLM_PROVIDER`. Hosted backends need their key.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    let kind: ProviderKind = llm_config.provider.parse()?;
    let provider: Box<dyn LlmProvider> = match kind {
        ProviderKind::Ollama => Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        )),
        ProviderKind::OpenAi => Box::new(openai::OpenAiProvider::new(
            required_key(&llm_config.openai_api_key, "OPENAI_API_KEY")?,
            llm_config.openai_model.clone(),
            llm_config
                .openai_base_url
                .clone()
                .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string()),
        )),
        ProviderKind::Anthropic => Box::new(claude::ClaudeProvider::new(
            required_key(&llm_config.anthropic_api_key, "ANTHROPIC_API_KEY")?,
            llm_config.anthropic_model.clone(),
        )),
    };
    info!(provider = %kind, "classifier backend ready");
    Ok(provider)
}

fn chat_messages<'a>(messages: impl Iterator<Item = &'a Message>) -> Vec<Value> {
    messages
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}

/// Read the body of a non-200 response into an [`LlmError::Api`].
async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    LlmError::Api { status, body }
}
