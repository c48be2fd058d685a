use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{CompletionRequest, LlmError, LlmProvider, Role};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        // Claude API uses separate system parameter
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": super::chat_messages(request.messages.iter().filter(|m| m.role != Role::System)),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        if !system.is_empty() {
            body["system"] = json!(system.join("\n\n"));
        }
        body
    }
}

fn parse_response(resp: &Value) -> Result<String, LlmError> {
    resp["content"]
        .as_array()
        .and_then(|blocks| blocks.iter().find_map(|b| b["text"].as_str()))
        .map(str::to_string)
        .ok_or_else(|| LlmError::Parse("missing content[].text".into()))
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = self.request_body(&request);

        debug!("Claude request to {}", MESSAGES_URL);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status().as_u16() != 200 {
            return Err(super::api_error(response).await);
        }

        let resp: Value = response.json().await?;
        parse_response(&resp)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
