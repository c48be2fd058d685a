use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::traits::{check_vectors, Embedder, EmbeddingError};

/// Embeddings from a local Ollama model (`/api/embed`).
///
/// The model decides the vector width, so responses are only checked for
/// being uniform, not against the configured dimensions.
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::new(),
            url,
            model,
            dimensions,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embed", self.url.trim_end_matches('/'))
    }
}

fn request_body(model: &str, texts: &[&str]) -> Value {
    json!({ "model": model, "input": texts })
}

fn parse_response(body: &Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let rows = body["embeddings"].as_array().ok_or_else(|| EmbeddingError::Api {
        status: 200,
        body: "response has no embeddings array".to_string(),
    })?;
    Ok(rows
        .iter()
        .map(|row| {
            row.as_array()
                .map(|xs| xs.iter().filter_map(Value::as_f64).map(|x| x as f32).collect::<Vec<f32>>())
                .unwrap_or_default()
        })
        .collect())
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&request_body(&self.model, texts))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let vectors = parse_response(&response.json().await?)?;
        check_vectors(texts.len(), &vectors, None)?;
        debug!(model = %self.model, count = vectors.len(), "ollama embeddings received");
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
