use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{check_vectors, Embedder, EmbeddingError};

/// Embeddings from an OpenAI-compatible `/v1/embeddings` endpoint. The
/// configured width is requested and enforced.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, base_url: Option<String>, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com".to_string()),
            dimensions,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

/// Items may arrive out of order; `index` ties each one back to its input.
fn into_ordered(
    mut resp: EmbedResponse,
    sent: usize,
    expected_dims: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    resp.data.sort_by_key(|item| item.index);
    let vectors: Vec<Vec<f32>> = resp.data.into_iter().map(|item| item.embedding).collect();
    check_vectors(sent, &vectors, Some(expected_dims))?;
    Ok(vectors)
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
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

        into_ordered(response.json().await?, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_is_reordered_by_index() {
        let resp: EmbedResponse = serde_json::from_str(
            r#"{"data": [{"embedding": [2.0, 2.0], "index": 1}, {"embedding": [1.0, 1.0], "index": 0}]}"#,
        )
        .unwrap();
        let out = into_ordered(resp, 2, 2).unwrap();
        assert_eq!(out, vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let resp: EmbedResponse =
            serde_json::from_str(r#"{"data": [{"embedding": [1.0], "index": 0}]}"#).unwrap();
        assert!(matches!(
            into_ordered(resp, 1, 3),
            Err(EmbeddingError::DimensionMismatch { index: 0, expected: 3, actual: 1 })
        ));
    }
}
