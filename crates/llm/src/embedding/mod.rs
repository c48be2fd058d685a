pub mod hashing;
pub mod ollama;
pub mod openai;
pub mod traits;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

use std::sync::Arc;

use tracing::{debug, info};
use triage_core::config::{EmbeddingConfig, LlmConfig, OllamaConfig};

/// Create the embedding backend named by `EMBEDDING_PROVIDER`.
pub fn create_embedder(
    embedding: &EmbeddingConfig,
    llm: &LlmConfig,
    ollama: &OllamaConfig,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let dims = embedding.dimensions as usize;
    let embedder: Arc<dyn Embedder> = match embedding.provider.as_str() {
        "hashing" => Arc::new(HashingEmbedder::new(dims)),
        "ollama" => Arc::new(OllamaEmbedder::new(
            ollama.url.clone(),
            ollama.embedding_model.clone(),
            dims,
        )),
        "openai" => {
            let api_key = llm
                .openai_api_key
                .clone()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Arc::new(OpenAiEmbedder::new(
                api_key,
                embedding.openai_model.clone(),
                llm.openai_base_url.clone(),
                dims,
            ))
        }
        other => {
            return Err(EmbeddingError::NotConfigured(format!(
                "unknown embedding provider: '{other}'"
            )))
        }
    };
    info!(provider = embedder.name(), dimensions = dims, "embedder ready");
    Ok(embedder)
}

/// Embed every text, `batch_size` at a time, keeping input order. All
/// returned vectors share one width.
pub async fn embed_all(
    embedder: &dyn Embedder,
    texts: &[&str],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut out = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        let vectors = embedder.embed_batch(chunk).await?;
        // Later batches must match the width of the first.
        traits::check_vectors(chunk.len(), &vectors, out.first().map(Vec::len))?;
        debug!(batch = chunk.len(), total = out.len() + chunk.len(), "embedded batch");
        out.extend(vectors);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use triage_core::Config;

    struct FakeEmbedder {
        call_count: AtomicUsize,
        drop_last: bool,
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut out: Vec<Vec<f32>> = texts.iter().map(|t| vec![t.len() as f32]).collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[tokio::test]
    async fn batches_and_keeps_order() {
        let fake = FakeEmbedder {
            call_count: AtomicUsize::new(0),
            drop_last: false,
        };
        let out = embed_all(&fake, &["a", "bb", "ccc", "dddd", "eeeee"], 2)
            .await
            .unwrap();
        assert_eq!(fake.call_count.load(Ordering::SeqCst), 3);
        assert_eq!(out, vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]]);
    }

    #[tokio::test]
    async fn short_batch_is_error() {
        let fake = FakeEmbedder {
            call_count: AtomicUsize::new(0),
            drop_last: true,
        };
        let err = embed_all(&fake, &["a", "b"], 8).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::CountMismatch { sent: 2, received: 1 }));
    }

    #[test]
    fn factory_selects_backend() {
        let mut cfg = Config::for_profile("UNITTEST_NO_SUCH_PROFILE");
        cfg.embedding.provider = "hashing".into();
        let e = create_embedder(&cfg.embedding, &cfg.llm, &cfg.ollama).unwrap();
        assert_eq!(e.name(), "hashing");

        cfg.embedding.provider = "openai".into();
        cfg.llm.openai_api_key = None;
        assert!(create_embedder(&cfg.embedding, &cfg.llm, &cfg.ollama).is_err());

        cfg.embedding.provider = "word2vec".into();
        assert!(create_embedder(&cfg.embedding, &cfg.llm, &cfg.ollama).is_err());
    }
}
