use async_trait::async_trait;

/// Failures while turning ticket messages into vectors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding backend returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Every vector in a run must share one width or distances are meaningless.
    #[error("vector {index} has width {actual}, expected {expected}")]
    DimensionMismatch { index: usize, expected: usize, actual: usize },

    #[error("sent {sent} texts, got {received} vectors back")]
    CountMismatch { sent: usize, received: usize },

    #[error("embedder not configured: {0}")]
    NotConfigured(String),
}

/// Turns ticket text into vectors for clustering.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Width the backend was configured for. Advisory for backends whose
    /// model fixes its own width.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}

/// Check that a backend answered with one vector per text and that all
/// vectors share a width. With `expected` set, that width must match it.
pub(crate) fn check_vectors(
    sent: usize,
    vectors: &[Vec<f32>],
    expected: Option<usize>,
) -> Result<(), EmbeddingError> {
    if vectors.len() != sent {
        return Err(EmbeddingError::CountMismatch {
            sent,
            received: vectors.len(),
        });
    }
    let Some(width) = expected.or_else(|| vectors.first().map(Vec::len)) else {
        return Ok(());
    };
    match vectors.iter().position(|v| v.len() != width) {
        Some(index) => Err(EmbeddingError::DimensionMismatch {
            index,
            expected: width,
            actual: vectors[index].len(),
        }),
        None => Ok(()),
    }
}
