use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Required dataset not found: {0}")]
    MissingDataset(String),

    #[error("Embedding count mismatch: {tickets} tickets but {embeddings} embeddings")]
    EmbeddingMismatch { tickets: usize, embeddings: usize },

    #[error("Embedding dimension mismatch at ticket {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Analyzer error: {0}")]
    Analyzer(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TriageError {
    fn from(e: serde_json::Error) -> Self {
        TriageError::Serialize(e.to_string())
    }
}
