//! External-model adapters: chat-completion providers, the semantic
//! cluster classifier built on them, and embedding backends.

pub mod classify;
pub mod embedding;
pub mod provider;
pub mod providers;

pub use classify::LlmClassifier;
pub use embedding::{create_embedder, embed_all, Embedder, EmbeddingError, HashingEmbedder};
pub use provider::{CompletionRequest, LlmError, LlmProvider, Message, Role};
pub use providers::{create_provider, ProviderKind};
