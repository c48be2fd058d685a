use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub data: DataConfig,
    pub clustering: ClusteringConfig,
    pub analyzer: AnalyzerConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TRIAGE_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TRIAGE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            data: DataConfig::from_env_profiled(p),
            clustering: ClusteringConfig::from_env_profiled(p),
            analyzer: AnalyzerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  data:        tickets={}, signals={}, repro_dir={}",
            self.data.tickets_path.display(),
            self.data.signals_path.display(),
            self.data.repro_dir.display()
        );
        tracing::info!(
            "  clustering:  eps={}, min_pts={}, metric={}",
            self.clustering.eps,
            self.clustering.min_pts,
            self.clustering.metric
        );
        tracing::info!(
            "  analyzer:    mode={}, concurrency={}",
            self.analyzer.mode,
            self.analyzer.concurrency
        );
        tracing::info!(
            "  llm:         provider={}, configured={}",
            self.llm.provider,
            self.llm.is_configured()
        );
        tracing::info!("  ollama:      url={}", self.ollama.url);
        tracing::info!(
            "  embedding:   provider={}, dimensions={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
    }
}

// ── Data paths ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub tickets_path: PathBuf,
    pub signals_path: PathBuf,
    /// Optional YAML policy; built-in defaults apply when absent.
    pub policy_path: Option<PathBuf>,
    pub repro_dir: PathBuf,
}

impl DataConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            tickets_path: PathBuf::from(profiled_env_or(p, "TICKETS_PATH", "tickets.json")),
            signals_path: PathBuf::from(profiled_env_or(
                p,
                "SIGNALS_PATH",
                "system_signals.json",
            )),
            policy_path: profiled_env_opt(p, "TRIAGE_POLICY_PATH").map(PathBuf::from),
            repro_dir: PathBuf::from(profiled_env_or(p, "REPRO_DIR", "repro_packs")),
        }
    }
}

// ── Clustering ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// DBSCAN neighbourhood radius.
    pub eps: f64,
    /// Minimum neighbourhood size (including the point) for a core point.
    pub min_pts: usize,
    /// "cosine" or "euclidean".
    pub metric: String,
}

impl ClusteringConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            eps: profiled_env_parse(p, "CLUSTER_EPS", 0.35),
            min_pts: profiled_env_parse(p, "CLUSTER_MIN_PTS", 2),
            metric: profiled_env_or(p, "CLUSTER_METRIC", "cosine"),
        }
    }
}

// ── Analyzer ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// "rule" or "hybrid".
    pub mode: String,
    /// Clusters analysed concurrently.
    pub concurrency: usize,
}

impl AnalyzerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            mode: profiled_env_or(p, "ANALYZER_MODE", "rule"),
            concurrency: profiled_env_parse(p, "ANALYZER_CONCURRENCY", 4),
        }
    }
}

// ── LLM (OpenAI / Anthropic / Ollama) ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "anthropic", "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "ollama"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.0),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", 1024),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hashing", "ollama", "openai"
    pub provider: String,
    pub dimensions: u32,
    pub openai_model: String,
    pub batch_size: u32,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "hashing"),
            dimensions: profiled_env_parse(p, "EMBEDDING_DIMENSIONS", 256),
            openai_model: profiled_env_or(p, "OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            batch_size: profiled_env_parse(p, "EMBEDDING_BATCH_SIZE", 64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let cfg = Config::for_profile("UNITTEST_NO_SUCH_PROFILE");
        assert_eq!(cfg.profile_label(), "UNITTEST_NO_SUCH_PROFILE");
        assert!(cfg.clustering.min_pts >= 1);
        assert!(cfg.analyzer.concurrency >= 1);
    }

    #[test]
    fn empty_profile_is_default() {
        let cfg = Config::for_profile("");
        assert_eq!(cfg.profile_label(), "default");
    }
}
