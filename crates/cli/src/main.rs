mod cli;
mod ingest;
mod persist;
mod render;
#[cfg(test)]
mod testing;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use triage_compute::{Clusterer, ClustererConfig};
use triage_core::{Config, Snapshot};
use triage_engine::{AnalyzerMode, ClusterAnalyzer, HybridAnalyzer, RuleBasedAnalyzer, SemanticAnalyzer, TriagePipeline};
use triage_llm::{create_embedder, embed_all, LlmClassifier};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the report (or --json) owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    triage_core::config::load_dotenv();
    let args = CliArgs::parse();

    let mut config = Config::from_env();
    args.apply(&mut config);
    config.log_summary();

    let policy = triage_rules::load_policy_or_default(config.data.policy_path.as_deref())
        .context("failed to load triage policy")?;

    let tickets = ingest::load_tickets(&config.data.tickets_path).context("failed to load tickets")?;
    let signal = ingest::load_signal(&config.data.signals_path).context("failed to load system signal")?;

    let embedder = create_embedder(&config.embedding, &config.llm, &config.ollama)
        .context("failed to create embedder")?;
    let texts: Vec<&str> = tickets.iter().map(|t| t.message.as_str()).collect();
    let embeddings = embed_all(embedder.as_ref(), &texts, config.embedding.batch_size as usize)
        .await
        .context("failed to embed tickets")?;

    let snapshot = Snapshot {
        tickets,
        embeddings,
        signal,
    };

    let mode: AnalyzerMode = config
        .analyzer
        .mode
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid ANALYZER_MODE")?;
    let analyzer: Arc<dyn ClusterAnalyzer> = match mode {
        AnalyzerMode::Rule => Arc::new(RuleBasedAnalyzer::new()),
        AnalyzerMode::Hybrid => {
            let classifier = LlmClassifier::from_config(&config.llm, &config.ollama)
                .context("failed to create classifier")?;
            Arc::new(HybridAnalyzer::new(SemanticAnalyzer::new(Arc::new(classifier))))
        }
    };

    let clusterer = Clusterer::new(ClustererConfig::from_config(&config.clustering)?);
    let pipeline = TriagePipeline::new(clusterer, analyzer, policy)
        .with_repro_dir(config.data.repro_dir.clone())
        .with_concurrency(config.analyzer.concurrency);

    let report = pipeline.run(&snapshot).await.context("triage run failed")?;

    if !args.no_persist {
        let written = persist::write_repro_packs(&report, &snapshot)?;
        if !written.is_empty() {
            info!(count = written.len(), dir = %config.data.repro_dir.display(), "reproduction packs saved");
        }
    }

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        let color = !args.no_color && io::stdout().is_terminal();
        render::render(&report, &mut stdout, color)?;
    }

    Ok(())
}
