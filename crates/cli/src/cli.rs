use std::path::PathBuf;

use clap::Parser;
use triage_core::Config;
use triage_engine::AnalyzerMode;

/// Cluster support tickets into incidents and triage them.
///
/// Flags override the environment (and `.env`); anything not given here
/// falls back to `Config::from_env`.
#[derive(Parser, Debug)]
#[command(name = "triage", about = "Support-ticket incident triage")]
pub struct CliArgs {
    /// Ticket JSON file (array of {id, message, ...})
    #[arg(long)]
    pub tickets: Option<PathBuf>,

    /// Infrastructure signal JSON file; a missing file means no telemetry
    #[arg(long)]
    pub signals: Option<PathBuf>,

    /// YAML triage policy (defaults are built in)
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Directory for reproduction packs
    #[arg(long)]
    pub repro_dir: Option<PathBuf>,

    /// Analyzer: rule or hybrid
    #[arg(long)]
    pub analyzer: Option<AnalyzerMode>,

    /// DBSCAN neighbourhood radius
    #[arg(long)]
    pub eps: Option<f64>,

    /// DBSCAN minimum neighbourhood size
    #[arg(long)]
    pub min_pts: Option<usize>,

    /// Distance metric: cosine or euclidean
    #[arg(long)]
    pub metric: Option<String>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Do not write reproduction packs to disk
    #[arg(long)]
    pub no_persist: bool,

    /// Disable coloured output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl CliArgs {
    /// Apply flag overrides on top of the environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(p) = &self.tickets {
            config.data.tickets_path = p.clone();
        }
        if let Some(p) = &self.signals {
            config.data.signals_path = p.clone();
        }
        if let Some(p) = &self.policy {
            config.data.policy_path = Some(p.clone());
        }
        if let Some(p) = &self.repro_dir {
            config.data.repro_dir = p.clone();
        }
        if let Some(mode) = self.analyzer {
            config.analyzer.mode = mode.to_string();
        }
        if let Some(eps) = self.eps {
            config.clustering.eps = eps;
        }
        if let Some(min_pts) = self.min_pts {
            config.clustering.min_pts = min_pts;
        }
        if let Some(metric) = &self.metric {
            config.clustering.metric = metric.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = CliArgs::parse_from([
            "triage",
            "--tickets",
            "in/t.json",
            "--analyzer",
            "hybrid",
            "--eps",
            "0.2",
            "--json",
        ]);
        let mut config = Config::for_profile("UNITTEST_NO_SUCH_PROFILE");
        let signals_before = config.data.signals_path.clone();
        args.apply(&mut config);

        assert_eq!(config.data.tickets_path, PathBuf::from("in/t.json"));
        assert_eq!(config.analyzer.mode, "hybrid");
        assert_eq!(config.clustering.eps, 0.2);
        assert_eq!(config.data.signals_path, signals_before);
        assert!(args.json);
    }

    #[test]
    fn rejects_unknown_analyzer() {
        assert!(CliArgs::try_parse_from(["triage", "--analyzer", "oracle"]).is_err());
    }
}
