//! Writes reproduction packs next to their descriptors' paths.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use triage_core::Snapshot;
use triage_engine::RunReport;

/// Write one pretty-printed JSON file per triggered pack. Returns the paths written.
pub fn write_repro_packs(report: &RunReport, snapshot: &Snapshot) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for cluster in &report.clusters {
        let Some(pack) = &cluster.repro_pack else {
            continue;
        };

        let members: HashSet<_> = cluster.ticket_ids.iter().collect();
        let tickets: Vec<_> = snapshot
            .tickets
            .iter()
            .filter(|t| members.contains(&t.id))
            .collect();

        let body = json!({
            "descriptor": pack,
            "run_id": report.run_id,
            "generated_at": report.generated_at,
            "vocabulary_version": report.vocabulary_version,
            "analysis": cluster.analysis,
            "decision": cluster.decision,
            "restraint": cluster.restraint,
            "alternatives": cluster.alternatives,
            "trend": cluster.trend,
            "signal": snapshot.signal,
            "tickets": tickets,
        });

        if let Some(dir) = pack.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(&body)?;
        std::fs::write(&pack.path, text)
            .with_context(|| format!("failed to write {}", pack.path.display()))?;

        info!(
            incident_id = %pack.incident_id,
            path = %pack.path.display(),
            "reproduction pack written"
        );
        written.push(pack.path.clone());
    }

    Ok(written)
}
