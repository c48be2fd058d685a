use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use triage_engine::{ClusterReport, RiskLevel, RunReport};

/// Color scheme for the report.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const LABEL: Color = Color::Cyan;
    const DIM: Color = Color::DarkGrey;
    const HIGH: Color = Color::Red;
    const MEDIUM: Color = Color::Yellow;
    const LOW: Color = Color::Green;
    const RESTRAINT: Color = Color::DarkYellow;
}

/// Writes optionally coloured text. Colour codes are skipped entirely when
/// `color` is false so the output can be piped or compared in tests.
struct Painter<'w, W: Write> {
    out: &'w mut W,
    color: bool,
}

impl<W: Write> Painter<'_, W> {
    fn paint(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            self.out.write_all(text.as_bytes())
        }
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn field(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.paint(Colors::LABEL, &format!("  {label}: "))?;
        self.plain(value)?;
        self.plain("\n")
    }

    fn rule(&mut self) -> io::Result<()> {
        self.paint(Colors::DIM, &format!("{}\n", "-".repeat(60)))
    }
}

fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::High => Colors::HIGH,
        RiskLevel::Medium => Colors::MEDIUM,
        RiskLevel::Low => Colors::LOW,
    }
}

/// Render a run report as human-readable text.
pub fn render(report: &RunReport, out: &mut impl Write, color: bool) -> io::Result<()> {
    let mut p = Painter { out, color };

    p.paint(Colors::HEADER, "INCIDENT TRIAGE REPORT\n")?;
    p.paint(
        Colors::DIM,
        &format!(
            "run {} | {} | analyzer: {} | vocabulary {}\n",
            report.run_id,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.analyzer,
            report.vocabulary_version
        ),
    )?;
    p.plain(&format!(
        "{} tickets, {} clusters, {} unclustered\n",
        report.ticket_count,
        report.clusters.len(),
        report.noise.ticket_count
    ))?;
    p.rule()?;

    for cluster in &report.clusters {
        render_cluster(&mut p, cluster)?;
        p.rule()?;
    }

    if report.noise.ticket_count > 0 {
        let ids: Vec<_> = report.noise.ticket_ids.iter().map(|id| id.0.as_str()).collect();
        p.paint(
            Colors::DIM,
            &format!(
                "Noise: {} tickets did not join any cluster ({})\n",
                report.noise.ticket_count,
                ids.join(", ")
            ),
        )?;
        p.rule()?;
    }

    p.paint(Colors::HEADER, "GLOBAL SYSTEM HEALTH CHECK\n")?;
    if report.global.is_critical() {
        p.paint(Colors::HIGH, "  STATUS: CRITICAL\n")?;
        for severe in &report.global.severe_clusters {
            p.plain(&format!(
                "  - {} ({} tickets, {}, confidence {:.2})\n",
                severe.cluster_name, severe.ticket_count, severe.root_cause, severe.confidence
            ))?;
        }
        p.paint(Colors::HIGH, &format!("  {}\n", report.global.recommendation))?;
    } else {
        p.paint(Colors::LOW, "  STATUS: NORMAL\n")?;
        p.plain("  All systems operational. No widespread platform incident detected.\n")?;
        p.plain(&format!("  {}\n", report.global.recommendation))?;
    }

    if let Some(alert) = &report.proactive {
        p.rule()?;
        p.paint(Colors::HEADER, "PROACTIVE DETECTION\n")?;
        p.field(
            "Signal",
            &format!(
                "{} at {}% over {} (threshold {}%)",
                alert.signal, alert.value, alert.time_window, alert.threshold
            ),
        )?;
        p.field("Assumption", &alert.assumption)?;
        p.field("Action", &alert.recommended_action)?;
    }

    p.out.flush()
}

fn render_cluster<W: Write>(p: &mut Painter<'_, W>, c: &ClusterReport) -> io::Result<()> {
    let a = &c.analysis;
    p.paint(
        Colors::HEADER,
        &format!("{} ({} tickets)\n", a.cluster_name, a.ticket_count),
    )?;
    p.field("Stage", &a.stage)?;
    p.field("Root cause", &a.root_cause)?;
    p.field("Confidence", &format!("{:.2}", a.confidence))?;
    if !a.evidence_terms.is_empty() {
        p.field("Evidence", &a.evidence_terms.join(", "))?;
    }
    p.field("Reasoning", &a.reasoning)?;
    p.field("Trend", &format!("{} - {}", c.trend.trajectory, c.trend.prediction))?;

    if !c.alternatives.is_empty() {
        p.paint(Colors::LABEL, "  Alternatives considered:\n")?;
        for alt in &c.alternatives {
            p.plain(&format!("    - {}: {}\n", alt.hypothesis, alt.reason_rejected))?;
        }
    }

    p.paint(Colors::LABEL, "  Risk: ")?;
    p.paint(risk_color(c.decision.risk_level), &format!("{}\n", c.decision.risk_level))?;
    p.field("Action", &c.decision.recommended_action)?;
    p.paint(
        Colors::RESTRAINT,
        &format!(
            "  Not doing: {} ({})\n",
            c.restraint.action_not_taken, c.restraint.reason
        ),
    )?;
    p.field("Outlook", &c.projected_outcome)?;

    if let Some(pack) = &c.repro_pack {
        let triggers: Vec<_> = pack.triggers.iter().map(String::as_str).collect();
        p.field(
            "Repro pack",
            &format!(
                "{} [{}] {} ({})",
                pack.incident_id,
                pack.pack_type,
                pack.path.display(),
                triggers.join(", ")
            ),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_report;

    fn rendered(report: &RunReport) -> String {
        let mut buf = Vec::new();
        render(report, &mut buf, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn critical_report_lists_severe_clusters() {
        let (report, _) = sample_report(std::path::Path::new("packs"));
        let text = rendered(&report);

        assert!(text.starts_with("INCIDENT TRIAGE REPORT"));
        assert!(text.contains("Root cause: Platform Issue - API Timeout"));
        assert!(text.contains("Risk: High"));
        assert!(text.contains("STATUS: CRITICAL"));
        assert!(text.contains("FREEZE DEPLOYMENTS & PAGE ON-CALL"));
        assert!(text.contains("PROACTIVE DETECTION"));
        assert!(text.contains("Repro pack: INC-"));
        assert!(text.contains("Noise: 1 tickets"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let (report, _) = sample_report(std::path::Path::new("packs"));
        assert!(!rendered(&report).contains('\u{1b}'));
    }

    #[test]
    fn colored_output_uses_escape_codes() {
        let (report, _) = sample_report(std::path::Path::new("packs"));
        let mut buf = Vec::new();
        render(&report, &mut buf, true).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains('\u{1b}'));
    }
}
