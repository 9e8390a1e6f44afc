//! Human-readable and JSON rendering of an [`Analysis`].
//!
//! Rendering is deterministic: the same analysis always produces the same
//! bytes, so repeated runs over identical logs can be diffed.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::aggregate::stats::SampleStats;
use crate::config::ReportConfig;
use crate::pipeline::Analysis;

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Render `analysis` in the configured format.
pub fn render(analysis: &Analysis, cfg: &ReportConfig) -> Result<String> {
    match cfg.format {
        ReportFormat::Text => Ok(render_text(analysis, cfg)),
        ReportFormat::Json => render_json(analysis),
    }
}

/// Render the plain-text report.
pub fn render_text(analysis: &Analysis, cfg: &ReportConfig) -> String {
    TextReport {
        analysis,
        list_ids: cfg.list_ids,
    }
    .to_string()
}

/// Render the report as pretty-printed JSON, newline terminated.
pub fn render_json(analysis: &Analysis) -> Result<String> {
    let mut out = serde_json::to_string_pretty(analysis).context("serializing report")?;
    out.push('\n');
    Ok(out)
}

const LABEL_WIDTH: usize = 33;

struct TextReport<'a> {
    analysis: &'a Analysis,
    list_ids: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.analysis;
        let s = &a.summary;
        let c = &a.classification;

        let heading = format!("===== {} RESULTS =====", a.variant.title());
        writeln!(f)?;
        writeln!(f, "{heading}")?;
        writeln!(f)?;

        row(f, &format!("Sent ({}):", a.sent_marker), s.sent_count)?;
        row(
            f,
            &format!("Received ({}, raw):", a.received_marker),
            s.received_raw_count,
        )?;
        row(f, "Matched (valid):", s.matched_count)?;
        row(f, "Unmatched receptions:", s.unmatched_count)?;
        row(f, "Lost:", s.lost_count)?;
        row(f, "Duplicate receptions:", s.duplicate_count)?;
        row(f, "Negative latency (discarded):", s.negative_latency_count)?;
        row(
            f,
            "PDR (valid matches only):",
            format_args!("{:.2}%", s.delivery_ratio),
        )?;

        writeln!(f)?;
        writeln!(f, "--- Latency (matched only) ---")?;
        match &s.latency {
            Some(stats) => sample_block(f, "latency", stats)?,
            None => writeln!(f, "No data: no valid latencies to analyze.")?,
        }

        if a.variant.periodic() {
            writeln!(f)?;
            writeln!(f, "--- Interval between sends ---")?;
            match &s.interval {
                Some(stats) => sample_block(f, "interval", stats)?,
                None => writeln!(f, "No data: fewer than two distinct send times.")?,
            }
        }

        if self.list_ids {
            let negative: Vec<u64> = c.negative_latency_ids().collect();
            id_block(f, "Unmatched receptions (ids)", &c.unmatched_reception)?;
            id_block(f, "Lost sends (ids)", &c.lost)?;
            id_block(f, "Duplicate receptions (ids)", &c.duplicate)?;
            id_block(f, "Negative latency (ids)", &negative)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(heading.len()))
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{label:<LABEL_WIDTH$} {value}")
}

fn sample_block(f: &mut fmt::Formatter<'_>, what: &str, stats: &SampleStats) -> fmt::Result {
    row(f, &format!("Mean {what}:"), format_args!("{:.2} ms", stats.mean))?;
    row(f, &format!("Min {what}:"), format_args!("{} ms", stats.min))?;
    row(f, &format!("Max {what}:"), format_args!("{} ms", stats.max))
}

fn id_block(f: &mut fmt::Formatter<'_>, title: &str, ids: &[u64]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "--- {title} ---")?;
    writeln!(f, "{ids:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkersConfig;
    use crate::pipeline::{analyze_lines, Variant};

    fn v2i_scenario() -> Analysis {
        analyze_lines(
            Variant::V2i,
            &MarkersConfig::default(),
            [
                "METRIC_TRIGGER_SEND 1 100",
                "METRIC_TRIGGER_SEND 2 150",
                "METRIC_TRIGGER_SEND 3 200",
            ],
            [
                "METRIC_DENM_RCV 1 180",
                "METRIC_DENM_RCV 2 140",
                "METRIC_DENM_RCV 2 140",
                "METRIC_DENM_RCV 4 500",
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_text_report_v2i() {
        let text = render_text(&v2i_scenario(), &ReportConfig::default());

        assert!(text.contains("===== V2I (DENM) RESULTS ====="));
        assert!(text.contains("PDR (valid matches only):         33.33%"));
        assert!(text.contains("Mean latency:                     80.00 ms"));
        assert!(text.contains("Min latency:                      80 ms"));
        assert!(text.contains("--- Unmatched receptions (ids) ---\n[4]\n"));
        assert!(text.contains("--- Lost sends (ids) ---\n[3]\n"));
        assert!(text.contains("--- Duplicate receptions (ids) ---\n[2]\n"));
        assert!(text.contains("--- Negative latency (ids) ---\n[2]\n"));
        assert!(!text.contains("Interval"));
    }

    #[test]
    fn test_text_report_without_id_lists() {
        let cfg = ReportConfig {
            list_ids: false,
            ..Default::default()
        };
        let text = render_text(&v2i_scenario(), &cfg);
        assert!(!text.contains("(ids)"));
        assert!(text.contains("Lost:"));
    }

    #[test]
    fn test_text_report_no_data() {
        let analysis = analyze_lines(
            Variant::V2v,
            &MarkersConfig::default(),
            ["METRIC_CAM_SEND 1 0"],
            Vec::<String>::new(),
        )
        .unwrap();

        let text = render_text(&analysis, &ReportConfig::default());
        assert!(text.contains("No data: no valid latencies to analyze."));
        assert!(text.contains("No data: fewer than two distinct send times."));
        assert!(text.contains("0.00%"));
        assert!(!text.contains("Mean latency"));
    }

    #[test]
    fn test_text_report_is_deterministic() {
        let cfg = ReportConfig::default();
        assert_eq!(
            render_text(&v2i_scenario(), &cfg),
            render_text(&v2i_scenario(), &cfg)
        );
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&v2i_scenario()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["variant"], "v2i");
        assert_eq!(value["summary"]["sent_count"], 3);
        assert_eq!(value["summary"]["latency"]["min"], 80);
        assert!(value["summary"]["interval"].is_null());
        assert_eq!(value["classification"]["lost"], serde_json::json!([3]));
        assert_eq!(
            value["classification"]["negative_latency"][0]["latency_ms"],
            -10
        );
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let cfg = ReportConfig {
            format: ReportFormat::Json,
            ..Default::default()
        };
        let out = render(&v2i_scenario(), &cfg).unwrap();
        assert!(out.starts_with('{'));
    }
}
