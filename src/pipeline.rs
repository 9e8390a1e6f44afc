//! Extract → correlate → aggregate for the two log variants.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{summarize, Summary};
use crate::config::MarkersConfig;
use crate::correlate::{correlate, Classification};
use crate::extract::event::Event;
use crate::extract::stream::{ReceivedLog, SentLog};
use crate::extract::{read_file, LineExtractor};

/// Which pair of logs is being correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Roadside triggers (GPS log) against DENM receptions (LDM log).
    V2i,
    /// CAM beacons (CAM log) against CAM receptions (LDM log).
    V2v,
}

impl Variant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2i => "v2i",
            Self::V2v => "v2v",
        }
    }

    /// Heading used by the text report.
    pub const fn title(self) -> &'static str {
        match self {
            Self::V2i => "V2I (DENM)",
            Self::V2v => "V2V (CAM)",
        }
    }

    /// Periodic streams also report inter-send interval statistics.
    pub const fn periodic(self) -> bool {
        matches!(self, Self::V2v)
    }

    /// (send marker, receive marker) for this variant.
    pub fn markers(self, cfg: &MarkersConfig) -> (&str, &str) {
        match self {
            Self::V2i => (cfg.trigger_send.as_str(), cfg.denm_received.as_str()),
            Self::V2v => (cfg.cam_send.as_str(), cfg.cam_received.as_str()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one run: what was correlated and what came out.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub variant: Variant,
    pub sent_marker: String,
    pub received_marker: String,
    pub summary: Summary,
    pub classification: Classification,
}

/// Correlate already-extracted events.
pub fn analyze_events(
    variant: Variant,
    markers: &MarkersConfig,
    sent_events: Vec<Event>,
    received_events: Vec<Event>,
) -> Analysis {
    let (sent_marker, received_marker) = variant.markers(markers);

    let sent = SentLog::from_events(sent_events);
    let received = ReceivedLog::from_events(received_events);
    let classification = correlate(&sent, &received);
    let summary = summarize(&sent, &received, &classification, variant.periodic());

    info!(
        variant = %variant,
        sent = summary.sent_count,
        received = summary.received_raw_count,
        matched = summary.matched_count,
        lost = summary.lost_count,
        "correlation complete",
    );

    Analysis {
        variant,
        sent_marker: sent_marker.to_string(),
        received_marker: received_marker.to_string(),
        summary,
        classification,
    }
}

/// Correlate two in-memory logs given as lines.
pub fn analyze_lines<S, R>(
    variant: Variant,
    markers: &MarkersConfig,
    sent_lines: S,
    received_lines: R,
) -> Result<Analysis>
where
    S: IntoIterator,
    S::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let (sent_marker, received_marker) = variant.markers(markers);
    let sent_extractor = LineExtractor::new(sent_marker)?;
    let received_extractor = LineExtractor::new(received_marker)?;

    let sent_events = sent_extractor.extract(sent_lines).collect();
    let received_events = received_extractor.extract(received_lines).collect();

    Ok(analyze_events(variant, markers, sent_events, received_events))
}

/// Correlate two log files. Either file failing to read aborts the run.
pub fn analyze_files(
    variant: Variant,
    markers: &MarkersConfig,
    sent_path: &Path,
    received_path: &Path,
) -> Result<Analysis> {
    let (sent_marker, received_marker) = variant.markers(markers);
    let sent_extractor = LineExtractor::new(sent_marker)?;
    let received_extractor = LineExtractor::new(received_marker)?;

    info!(
        variant = %variant,
        sent = %sent_path.display(),
        received = %received_path.display(),
        "analyzing logs",
    );

    let sent_events = read_file(sent_path, &sent_extractor)?;
    let received_events = read_file(received_path, &received_extractor)?;

    Ok(analyze_events(variant, markers, sent_events, received_events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_markers_default() {
        let cfg = MarkersConfig::default();
        assert_eq!(
            Variant::V2i.markers(&cfg),
            ("METRIC_TRIGGER_SEND", "METRIC_DENM_RCV")
        );
        assert_eq!(
            Variant::V2v.markers(&cfg),
            ("METRIC_CAM_SEND", "METRIC_CAM_RECV")
        );
    }

    #[test]
    fn test_only_v2v_is_periodic() {
        assert!(!Variant::V2i.periodic());
        assert!(Variant::V2v.periodic());
    }

    #[test]
    fn test_analyze_lines_uses_variant_markers() {
        let cfg = MarkersConfig::default();
        let sent = ["METRIC_CAM_SEND 1 0", "METRIC_TRIGGER_SEND 2 0"];
        let received = ["METRIC_CAM_RECV 1 15", "METRIC_DENM_RCV 2 15"];

        let analysis = analyze_lines(Variant::V2v, &cfg, sent, received).unwrap();
        assert_eq!(analysis.summary.sent_count, 1);
        assert_eq!(analysis.summary.matched_count, 1);
        assert_eq!(analysis.sent_marker, "METRIC_CAM_SEND");
    }

    #[test]
    fn test_analyze_lines_custom_markers() {
        let cfg = MarkersConfig {
            trigger_send: "TX".to_string(),
            denm_received: "RX".to_string(),
            ..Default::default()
        };

        let analysis =
            analyze_lines(Variant::V2i, &cfg, ["TX 9 100"], ["RX 9 130", "RX 9 131"]).unwrap();
        assert_eq!(analysis.classification.duplicate, vec![9]);
        assert_eq!(analysis.summary.latency.unwrap().max, 31);
        assert!(analysis.summary.interval.is_none());
    }
}
