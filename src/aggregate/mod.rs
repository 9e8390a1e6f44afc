pub mod stats;

use serde::Serialize;

use self::stats::{SampleAggregate, SampleStats};
use crate::correlate::Classification;
use crate::extract::stream::{ReceivedLog, SentLog};

/// Aggregate delivery statistics for one correlation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Send occurrences, repeats included.
    pub sent_count: usize,
    /// Receive events, repeats included.
    pub received_raw_count: u64,
    pub matched_count: usize,
    pub lost_count: usize,
    pub unmatched_count: usize,
    pub duplicate_count: usize,
    pub negative_latency_count: usize,
    /// Matched sends as a percentage of all sends; 0 when nothing was sent.
    pub delivery_ratio: f64,
    /// `None` when no send was matched.
    pub latency: Option<SampleStats>,
    /// Only computed for periodic streams. `None` when no positive interval exists.
    pub interval: Option<SampleStats>,
}

/// Derive summary statistics from a classification.
pub fn summarize(
    sent: &SentLog,
    received: &ReceivedLog,
    classification: &Classification,
    periodic: bool,
) -> Summary {
    let sent_count = sent.len();
    let matched_count = classification.matched.len();

    let delivery_ratio = if sent_count > 0 {
        matched_count as f64 / sent_count as f64 * 100.0
    } else {
        0.0
    };

    let latency = classification
        .latencies()
        .collect::<SampleAggregate>()
        .snapshot();

    let interval = if periodic {
        send_intervals(sent)
            .into_iter()
            .collect::<SampleAggregate>()
            .snapshot()
    } else {
        None
    };

    Summary {
        sent_count,
        received_raw_count: received.raw_count(),
        matched_count,
        lost_count: classification.lost.len(),
        unmatched_count: classification.unmatched_reception.len(),
        duplicate_count: classification.duplicate.len(),
        negative_latency_count: classification.negative_latency.len(),
        delivery_ratio,
        latency,
        interval,
    }
}

/// Positive gaps between chronologically consecutive sends.
///
/// Each unique id contributes its (last-seen) send timestamp to the
/// timeline. Ties produce zero gaps, which are dropped with any negative ones.
pub fn send_intervals(sent: &SentLog) -> Vec<i64> {
    let mut timeline: Vec<i64> = sent
        .first_seen()
        .iter()
        .filter_map(|&id| sent.timestamp(id))
        .collect();
    timeline.sort();

    timeline
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|&dt| dt > 0)
        .collect()
}
