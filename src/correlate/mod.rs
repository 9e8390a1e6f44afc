//! Join send and receive streams by identifier.
//!
//! Every send occurrence lands in exactly one of `matched`, `lost` or
//! `negative_latency`. Receive-side anomalies (`unmatched_reception`,
//! `duplicate`) are reported alongside; `duplicate` is an orthogonal tag
//! and overlaps the other sets.

use serde::Serialize;
use tracing::warn;

use crate::extract::stream::{ReceivedLog, SentLog};

/// A send occurrence paired with its reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: u64,
    /// Receive timestamp minus send timestamp.
    pub latency_ms: i64,
}

/// Outcome of correlating one send log against one receive log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Received with non-negative latency, in send order.
    pub matched: Vec<Match>,
    /// Never received, in send order.
    pub lost: Vec<u64>,
    /// Received before it was sent, in send order. Excluded from `matched`.
    pub negative_latency: Vec<Match>,
    /// Received but never sent, ascending.
    pub unmatched_reception: Vec<u64>,
    /// Received more than once, ascending.
    pub duplicate: Vec<u64>,
}

impl Classification {
    /// Latencies of matched sends, in send order.
    pub fn latencies(&self) -> impl Iterator<Item = i64> + '_ {
        self.matched.iter().map(|m| m.latency_ms)
    }

    pub fn matched_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.matched.iter().map(|m| m.id)
    }

    pub fn negative_latency_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.negative_latency.iter().map(|m| m.id)
    }
}

/// Classify every send occurrence and collect receive-side anomalies.
pub fn correlate(sent: &SentLog, received: &ReceivedLog) -> Classification {
    let mut result = Classification::default();

    for &id in sent.order() {
        let (Some(t_send), Some(t_recv)) = (sent.timestamp(id), received.timestamp(id)) else {
            result.lost.push(id);
            continue;
        };

        let latency_ms = t_recv - t_send;
        if latency_ms < 0 {
            warn!(id, latency_ms, "negative latency, reception discarded");
            result.negative_latency.push(Match { id, latency_ms });
        } else {
            result.matched.push(Match { id, latency_ms });
        }
    }

    result.unmatched_reception = received.ids().filter(|&id| !sent.contains(id)).collect();
    result.duplicate = received.repeated_ids().collect();

    result
}
