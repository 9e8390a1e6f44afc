//! Delivery, latency and interval statistics for V2X simulation logs.
//!
//! Two logs are correlated per run: a send log (roadside triggers or CAM
//! beacons) and a receive log (LDM entries). Lines are reduced to
//! `(id, timestamp)` events, joined by id, classified, and summarized.
//!
//! ```text
//! send log ──► LineExtractor ──► SentLog ─────┐
//!                                             ├─► correlate ─► summarize ─► report
//! recv log ──► LineExtractor ──► ReceivedLog ─┘
//! ```

pub mod aggregate;
pub mod config;
pub mod correlate;
pub mod extract;
pub mod pipeline;
pub mod report;
