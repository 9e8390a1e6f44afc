use std::fmt;

/// Marker identifies the kind of metric line emitted by the simulation.
/// Labels must match the tokens written by the OpenC2X metric hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Roadside trigger fired on the GPS side (V2I send anchor).
    TriggerSend,
    /// DENM stored in the LDM of the receiving vehicle.
    DenmRecv,
    /// CAM beacon sent by a vehicle (V2V send anchor).
    CamSend,
    /// CAM beacon stored in the LDM of a neighbour.
    CamRecv,
}

impl Marker {
    /// Returns the token as it appears in the log files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TriggerSend => "METRIC_TRIGGER_SEND",
            Self::DenmRecv => "METRIC_DENM_RCV",
            Self::CamSend => "METRIC_CAM_SEND",
            Self::CamRecv => "METRIC_CAM_RECV",
        }
    }

    /// Convert from the log token.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "METRIC_TRIGGER_SEND" => Some(Self::TriggerSend),
            "METRIC_DENM_RCV" => Some(Self::DenmRecv),
            "METRIC_CAM_SEND" => Some(Self::CamSend),
            "METRIC_CAM_RECV" => Some(Self::CamRecv),
            _ => None,
        }
    }

    /// Return all markers.
    pub fn all() -> &'static [Self] {
        &[Self::TriggerSend, Self::DenmRecv, Self::CamSend, Self::CamRecv]
    }

    /// Whether this marker anchors the send side of a correlation.
    pub const fn is_send(self) -> bool {
        matches!(self, Self::TriggerSend | Self::CamSend)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (identifier, timestamp) pair pulled out of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub id: u64,
    /// Milliseconds, monotonic per source log.
    pub timestamp_ms: i64,
}

impl Event {
    pub const fn new(id: u64, timestamp_ms: i64) -> Self {
        Self { id, timestamp_ms }
    }
}
