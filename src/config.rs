use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::extract::event::Marker;
use crate::pipeline::Variant;
use crate::report::ReportFormat;

/// Top-level configuration. Every field is optional; an absent file means
/// all defaults.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Logging verbosity (trace, debug, info, warn, error). Default: "warn".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Marker tokens searched for in each log.
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Report rendering options.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Marker tokens per event kind.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersConfig {
    /// V2I send marker in the GPS log. Default: "METRIC_TRIGGER_SEND".
    #[serde(default = "default_trigger_send")]
    pub trigger_send: String,

    /// V2I receive marker in the LDM log. Default: "METRIC_DENM_RCV".
    #[serde(default = "default_denm_received")]
    pub denm_received: String,

    /// V2V send marker in the CAM log. Default: "METRIC_CAM_SEND".
    #[serde(default = "default_cam_send")]
    pub cam_send: String,

    /// V2V receive marker in the LDM log. Default: "METRIC_CAM_RECV".
    #[serde(default = "default_cam_received")]
    pub cam_received: String,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Output format. Default: text.
    #[serde(default)]
    pub format: ReportFormat,

    /// Print the lost/unmatched/duplicate id lists. Default: true.
    #[serde(default = "default_true")]
    pub list_ids: bool,
}

// --- Default value functions ---

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_trigger_send() -> String {
    Marker::TriggerSend.as_str().to_string()
}

fn default_denm_received() -> String {
    Marker::DenmRecv.as_str().to_string()
}

fn default_cam_send() -> String {
    Marker::CamSend.as_str().to_string()
}

fn default_cam_received() -> String {
    Marker::CamRecv.as_str().to_string()
}

fn default_true() -> bool {
    true
}

// --- Default trait impls ---

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            markers: MarkersConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            trigger_send: default_trigger_send(),
            denm_received: default_denm_received(),
            cam_send: default_cam_send(),
            cam_received: default_cam_received(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            list_ids: default_true(),
        }
    }
}

// --- Validation and loading ---

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        let cfg: Config = serde_yaml::from_str(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate the configuration for required fields and consistency.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            bail!("log_level must not be empty");
        }

        self.markers.validate()
    }
}

impl MarkersConfig {
    fn validate(&self) -> Result<()> {
        let named = [
            ("markers.trigger_send", &self.trigger_send),
            ("markers.denm_received", &self.denm_received),
            ("markers.cam_send", &self.cam_send),
            ("markers.cam_received", &self.cam_received),
        ];

        for (name, marker) in named {
            if marker.trim().is_empty() {
                bail!("{name} must not be empty");
            }
        }

        for variant in [Variant::V2i, Variant::V2v] {
            let (sent, received) = variant.markers(self);
            if sent == received {
                bail!("{variant} send and receive markers must differ (both are {sent:?})");
            }
        }

        Ok(())
    }
}
