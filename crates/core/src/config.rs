use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use whereisit_api::CameraConstraints;

pub const ENV_SCAN_SETTLE_MS: &str = "WHEREISIT_SCAN_SETTLE_MS";
pub const ENV_NAV_VERIFY_MS: &str = "WHEREISIT_NAV_VERIFY_MS";
pub const ENV_READER_ID: &str = "WHEREISIT_READER_ID";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scan: ScanConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Id of the element the decoder renders into.
    pub reader_element_id: String,
    /// Wait before binding when the host has no layout signal.
    pub settle_delay_ms: u64,
    pub camera: CameraConstraints,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reader_element_id: "reader".to_string(),
            settle_delay_ms: 300,
            camera: CameraConstraints::default(),
        }
    }
}

impl ScanConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// How long a soft navigation gets to move the visible location.
    pub verify_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            verify_delay_ms: 100,
        }
    }
}

impl NavigationConfig {
    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Defaults overlaid with the `WHEREISIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = parse_millis(ENV_SCAN_SETTLE_MS, var(ENV_SCAN_SETTLE_MS)) {
            self.scan.settle_delay_ms = ms;
        }
        if let Some(ms) = parse_millis(ENV_NAV_VERIFY_MS, var(ENV_NAV_VERIFY_MS)) {
            self.navigation.verify_delay_ms = ms;
        }
        if let Some(id) = var(ENV_READER_ID).filter(|id| !id.trim().is_empty()) {
            self.scan.reader_element_id = id.trim().to_string();
        }
        self
    }
}

fn parse_millis(key: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
