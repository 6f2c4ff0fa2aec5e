use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::route::ResolvedRoute;

/// Name of the upstream signal raised once a scan resolves to a route.
pub const SCAN_RESOLVED_EVENT: &str = "scan-resolved";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum ScanSessionState {
    Idle,
    Starting,
    Scanning,
    Stopping,
    Stopped,
    Failed,
}

impl ScanSessionState {
    /// Whether a session in this state still owns (or is acquiring) the camera.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ScanSessionState::Starting | ScanSessionState::Scanning | ScanSessionState::Stopping
        )
    }
}

/// Raw text produced by the decoder, opaque until it is resolved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(transparent)]
pub struct DecodedPayload(String);

impl DecodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for DecodedPayload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DecodedPayload {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The scan surface could not be located or bound.
    Bind,
    /// The camera or decoder refused to start.
    Start,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ScanFailure {
    pub stage: FailureStage,
    pub reason: String,
}

impl ScanFailure {
    pub fn bind(reason: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Bind,
            reason: reason.into(),
        }
    }

    pub fn start(reason: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Start,
            reason: reason.into(),
        }
    }
}

/// Terminal result of one decode session. Settled at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Decoded(DecodedPayload),
    Cancelled,
    Failed(ScanFailure),
}

/// Payload of the `scan-resolved` signal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct ScanResolved {
    pub path: String,
}

impl From<ResolvedRoute> for ScanResolved {
    fn from(route: ResolvedRoute) -> Self {
        Self { path: route.path }
    }
}
