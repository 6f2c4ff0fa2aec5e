use crate::error::{DecoderError, LookupError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque handle to a concrete UI element owned by the host.
///
/// Two handles may share an `element_id` while pointing at different
/// elements; `node_key` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    element_id: String,
    node_key: u64,
}

impl SurfaceHandle {
    pub fn new(element_id: impl Into<String>, node_key: u64) -> Self {
        Self {
            element_id: element_id.into(),
            node_key,
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn node_key(&self) -> u64 {
        self.node_key
    }
}

/// How the decoder is told where to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderTarget {
    /// The element is handed over directly.
    Surface(SurfaceHandle),
    /// The decoder resolves the id itself through the document lookup.
    ElementId(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    Environment,
    User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct CameraConstraints {
    pub facing_mode: FacingMode,
    pub fps: u32,
    pub scan_box_width: u32,
    pub scan_box_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            fps: 10,
            scan_box_width: 250,
            scan_box_height: 250,
        }
    }
}

/// Per-frame callbacks handed to the decoder.
pub trait FrameSink: Send + Sync {
    /// A code was found in the current frame.
    fn decoded(&self, text: String);

    /// No code in the current frame.
    fn missed(&self, reason: &str);
}

/// Camera-backed decoding library.
#[async_trait]
pub trait DecoderBackend: Send + Sync {
    /// Whether `start` accepts `DecoderTarget::Surface`.
    fn accepts_injected_surface(&self) -> bool {
        false
    }

    async fn start(
        &self,
        target: DecoderTarget,
        constraints: &CameraConstraints,
        frames: Arc<dyn FrameSink>,
    ) -> Result<(), DecoderError>;

    /// Stop the camera stream.
    async fn stop(&self) -> Result<(), DecoderError>;

    /// Release the decoder instance and whatever it rendered.
    fn clear(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSignal {
    /// The host confirmed the scan surface is laid out.
    Settled,
    /// The host has no readiness signal; callers fall back to a fixed delay.
    Unsupported,
}

/// The encapsulated scan UI hosting a session.
#[async_trait]
pub trait ScanHost: Send + Sync {
    /// Show the hosting dialog.
    fn open(&self);

    /// Close the hosting dialog.
    fn close(&self);

    /// Look an element up inside the host's own tree.
    fn find_surface(&self, element_id: &str) -> Option<SurfaceHandle>;

    async fn layout_settled(&self) -> LayoutSignal {
        LayoutSignal::Unsupported
    }
}

/// Proof that a lookup override is live. Consumed by `DocumentLookup::restore`.
#[derive(Debug, PartialEq, Eq)]
pub struct OverrideToken {
    id: u64,
    element_id: String,
}

impl OverrideToken {
    pub fn new(id: u64, element_id: impl Into<String>) -> Self {
        Self {
            id,
            element_id: element_id.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }
}

/// The process-wide, flat element lookup used by libraries that cannot be
/// handed an element directly.
pub trait DocumentLookup: Send + Sync {
    /// Make `element_id` resolve to `surface` until the token is restored.
    fn install_override(
        &self,
        element_id: &str,
        surface: SurfaceHandle,
    ) -> Result<OverrideToken, LookupError>;

    fn restore(&self, token: OverrideToken);
}
