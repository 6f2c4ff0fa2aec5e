pub mod document;
pub mod error;
pub mod models;
pub mod navigation;
pub mod scan;

// Re-export commonly used types
pub use document::HostDocument;
pub use error::{DecoderError, LookupError, RouterError, ScanError};
pub use models::*;
pub use navigation::{BrowserLocation, SoftRouter};
pub use scan::{
    CameraConstraints, DecoderBackend, DecoderTarget, DocumentLookup, FacingMode, FrameSink,
    LayoutSignal, OverrideToken, ScanHost, SurfaceHandle,
};
