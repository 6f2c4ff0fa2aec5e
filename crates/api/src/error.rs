use crate::models::ScanSessionState;

#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("Decoder target '{0}' not found")]
    TargetNotFound(String),
    #[error("Decoder error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Router is not initialised")]
    NotReady,
    #[error("Router rejected navigation to {url}: {reason}")]
    Rejected { url: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup override already installed for '{0}'")]
    AlreadyInstalled(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan session already active (state: {0:?})")]
    AlreadyActive(ScanSessionState),
    #[error("Scan target '{0}' is not resolvable")]
    SurfaceUnavailable(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Decoder(#[from] DecoderError),
}
