use crate::error::RouterError;

/// In-process router. A successful `go` does not guarantee the visible
/// location changed.
pub trait SoftRouter: Send + Sync {
    fn go(&self, url: &str) -> Result<(), RouterError>;
}

/// The visible browser location.
pub trait BrowserLocation: Send + Sync {
    /// Path component of the visible location.
    fn pathname(&self) -> String;

    /// Full URL of the visible location.
    fn href(&self) -> String;

    /// Hard navigation: replace the document with `url`.
    fn assign(&self, url: &str);
}
