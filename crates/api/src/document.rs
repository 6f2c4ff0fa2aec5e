/// The document the application is mounted in.
pub trait HostDocument: Send + Sync {
    /// Raw `href` of the declared base reference, if any.
    fn base_href(&self) -> Option<String>;

    /// Absolute URL of the document, used to resolve a relative base.
    fn document_url(&self) -> String;
}
