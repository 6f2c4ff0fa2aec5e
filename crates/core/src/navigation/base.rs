use std::sync::Arc;
use url::Url;
use whereisit_api::HostDocument;

pub const ROOT_PREFIX: &str = "/";

/// Reads the runtime mount prefix from the host document's base reference.
///
/// Nothing is cached: the host may swap the base between loads.
#[derive(Clone)]
pub struct BasePathResolver {
    document: Arc<dyn HostDocument>,
}

impl BasePathResolver {
    pub fn new(document: Arc<dyn HostDocument>) -> Self {
        Self { document }
    }

    pub fn current_base_prefix(&self) -> String {
        let Some(href) = self.document.base_href() else {
            return ROOT_PREFIX.to_string();
        };

        let document_url = self.document.document_url();
        let resolved = Url::parse(&document_url).and_then(|doc| doc.join(&href));
        match resolved {
            Ok(url) => url.path().to_string(),
            Err(e) => {
                tracing::warn!(
                    "Cannot resolve base href {:?} against {:?}: {}",
                    href,
                    document_url,
                    e
                );
                ROOT_PREFIX.to_string()
            }
        }
    }
}
