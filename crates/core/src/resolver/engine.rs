use crate::navigation::path::normalize_path;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;
use whereisit_api::{ResolvedRoute, RouteKind};

const DEFAULT_ORIGIN: &str = "http://localhost/";

/// `unit/<id>` or `box/<id>`, anywhere in the search string.
static ENTITY_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(unit|box)/([^/]+)").expect("entity route pattern is valid"));

/// Turns scanned text into a canonical application route.
///
/// Pure: the only context it needs is the origin that relative scans are
/// resolved against, fixed at construction.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    origin: Url,
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
        }
    }
}

impl RouteResolver {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Build a resolver for the document at `document_url`.
    ///
    /// Falls back to a local origin when the URL does not parse.
    pub fn for_document(document_url: &str) -> Self {
        match Url::parse(document_url) {
            Ok(url) => Self::new(url),
            Err(e) => {
                tracing::warn!("Unparseable document URL {:?}: {}", document_url, e);
                Self::default()
            }
        }
    }

    pub fn resolve(&self, text: &str) -> Option<ResolvedRoute> {
        if text.is_empty() {
            return None;
        }

        if Self::looks_like_location(text) {
            let haystack = self.search_string(text);
            if let Some(route) = Self::match_entity(&haystack) {
                tracing::debug!("Scan {:?} resolved to {}", text, route.path);
                return Some(route);
            }
        }

        // Bare identifiers are assumed to name a box.
        let path = normalize_path(&format!("/{}/{}", RouteKind::Box.as_str(), text));
        tracing::debug!("Scan {:?} treated as box identifier", text);
        Some(ResolvedRoute { path })
    }

    fn looks_like_location(text: &str) -> bool {
        text.starts_with("http") || text.starts_with('/')
    }

    /// Path plus fragment of the parsed URL, or the raw text when it does not parse.
    fn search_string(&self, text: &str) -> String {
        match self.origin.join(text) {
            Ok(url) => {
                let mut haystack = url.path().to_string();
                if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
                    haystack.push('#');
                    haystack.push_str(fragment);
                }
                haystack
            }
            Err(e) => {
                tracing::debug!("Scan {:?} is not a URL ({}), matching raw text", text, e);
                text.to_string()
            }
        }
    }

    fn match_entity(haystack: &str) -> Option<ResolvedRoute> {
        let caps = ENTITY_ROUTE.captures(haystack)?;
        let kind = RouteKind::from_segment(caps.get(1)?.as_str())?;
        Some(ResolvedRoute::entity(kind, caps.get(2)?.as_str()))
    }
}
