use super::path::{collapse_all_separators, normalize_path};
use url::Url;
use whereisit_api::BrowserLocation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootDecision {
    /// The physical URL is clean; the router may start.
    Proceed,
    /// The document was sent to a cleaned URL; do not start the router.
    Redirected { url: String },
}

/// Refuse to boot the router on a physical URL whose path repeats `/`.
///
/// Proxies occasionally hand the app such a URL, and the router mis-matches
/// every route under it. One hard navigation to the cleaned URL fixes it.
pub fn guard_physical_location(location: &dyn BrowserLocation) -> BootDecision {
    let href = location.href();
    let url = match Url::parse(&href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot parse location {:?}: {}", href, e);
            return BootDecision::Proceed;
        }
    };

    if !url.path().contains("//") {
        return BootDecision::Proceed;
    }

    let mut cleaned = format!(
        "{}{}",
        url.origin().ascii_serialization(),
        collapse_all_separators(url.path())
    );
    if let Some(query) = url.query() {
        cleaned.push('?');
        cleaned.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        cleaned.push('#');
        cleaned.push_str(fragment);
    }
    let cleaned = normalize_path(&cleaned);

    tracing::warn!(
        "Repeated separator in physical URL {}, redirecting to {}",
        href,
        cleaned
    );
    location.assign(&cleaned);
    BootDecision::Redirected { url: cleaned }
}
