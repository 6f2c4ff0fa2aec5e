use super::base::BasePathResolver;
use super::path::{join_prefixed, normalize_path};
use crate::config::NavigationConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use whereisit_api::{
    AppRoute, BrowserLocation, NavigationAttempt, NavigationOutcome, NavigationReport, SoftRouter,
};

/// Everything a component needs to move the user somewhere.
///
/// Passed explicitly instead of reaching for a global router.
#[derive(Clone)]
pub struct NavigationContext {
    pub base: BasePathResolver,
    pub router: Arc<dyn SoftRouter>,
    pub location: Arc<dyn BrowserLocation>,
}

/// Soft navigation, verified after a short window, with a hard reload as
/// the fallback when the router silently drops the request.
#[derive(Clone)]
pub struct NavigationDispatcher {
    context: NavigationContext,
    config: NavigationConfig,
    /// Bumped by every `navigate`; a verification timer that is no longer
    /// the latest must not fall back.
    generation: Arc<AtomicU64>,
}

impl NavigationDispatcher {
    pub fn new(context: NavigationContext, config: NavigationConfig) -> Self {
        Self {
            context,
            config,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    /// Prefixed, normalized URL for an app-relative path. Also used for
    /// asset URLs that live under the mount prefix.
    pub fn url_for_path(&self, path: &str) -> String {
        join_prefixed(&self.context.base.current_base_prefix(), path)
    }

    pub fn navigate_to(&self, route: &AppRoute) -> JoinHandle<NavigationReport> {
        self.navigate(&route.path())
    }

    /// Fire-and-forget navigation. The returned handle only reports what
    /// happened; dropping it does not cancel the verification.
    pub fn navigate(&self, canonical_path: &str) -> JoinHandle<NavigationReport> {
        let target = normalize_path(canonical_path);
        let prefixed = self.url_for_path(&target);
        let mut attempt = NavigationAttempt::new(target, prefixed);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(
            "Navigating to {} (url: {})",
            attempt.target_path,
            attempt.prefixed_url
        );

        if let Err(e) = self.context.router.go(&attempt.prefixed_url) {
            tracing::warn!(
                "Soft navigation to {} failed ({}), reloading",
                attempt.prefixed_url,
                e
            );
            self.context.location.assign(&attempt.prefixed_url);
            return tokio::spawn(async move {
                NavigationReport {
                    attempt,
                    outcome: NavigationOutcome::HardAfterRouterError,
                }
            });
        }

        let location = Arc::clone(&self.context.location);
        let latest = Arc::clone(&self.generation);
        let delay = self.config.verify_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if location_shows(location.as_ref(), &attempt.target_path) {
                attempt.verified = true;
                return NavigationReport {
                    attempt,
                    outcome: NavigationOutcome::Soft,
                };
            }

            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!(
                    "Navigation to {} superseded before verification",
                    attempt.target_path
                );
                attempt.verified = true;
                return NavigationReport {
                    attempt,
                    outcome: NavigationOutcome::Superseded,
                };
            }

            tracing::warn!(
                "Location still at {} after soft navigation, forcing {}",
                location.pathname(),
                attempt.prefixed_url
            );
            location.assign(&attempt.prefixed_url);
            NavigationReport {
                attempt,
                outcome: NavigationOutcome::HardAfterUnverified,
            }
        })
    }
}

fn location_shows(location: &dyn BrowserLocation, target_path: &str) -> bool {
    let current = location.pathname();
    current.ends_with(target_path) || current.ends_with(&format!("{target_path}/"))
}
