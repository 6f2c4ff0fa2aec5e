use std::time::Instant;

/// Bookkeeping for one `navigate` call; only used to choose soft vs hard.
#[derive(Debug, Clone)]
pub struct NavigationAttempt {
    pub target_path: String,
    pub prefixed_url: String,
    pub started_at: Instant,
    pub verified: bool,
}

impl NavigationAttempt {
    pub fn new(target_path: String, prefixed_url: String) -> Self {
        Self {
            target_path,
            prefixed_url,
            started_at: Instant::now(),
            verified: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationOutcome {
    /// The in-process router moved the visible location.
    Soft,
    /// A later navigation took over before this one was checked.
    Superseded,
    /// The router swallowed the request; the document was reloaded.
    HardAfterUnverified,
    /// The router raised; the document was reloaded without verifying.
    HardAfterRouterError,
}

impl NavigationOutcome {
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::HardAfterUnverified | NavigationOutcome::HardAfterRouterError
        )
    }
}

#[derive(Debug, Clone)]
pub struct NavigationReport {
    pub attempt: NavigationAttempt,
    pub outcome: NavigationOutcome,
}
