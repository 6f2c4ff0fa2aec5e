use std::sync::{Arc, Mutex, PoisonError};
use whereisit_api::{DocumentLookup, LookupError, OverrideToken, SurfaceHandle};

/// Scoped ownership of a lookup override: restored exactly once, on drop.
pub struct LookupOverrideGuard {
    lookup: Arc<dyn DocumentLookup>,
    token: Option<OverrideToken>,
}

impl LookupOverrideGuard {
    pub fn install(
        lookup: Arc<dyn DocumentLookup>,
        element_id: &str,
        surface: SurfaceHandle,
    ) -> Result<Self, LookupError> {
        let token = lookup.install_override(element_id, surface)?;
        tracing::debug!("Lookup override {} installed for '{}'", token.id(), element_id);
        Ok(Self {
            lookup,
            token: Some(token),
        })
    }
}

impl Drop for LookupOverrideGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            tracing::debug!(
                "Lookup override {} restored for '{}'",
                token.id(),
                token.element_id()
            );
            self.lookup.restore(token);
        }
    }
}

#[derive(Default)]
struct LookupState {
    /// Elements reachable through the flat namespace, in document order.
    elements: Vec<SurfaceHandle>,
    active: Option<(OverrideToken, SurfaceHandle)>,
    next_token: u64,
}

/// In-process model of a flat, id-keyed element lookup.
///
/// Without an override, `get_element_by_id` returns the first registered
/// element with that id. At most one override may be live at a time.
#[derive(Default)]
pub struct ScopedLookupTable {
    state: Mutex<LookupState>,
}

impl ScopedLookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, surface: SurfaceHandle) {
        self.lock().elements.push(surface);
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<SurfaceHandle> {
        let state = self.lock();
        if let Some((token, surface)) = &state.active {
            if token.element_id() == element_id {
                return Some(surface.clone());
            }
        }
        state
            .elements
            .iter()
            .find(|s| s.element_id() == element_id)
            .cloned()
    }

    pub fn is_overridden(&self) -> bool {
        self.lock().active.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LookupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentLookup for ScopedLookupTable {
    fn install_override(
        &self,
        element_id: &str,
        surface: SurfaceHandle,
    ) -> Result<OverrideToken, LookupError> {
        let mut state = self.lock();
        if let Some((active, _)) = &state.active {
            return Err(LookupError::AlreadyInstalled(active.element_id().to_string()));
        }
        state.next_token += 1;
        let id = state.next_token;
        state.active = Some((OverrideToken::new(id, element_id), surface));
        Ok(OverrideToken::new(id, element_id))
    }

    fn restore(&self, token: OverrideToken) {
        let mut state = self.lock();
        let matches = state
            .active
            .as_ref()
            .is_some_and(|(active, _)| active.id() == token.id());
        if matches {
            state.active = None;
        } else {
            tracing::warn!("Ignoring stale lookup override token {}", token.id());
        }
    }
}
