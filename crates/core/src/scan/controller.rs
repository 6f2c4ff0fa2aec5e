use super::session::ScanSession;
use crate::config::ScanConfig;
use crate::resolver::RouteResolver;
use std::sync::Arc;
use tokio::sync::broadcast;
use whereisit_api::{
    DecoderBackend, DocumentLookup, ScanError, ScanHost, ScanOutcome, ScanResolved,
    ScanSessionState, SCAN_RESOLVED_EVENT,
};

const SIGNAL_CAPACITY: usize = 16;

/// The scan UI instance: owns one session, resolves what it decodes and
/// raises `scan-resolved` for whoever listens.
#[derive(Clone)]
pub struct ScanController {
    host: Arc<dyn ScanHost>,
    session: ScanSession,
    resolver: RouteResolver,
    signal: broadcast::Sender<ScanResolved>,
}

impl ScanController {
    pub fn new(
        host: Arc<dyn ScanHost>,
        decoder: Arc<dyn DecoderBackend>,
        lookup: Arc<dyn DocumentLookup>,
        resolver: RouteResolver,
        config: ScanConfig,
    ) -> Self {
        let session = ScanSession::new(decoder, Arc::clone(&host), lookup, config);
        let (signal, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            host,
            session,
            resolver,
            signal,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanResolved> {
        self.signal.subscribe()
    }

    pub fn state(&self) -> ScanSessionState {
        self.session.state()
    }

    /// Open the scan UI and run one session to completion.
    ///
    /// Resolves to the route that was signalled, or `None` when the session
    /// was cancelled, failed, or decoded nothing usable.
    pub async fn show(&self) -> Result<Option<ScanResolved>, ScanError> {
        let host = Arc::clone(&self.host);
        let ticket = self.session.start_with(move || host.open()).await?;

        match ticket.outcome().await {
            ScanOutcome::Decoded(payload) => {
                let Some(route) = self.resolver.resolve(payload.as_str()) else {
                    tracing::debug!("Decoded payload did not resolve to a route");
                    return Ok(None);
                };
                let event = ScanResolved::from(route);
                tracing::info!("Dispatching {} for {}", SCAN_RESOLVED_EVENT, event.path);
                if self.signal.send(event.clone()).is_err() {
                    tracing::debug!("No listener for {}", SCAN_RESOLVED_EVENT);
                }
                Ok(Some(event))
            }
            ScanOutcome::Cancelled => Ok(None),
            ScanOutcome::Failed(failure) => {
                tracing::debug!("Scan failed at {:?}: {}", failure.stage, failure.reason);
                Ok(None)
            }
        }
    }

    /// The scan UI was dismissed.
    pub async fn dismiss(&self) {
        self.session.stop().await;
        self.host.close();
    }
}
