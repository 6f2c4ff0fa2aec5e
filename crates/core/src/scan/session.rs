//! Camera decode session.
//!
//! One session is one camera-acquire-to-release lifecycle:
//!
//! ```text
//! Idle -> Starting -> Scanning -> Stopping -> Stopped
//!            |                        ^
//!            +-> Failed (same cleanup)+
//! ```
//!
//! Every transition out of `Scanning` happens under the session lock, so a
//! decode racing an explicit stop is settled by whichever handler takes the
//! lock first; the other sees `Stopping` and does nothing.

use super::frames::{ChannelFrameSink, FrameEvent};
use super::lookup::LookupOverrideGuard;
use crate::config::ScanConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use whereisit_api::{
    DecodedPayload, DecoderBackend, DecoderTarget, DocumentLookup, LayoutSignal, ScanError,
    ScanFailure, ScanHost, ScanOutcome, ScanSessionState, SurfaceHandle,
};

/// Single-consumer handle on a session's terminal outcome.
pub struct ScanTicket {
    outcome: oneshot::Receiver<ScanOutcome>,
}

impl ScanTicket {
    pub async fn outcome(self) -> ScanOutcome {
        // A dropped sender means the session itself went away.
        self.outcome.await.unwrap_or(ScanOutcome::Cancelled)
    }
}

/// Resources acquired while starting; released together in `teardown`.
#[derive(Default)]
struct Acquired {
    binding: Option<LookupOverrideGuard>,
    camera_requested: bool,
}

struct SessionCore {
    state: ScanSessionState,
    acquired: Option<Acquired>,
    settle: Option<oneshot::Sender<ScanOutcome>>,
    frames_cancel: Option<CancellationToken>,
}

struct SessionShared {
    decoder: Arc<dyn DecoderBackend>,
    host: Arc<dyn ScanHost>,
    lookup: Arc<dyn DocumentLookup>,
    config: ScanConfig,
    core: Mutex<SessionCore>,
}

impl Drop for SessionShared {
    fn drop(&mut self) {
        let core = self.core.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut acquired) = core.acquired.take() {
            drop(acquired.binding.take());
            if acquired.camera_requested {
                tracing::warn!("Scan session dropped while holding the camera, clearing decoder");
                self.decoder.clear();
            }
        }
    }
}

enum StopAction {
    Teardown,
    Deferred,
    Nothing,
}

#[derive(Clone)]
pub struct ScanSession {
    shared: Arc<SessionShared>,
}

impl ScanSession {
    pub fn new(
        decoder: Arc<dyn DecoderBackend>,
        host: Arc<dyn ScanHost>,
        lookup: Arc<dyn DocumentLookup>,
        config: ScanConfig,
    ) -> Self {
        Self {
            shared: Arc::new(SessionShared {
                decoder,
                host,
                lookup,
                config,
                core: Mutex::new(SessionCore {
                    state: ScanSessionState::Idle,
                    acquired: None,
                    settle: None,
                    frames_cancel: None,
                }),
            }),
        }
    }

    pub fn state(&self) -> ScanSessionState {
        self.lock().state
    }

    /// Start a decode session.
    ///
    /// Returns once the session is `Scanning` or has already settled
    /// (start failure, cancellation during start). Rejected while another
    /// session on this instance is active.
    pub async fn start(&self) -> Result<ScanTicket, ScanError> {
        self.start_with(|| {}).await
    }

    /// Like [`start`](Self::start), running `on_claimed` once the session
    /// has been claimed and before startup begins. A rejected start never
    /// runs it.
    ///
    /// Startup runs on its own task, so dropping the returned future does
    /// not abandon a half-started session: it still reaches `Scanning` or
    /// settles, and `stop` still tears it down.
    pub async fn start_with<F>(&self, on_claimed: F) -> Result<ScanTicket, ScanError>
    where
        F: FnOnce(),
    {
        let outcome = {
            let mut core = self.lock();
            if core.state.is_active() {
                tracing::warn!("Scan start rejected, session is {:?}", core.state);
                return Err(ScanError::AlreadyActive(core.state));
            }
            let (tx, rx) = oneshot::channel();
            core.state = ScanSessionState::Starting;
            core.acquired = Some(Acquired::default());
            core.settle = Some(tx);
            rx
        };
        on_claimed();

        let (ready_tx, ready_rx) = oneshot::channel();
        let session = self.clone();
        tokio::spawn(async move {
            session.run_startup().await;
            let _ = ready_tx.send(());
        });
        if ready_rx.await.is_err() {
            tracing::error!("Scan startup task ended without reporting");
        }
        Ok(ScanTicket { outcome })
    }

    /// Cancel the session. Camera release and lookup restoration have
    /// completed when this returns, unless the session is still starting,
    /// in which case the startup path finishes the teardown.
    pub async fn stop(&self) {
        let action = {
            let mut core = self.lock();
            match core.state {
                ScanSessionState::Scanning => {
                    core.state = ScanSessionState::Stopping;
                    StopAction::Teardown
                }
                ScanSessionState::Starting => {
                    core.state = ScanSessionState::Stopping;
                    StopAction::Deferred
                }
                _ => StopAction::Nothing,
            }
        };

        match action {
            StopAction::Teardown => {
                tracing::info!("Scan cancelled");
                self.teardown(ScanOutcome::Cancelled).await;
            }
            StopAction::Deferred => tracing::info!("Scan cancelled while starting"),
            StopAction::Nothing => {}
        }
    }

    async fn run_startup(&self) {
        let config = &self.shared.config;

        if self.shared.host.layout_settled().await == LayoutSignal::Unsupported {
            tokio::time::sleep(config.settle_delay()).await;
        }
        if self.cancelled_during_start() {
            self.teardown(ScanOutcome::Cancelled).await;
            return;
        }

        let element_id = config.reader_element_id.as_str();
        let Some(surface) = self.shared.host.find_surface(element_id) else {
            tracing::error!("Scan surface '{}' not found in host", element_id);
            let reason = ScanError::SurfaceUnavailable(element_id.into()).to_string();
            self.fail(ScanFailure::bind(reason)).await;
            return;
        };

        let target = match self.bind(element_id, surface) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!("Cannot bind scan surface: {}", e);
                self.fail(ScanFailure::bind(e.to_string())).await;
                return;
            }
        };

        let (sink, frames) = ChannelFrameSink::channel();
        self.mark_camera_requested();
        if let Err(e) = self
            .shared
            .decoder
            .start(target, &config.camera, Arc::new(sink))
            .await
        {
            let e = ScanError::from(e);
            tracing::error!("Scanner start error: {}", e);
            self.fail(ScanFailure::start(e.to_string())).await;
            return;
        }

        let cancel = CancellationToken::new();
        let scanning = {
            let mut core = self.lock();
            if core.state == ScanSessionState::Starting {
                core.state = ScanSessionState::Scanning;
                core.frames_cancel = Some(cancel.clone());
                true
            } else {
                false
            }
        };
        if !scanning {
            self.teardown(ScanOutcome::Cancelled).await;
            return;
        }

        tracing::info!("Scanner started on '{}'", element_id);
        let session = self.clone();
        tokio::spawn(async move { session.pump_frames(frames, cancel).await });
    }

    /// Prefer handing the surface to the decoder; override the flat lookup
    /// only when the decoder cannot take it.
    fn bind(&self, element_id: &str, surface: SurfaceHandle) -> Result<DecoderTarget, ScanError> {
        if self.shared.decoder.accepts_injected_surface() {
            return Ok(DecoderTarget::Surface(surface));
        }

        let lookup = Arc::clone(&self.shared.lookup);
        let guard = LookupOverrideGuard::install(lookup, element_id, surface)?;
        let mut core = self.lock();
        match core.acquired.as_mut() {
            Some(acquired) => acquired.binding = Some(guard),
            // Already torn down; the guard restores on drop.
            None => return Err(ScanError::SurfaceUnavailable(element_id.to_string())),
        }
        Ok(DecoderTarget::ElementId(element_id.to_string()))
    }

    async fn pump_frames(
        self,
        mut frames: mpsc::UnboundedReceiver<FrameEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = frames.recv() => match event {
                    Some(FrameEvent::Decoded(text)) => {
                        self.on_decoded(text).await;
                        break;
                    }
                    None => break,
                },
            }
        }
    }

    async fn on_decoded(&self, text: String) {
        let won = {
            let mut core = self.lock();
            if core.state == ScanSessionState::Scanning {
                core.state = ScanSessionState::Stopping;
                true
            } else {
                false
            }
        };
        if !won {
            tracing::debug!("Ignoring decode after session left Scanning");
            return;
        }

        tracing::info!("Scanned: {:?}", text);
        self.teardown(ScanOutcome::Decoded(DecodedPayload::from(text)))
            .await;
    }

    async fn fail(&self, failure: ScanFailure) {
        self.lock().state = ScanSessionState::Stopping;
        self.teardown(ScanOutcome::Failed(failure)).await;
    }

    /// Release everything acquired and settle the outcome. Each resource is
    /// taken under the lock, so it is released at most once.
    async fn teardown(&self, outcome: ScanOutcome) {
        let (acquired, settle, frames_cancel) = {
            let mut core = self.lock();
            (
                core.acquired.take(),
                core.settle.take(),
                core.frames_cancel.take(),
            )
        };

        if let Some(cancel) = frames_cancel {
            cancel.cancel();
        }

        if let Some(mut acquired) = acquired {
            drop(acquired.binding.take());
            if acquired.camera_requested {
                if let Err(e) = self.shared.decoder.stop().await {
                    tracing::warn!("Scanner stop error: {}", e);
                }
                self.shared.decoder.clear();
            }
        }

        let failed = matches!(outcome, ScanOutcome::Failed(_));
        self.lock().state = if failed {
            ScanSessionState::Failed
        } else {
            ScanSessionState::Stopped
        };

        if !matches!(outcome, ScanOutcome::Cancelled) {
            self.shared.host.close();
        }
        if let Some(tx) = settle {
            let _ = tx.send(outcome);
        }
    }

    fn cancelled_during_start(&self) -> bool {
        self.lock().state != ScanSessionState::Starting
    }

    fn mark_camera_requested(&self) {
        if let Some(acquired) = self.lock().acquired.as_mut() {
            acquired.camera_requested = true;
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.shared.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
