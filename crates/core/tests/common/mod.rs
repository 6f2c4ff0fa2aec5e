#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use whereisit_api::{
    BrowserLocation, CameraConstraints, DecoderBackend, DecoderError, DecoderTarget,
    DocumentLookup, FrameSink, HostDocument, LayoutSignal, LookupError, OverrideToken,
    RouterError, ScanHost, ScanSessionState, SoftRouter, SurfaceHandle,
};
use whereisit_core::config::NavigationConfig;
use whereisit_core::navigation::{BasePathResolver, NavigationContext, NavigationDispatcher};
use whereisit_core::scan::ScopedLookupTable;

pub const READER: &str = "reader";

// ---------------------------------------------------------------- decoder

#[derive(Default)]
pub struct TestDecoder {
    injectable: bool,
    fail_start: Option<String>,
    gate: Option<Arc<Notify>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    clears: AtomicUsize,
    targets: Mutex<Vec<DecoderTarget>>,
    sink: Mutex<Option<Arc<dyn FrameSink>>>,
}

impl TestDecoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn injectable() -> Arc<Self> {
        Arc::new(Self {
            injectable: true,
            ..Self::default()
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_start: Some(reason.to_string()),
            ..Self::default()
        })
    }

    /// `start` blocks until [`release`](Self::release), like a pending
    /// camera permission prompt.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Simulate a successful frame decode.
    pub fn emit(&self, text: &str) {
        let sink = self.sink.lock().expect("lock poisoned").clone();
        if let Some(sink) = sink {
            sink.decoded(text.to_string());
        }
    }

    /// Simulate a frame without a code.
    pub fn miss(&self) {
        let sink = self.sink.lock().expect("lock poisoned").clone();
        if let Some(sink) = sink {
            sink.missed("No MultiFormat Readers were able to detect the code");
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<DecoderTarget> {
        self.targets.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl DecoderBackend for TestDecoder {
    fn accepts_injected_surface(&self) -> bool {
        self.injectable
    }

    async fn start(
        &self,
        target: DecoderTarget,
        _constraints: &CameraConstraints,
        frames: Arc<dyn FrameSink>,
    ) -> Result<(), DecoderError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().expect("lock poisoned").push(target);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(reason) = &self.fail_start {
            return Err(DecoderError::PermissionDenied(reason.clone()));
        }
        *self.sink.lock().expect("lock poisoned") = Some(frames);
        Ok(())
    }

    async fn stop(&self) -> Result<(), DecoderError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.sink.lock().expect("lock poisoned").take();
    }
}

// ---------------------------------------------------------------- host

pub struct TestHost {
    surface: Option<SurfaceHandle>,
    layout: LayoutSignal,
    opens: AtomicUsize,
    closes: AtomicUsize,
}

impl TestHost {
    pub fn with_surface() -> Arc<Self> {
        Arc::new(Self {
            surface: Some(SurfaceHandle::new(READER, 42)),
            layout: LayoutSignal::Unsupported,
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn without_surface() -> Arc<Self> {
        Arc::new(Self {
            surface: None,
            layout: LayoutSignal::Unsupported,
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn with_layout_signal() -> Arc<Self> {
        Arc::new(Self {
            surface: Some(SurfaceHandle::new(READER, 42)),
            layout: LayoutSignal::Settled,
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanHost for TestHost {
    fn open(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn find_surface(&self, element_id: &str) -> Option<SurfaceHandle> {
        self.surface
            .clone()
            .filter(|s| s.element_id() == element_id)
    }

    async fn layout_settled(&self) -> LayoutSignal {
        self.layout
    }
}

// ---------------------------------------------------------------- lookup

/// Flat lookup with a global `#reader` that is *not* the scan surface.
pub struct CountingLookup {
    pub table: ScopedLookupTable,
    installs: AtomicUsize,
    restores: AtomicUsize,
}

impl CountingLookup {
    pub fn new() -> Arc<Self> {
        let table = ScopedLookupTable::new();
        table.register(SurfaceHandle::new(READER, 1));
        Arc::new(Self {
            table,
            installs: AtomicUsize::new(0),
            restores: AtomicUsize::new(0),
        })
    }

    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

impl DocumentLookup for CountingLookup {
    fn install_override(
        &self,
        element_id: &str,
        surface: SurfaceHandle,
    ) -> Result<OverrideToken, LookupError> {
        let token = self.table.install_override(element_id, surface)?;
        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(token)
    }

    fn restore(&self, token: OverrideToken) {
        self.restores.fetch_add(1, Ordering::SeqCst);
        self.table.restore(token);
    }
}

// ---------------------------------------------------------------- navigation

pub struct TestDocument {
    base: Mutex<Option<String>>,
    url: String,
}

impl TestDocument {
    pub fn new(base: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            base: Mutex::new(base.map(str::to_string)),
            url: "https://ha.local/addon/whereisit/".to_string(),
        })
    }

    pub fn set_base(&self, base: &str) {
        *self.base.lock().expect("lock poisoned") = Some(base.to_string());
    }
}

impl HostDocument for TestDocument {
    fn base_href(&self) -> Option<String> {
        self.base.lock().expect("lock poisoned").clone()
    }

    fn document_url(&self) -> String {
        self.url.clone()
    }
}

pub struct TestLocation {
    path: Mutex<String>,
    assigned: Mutex<Vec<String>>,
}

impl TestLocation {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: Mutex::new(path.to_string()),
            assigned: Mutex::new(Vec::new()),
        })
    }

    pub fn set_path(&self, path: &str) {
        *self.path.lock().expect("lock poisoned") = path.to_string();
    }

    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().expect("lock poisoned").clone()
    }
}

impl BrowserLocation for TestLocation {
    fn pathname(&self) -> String {
        self.path.lock().expect("lock poisoned").clone()
    }

    fn href(&self) -> String {
        format!("https://ha.local{}", self.pathname())
    }

    fn assign(&self, url: &str) {
        self.assigned
            .lock()
            .expect("lock poisoned")
            .push(url.to_string());
        self.set_path(url);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RouterBehavior {
    /// Updates the visible location.
    Moves,
    /// Accepts the call but leaves the location alone.
    Swallows,
    /// Raises.
    Fails,
}

pub struct TestRouter {
    behavior: RouterBehavior,
    location: Arc<TestLocation>,
    calls: Mutex<Vec<String>>,
}

impl TestRouter {
    pub fn new(behavior: RouterBehavior, location: Arc<TestLocation>) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            location,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

impl SoftRouter for TestRouter {
    fn go(&self, url: &str) -> Result<(), RouterError> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(url.to_string());
        match self.behavior {
            RouterBehavior::Moves => {
                self.location.set_path(url);
                Ok(())
            }
            RouterBehavior::Swallows => Ok(()),
            RouterBehavior::Fails => Err(RouterError::Rejected {
                url: url.to_string(),
                reason: "outlet not attached".to_string(),
            }),
        }
    }
}

pub struct NavigationFixture {
    pub document: Arc<TestDocument>,
    pub location: Arc<TestLocation>,
    pub router: Arc<TestRouter>,
    pub dispatcher: NavigationDispatcher,
}

pub fn navigation_fixture(base: Option<&str>, behavior: RouterBehavior) -> NavigationFixture {
    let document = TestDocument::new(base);
    let location = TestLocation::at(base.unwrap_or("/"));
    let router = TestRouter::new(behavior, location.clone());
    let dispatcher = NavigationDispatcher::new(
        NavigationContext {
            base: BasePathResolver::new(document.clone()),
            router: router.clone(),
            location: location.clone(),
        },
        NavigationConfig::default(),
    );
    NavigationFixture {
        document,
        location,
        router,
        dispatcher,
    }
}

/// Poll `state` on the (paused) clock until it reports `want`.
pub async fn wait_for_state<F>(state: F, want: ScanSessionState)
where
    F: Fn() -> ScanSessionState,
{
    for _ in 0..200 {
        if state() == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never reached {want:?}, stuck at {:?}", state());
}
