use std::sync::Arc;
use tokio::task::JoinHandle;
use whereisit_api::{
    BrowserLocation, DecoderBackend, DocumentLookup, HostDocument, ScanHost, SoftRouter,
};
use whereisit_core::EngineConfig;
use whereisit_core::error::{Result, WhereIsItError};
use whereisit_core::navigation::{
    BasePathResolver, BootDecision, NavigationContext, NavigationDispatcher,
    guard_physical_location,
};
use whereisit_core::resolver::RouteResolver;
use whereisit_core::scan::{ScanController, forward_scans};

/// Host-side implementations of every external interface the scan
/// subsystem consumes.
#[derive(Clone)]
pub struct HostAdapters {
    pub document: Arc<dyn HostDocument>,
    pub location: Arc<dyn BrowserLocation>,
    pub router: Arc<dyn SoftRouter>,
    pub scan_host: Arc<dyn ScanHost>,
    pub decoder: Arc<dyn DecoderBackend>,
    pub lookup: Arc<dyn DocumentLookup>,
}

/// The assembled scan-to-navigation stack.
pub struct AppShell {
    pub dispatcher: NavigationDispatcher,
    pub scanner: ScanController,
    bridge: JoinHandle<()>,
}

impl AppShell {
    /// Drop the scanner and wait for the bridge to drain.
    pub async fn shutdown(self) -> Result<()> {
        let AppShell { scanner, bridge, .. } = self;
        drop(scanner);
        bridge
            .await
            .map_err(|e| WhereIsItError::Internal(e.to_string()))
    }
}

pub enum Boot {
    Ready(AppShell),
    /// The physical URL was dirty and the document is being reloaded.
    Redirected { url: String },
}

/// Bootstraps the scan-to-navigation stack from host adapters.
///
/// Must run inside a tokio runtime: the scan bridge is spawned here.
pub fn bootstrap(adapters: HostAdapters, config: EngineConfig) -> Boot {
    if let BootDecision::Redirected { url } = guard_physical_location(adapters.location.as_ref()) {
        return Boot::Redirected { url };
    }

    let context = NavigationContext {
        base: BasePathResolver::new(Arc::clone(&adapters.document)),
        router: adapters.router,
        location: adapters.location,
    };
    tracing::info!(
        "Router base URL (from base reference): {}",
        context.base.current_base_prefix()
    );
    let dispatcher = NavigationDispatcher::new(context, config.navigation);

    let resolver = RouteResolver::for_document(&adapters.document.document_url());
    let scanner = ScanController::new(
        adapters.scan_host,
        adapters.decoder,
        adapters.lookup,
        resolver,
        config.scan,
    );
    let bridge = forward_scans(&scanner, dispatcher.clone());

    Boot::Ready(AppShell {
        dispatcher,
        scanner,
        bridge,
    })
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str) -> Option<impl Drop> {
    Some(whereisit_core::logging::init_logging(component, false))
}
