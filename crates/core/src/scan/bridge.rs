use super::controller::ScanController;
use crate::navigation::NavigationDispatcher;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Forward every `scan-resolved` signal to the dispatcher.
///
/// The task ends once every clone of `controller` has been dropped.
pub fn forward_scans(
    controller: &ScanController,
    dispatcher: NavigationDispatcher,
) -> JoinHandle<()> {
    let mut signals = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                Ok(event) => {
                    tracing::info!("Navigating to scanned path: {}", event.path);
                    drop(dispatcher.navigate(&event.path));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Scan bridge lagged, skipped {} signals", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
