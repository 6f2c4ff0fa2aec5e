use tokio::sync::mpsc;
use whereisit_api::FrameSink;

#[derive(Debug)]
pub(crate) enum FrameEvent {
    Decoded(String),
}

/// Forwards decoder callbacks onto the session's event loop.
pub(crate) struct ChannelFrameSink {
    tx: mpsc::UnboundedSender<FrameEvent>,
}

impl ChannelFrameSink {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<FrameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FrameSink for ChannelFrameSink {
    fn decoded(&self, text: String) {
        // Receiver gone means the session already settled.
        let _ = self.tx.send(FrameEvent::Decoded(text));
    }

    fn missed(&self, reason: &str) {
        tracing::trace!("No code in frame: {}", reason);
    }
}
