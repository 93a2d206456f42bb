use crate::bridge::{BridgeChannel, CorrelationId};
use crate::dom::DomHost;
use crate::snapshot::{OriginalState, Viewport};

/// Progress of the per-run original-state capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    NoState,
    PendingBridge(CorrelationId),
    Captured(OriginalState),
}

/// Produces the state to restore once previewing stops, either from the
/// local page or from the isolated context that owns it.
#[derive(Debug)]
pub(crate) struct CaptureResolver {
    state: CaptureState,
}

impl CaptureResolver {
    pub(crate) const fn new() -> Self {
        Self {
            state: CaptureState::NoState,
        }
    }

    pub(crate) const fn state(&self) -> &CaptureState {
        &self.state
    }

    pub(crate) const fn original(&self) -> Option<&OriginalState> {
        match &self.state {
            CaptureState::Captured(original) => Some(original),
            CaptureState::NoState | CaptureState::PendingBridge(_) => None,
        }
    }

    /// Starts a capture unless one is already stored or in flight.
    pub(crate) fn ensure_captured<H: DomHost>(
        &mut self,
        host: &mut H,
        bridge: &mut BridgeChannel,
        url: Option<&str>,
        viewport: Viewport,
    ) {
        if !matches!(self.state, CaptureState::NoState) {
            return;
        }

        if !host.is_aut_same_origin() {
            match bridge.request_final_snapshot(url.map(str::to_owned), viewport) {
                Ok(correlation_id) => {
                    tracing::debug!(
                        "Page is cross-origin; waiting for final snapshot {}",
                        correlation_id
                    );
                    self.state = CaptureState::PendingBridge(correlation_id);
                }
                Err(err) => {
                    tracing::warn!("Failed to request final snapshot: {}", err);
                }
            }
            return;
        }

        let Some(snapshot) = host.detach_dom() else {
            tracing::debug!("No live document to capture");
            return;
        };
        self.state = CaptureState::Captured(OriginalState::new(
            snapshot,
            url.map(str::to_owned),
            viewport,
        ));
    }

    /// Feeds a bridge response frame. Returns whether it completed the
    /// pending capture.
    pub(crate) fn accept_frame(&mut self, bridge: &mut BridgeChannel, frame: &str) -> bool {
        let Some(resolved) = bridge.accept_frame(frame) else {
            return false;
        };
        if self.state != CaptureState::PendingBridge(resolved.correlation_id) {
            tracing::debug!(
                "Final snapshot {} arrived after its capture was abandoned",
                resolved.correlation_id
            );
            return false;
        }
        tracing::debug!(
            "Stored final snapshot {} from {}",
            resolved.correlation_id,
            resolved.origin
        );
        // The reported dimensions describe the context's own frame; the
        // primary restores the url and viewport it had when it asked.
        self.state = CaptureState::Captured(OriginalState::new(
            resolved.snapshot.into_snapshot(),
            resolved.capture.url,
            resolved.capture.viewport,
        ));
        true
    }

    /// Hands out the stored state and starts over.
    pub(crate) fn take(&mut self) -> Option<OriginalState> {
        match std::mem::replace(&mut self.state, CaptureState::NoState) {
            CaptureState::Captured(original) => Some(original),
            pending @ CaptureState::PendingBridge(_) => {
                self.state = pending;
                None
            }
            CaptureState::NoState => None,
        }
    }

    pub(crate) fn reset(&mut self, bridge: &mut BridgeChannel) {
        self.state = CaptureState::NoState;
        bridge.reset();
    }
}
