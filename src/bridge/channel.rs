use tokio::sync::mpsc;
use url::Origin;

use crate::error::AppResult;
use crate::snapshot::{FinalSnapshot, Viewport};

use super::protocol::{BridgeMessage, CorrelationId, decode_frame, encode_frame};
use super::registry::{PendingCapture, PendingRequests};

struct ContextLink {
    origin: String,
    tx: mpsc::UnboundedSender<String>,
}

/// Context-side ends of one link.
#[derive(Debug)]
pub struct ContextEndpoint {
    pub requests: mpsc::UnboundedReceiver<String>,
    pub responses: mpsc::UnboundedSender<String>,
}

/// A response matched to the request that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCapture {
    pub correlation_id: CorrelationId,
    pub origin: String,
    pub capture: PendingCapture,
    pub snapshot: FinalSnapshot,
}

/// Primary side of the bridge: fans requests out to every attached context
/// and matches responses against the pending registry.
pub struct BridgeChannel {
    links: Vec<ContextLink>,
    pending: PendingRequests,
    responses_tx: mpsc::UnboundedSender<String>,
}

impl BridgeChannel {
    /// Creates the channel and the receiver that yields response frames.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        (
            Self {
                links: Vec::new(),
                pending: PendingRequests::new(),
                responses_tx,
            },
            responses_rx,
        )
    }

    pub fn attach(&mut self, origin: &Origin) -> ContextEndpoint {
        let (tx, requests) = mpsc::unbounded_channel();
        let origin = origin.ascii_serialization();
        tracing::debug!("Attached isolated context for {}", origin);
        self.links.push(ContextLink { origin, tx });
        ContextEndpoint {
            requests,
            responses: self.responses_tx.clone(),
        }
    }

    #[must_use]
    pub fn context_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub const fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Sends one frame to every live context and drops closed links.
    fn broadcast(&mut self, message: &BridgeMessage) -> AppResult<usize> {
        let frame = encode_frame(message)?;
        self.links.retain(|link| {
            let delivered = link.tx.send(frame.clone()).is_ok();
            if !delivered {
                tracing::debug!("Dropping closed context for {}", link.origin);
            }
            delivered
        });
        Ok(self.links.len())
    }

    /// Registers a pending capture, then asks every context for the final
    /// snapshot of `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request frame cannot be encoded.
    pub fn request_final_snapshot(
        &mut self,
        url: Option<String>,
        viewport: Viewport,
    ) -> AppResult<CorrelationId> {
        let correlation_id = self.pending.register(PendingCapture {
            url: url.clone(),
            viewport,
        });
        let message = BridgeMessage::GenerateFinalSnapshot {
            correlation_id,
            url,
        };
        match self.broadcast(&message) {
            Ok(delivered) => {
                tracing::debug!(
                    "Requested final snapshot {} from {} contexts",
                    correlation_id,
                    delivered
                );
                Ok(correlation_id)
            }
            Err(err) => {
                drop(self.pending.resolve(correlation_id));
                Err(err)
            }
        }
    }

    /// Matches a response frame to its pending request.
    ///
    /// Malformed frames, unknown ids and repeated answers yield `None`.
    pub fn accept_frame(&mut self, frame: &str) -> Option<ResolvedCapture> {
        let message = match decode_frame(frame) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!("Dropping bridge frame: {}", err);
                return None;
            }
        };
        match message {
            BridgeMessage::FinalSnapshotGenerated {
                correlation_id,
                origin,
                snapshot,
            } => {
                let Some(capture) = self.pending.resolve(correlation_id) else {
                    tracing::debug!(
                        "Ignoring final snapshot {} from {}: not pending",
                        correlation_id,
                        origin
                    );
                    return None;
                };
                Some(ResolvedCapture {
                    correlation_id,
                    origin,
                    capture,
                    snapshot,
                })
            }
            BridgeMessage::GenerateFinalSnapshot { correlation_id, .. } => {
                tracing::debug!("Ignoring echoed request {}", correlation_id);
                None
            }
        }
    }

    /// Forgets every outstanding request.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
