use url::Origin;

use crate::dom::{DomHost, same_origin};
use crate::error::AppResult;
use crate::shutdown::ShutdownReceiver;
use crate::snapshot::{FinalSnapshot, Viewport};

use super::channel::ContextEndpoint;
use super::protocol::{BridgeMessage, decode_frame, encode_frame};

/// Isolated context bound to one origin. It only answers requests whose URL
/// belongs to that origin.
pub struct SpecBridge<H: DomHost> {
    origin: Origin,
    host: H,
    viewport: Viewport,
}

impl<H: DomHost> SpecBridge<H> {
    pub const fn new(origin: Origin, host: H, viewport: Viewport) -> Self {
        Self {
            origin,
            host,
            viewport,
        }
    }

    /// Handles one request frame and returns the response frame, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be decoded or the response
    /// cannot be encoded.
    pub fn handle_frame(&mut self, frame: &str) -> AppResult<Option<String>> {
        match decode_frame(frame)? {
            BridgeMessage::GenerateFinalSnapshot {
                correlation_id,
                url,
            } => {
                let Some(url) = url.filter(|url| same_origin(&self.origin, url)) else {
                    return Ok(None);
                };
                let Some(snapshot) = self.host.detach_dom() else {
                    tracing::debug!(
                        "No document to capture for {} in {}",
                        url,
                        self.origin.ascii_serialization()
                    );
                    return Ok(None);
                };
                let response = BridgeMessage::FinalSnapshotGenerated {
                    correlation_id,
                    origin: self.origin.ascii_serialization(),
                    snapshot: FinalSnapshot::from_snapshot(&snapshot, self.viewport),
                };
                encode_frame(&response).map(Some)
            }
            BridgeMessage::FinalSnapshotGenerated { .. } => Ok(None),
        }
    }

    pub async fn serve(mut self, mut endpoint: ContextEndpoint, mut shutdown_rx: ShutdownReceiver) {
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                frame = endpoint.requests.recv() => {
                    let Some(frame) = frame else {
                        break;
                    };
                    match self.handle_frame(&frame) {
                        Ok(Some(response)) => {
                            if endpoint.responses.send(response).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!(
                                "Context {} dropped a frame: {}",
                                self.origin.ascii_serialization(),
                                err
                            );
                        }
                    }
                }
            }
        }
        tracing::debug!("Context {} stopped", self.origin.ascii_serialization());
    }
}

pub fn spawn_spec_bridge<H: DomHost>(
    bridge: SpecBridge<H>,
    endpoint: ContextEndpoint,
    shutdown_rx: ShutdownReceiver,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(bridge.serve(endpoint, shutdown_rx))
}
