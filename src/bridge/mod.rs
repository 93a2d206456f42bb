//! Request/response bridge between the primary runner and isolated
//! per-origin contexts.
mod channel;
mod context;
mod protocol;
mod registry;

#[cfg(test)]
mod tests;

pub use channel::{BridgeChannel, ContextEndpoint, ResolvedCapture};
pub use context::{SpecBridge, spawn_spec_bridge};
pub use protocol::{BridgeMessage, CorrelationId, MAX_FRAME_BYTES, decode_frame, encode_frame};
pub use registry::{PendingCapture, PendingRequests};
