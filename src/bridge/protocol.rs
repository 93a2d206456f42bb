use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, BridgeError};
use crate::snapshot::FinalSnapshot;

/// Largest frame accepted from either side of the bridge.
pub const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "generate-final-snapshot")]
    GenerateFinalSnapshot {
        correlation_id: CorrelationId,
        url: Option<String>,
    },
    #[serde(rename = "final-snapshot-generated")]
    FinalSnapshotGenerated {
        correlation_id: CorrelationId,
        origin: String,
        snapshot: FinalSnapshot,
    },
}

/// Serializes a message into one frame.
///
/// # Errors
///
/// Returns an error when serialization fails or the frame is too large.
pub fn encode_frame(message: &BridgeMessage) -> AppResult<String> {
    let frame = serde_json::to_string(message).map_err(|err| {
        AppError::bridge(BridgeError::Serialize {
            context: "bridge frame",
            source: err,
        })
    })?;
    if frame.len() > MAX_FRAME_BYTES {
        return Err(AppError::bridge(BridgeError::FrameTooLarge {
            max_bytes: MAX_FRAME_BYTES,
        }));
    }
    Ok(frame)
}

/// Parses one frame.
///
/// # Errors
///
/// Returns an error when the frame is too large or is not a known message.
pub fn decode_frame(frame: &str) -> AppResult<BridgeMessage> {
    if frame.len() > MAX_FRAME_BYTES {
        return Err(AppError::bridge(BridgeError::FrameTooLarge {
            max_bytes: MAX_FRAME_BYTES,
        }));
    }
    serde_json::from_str::<BridgeMessage>(frame.trim_end()).map_err(|err| {
        AppError::bridge(BridgeError::Deserialize {
            context: "bridge frame",
            source: err,
        })
    })
}
