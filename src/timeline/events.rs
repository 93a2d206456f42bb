use serde::{Deserialize, Serialize};

use crate::snapshot::{SnapshotRequest, Viewport};

use super::state::RestoreToken;

/// Runner configuration as broadcast on the `config` event. Only the
/// viewport is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl RunnerConfig {
    #[must_use]
    pub const fn viewport(self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

/// Lifecycle and snapshot events delivered by the runner's event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RunnerEvent {
    #[serde(rename = "run:start")]
    RunStart,
    #[serde(rename = "run:end")]
    RunEnd,
    #[serde(rename = "viewport:changed")]
    ViewportChanged(Viewport),
    #[serde(rename = "config")]
    Config(RunnerConfig),
    #[serde(rename = "url:changed")]
    UrlChanged { url: String },
    #[serde(rename = "page:loading")]
    PageLoading { loading: bool },
    #[serde(rename = "show:snapshot")]
    ShowSnapshot(SnapshotRequest),
    #[serde(rename = "hide:snapshot")]
    HideSnapshot,
    #[serde(rename = "pin:snapshot")]
    PinSnapshot(SnapshotRequest),
    #[serde(rename = "unpin:snapshot")]
    UnpinSnapshot,
}

impl RunnerEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            RunnerEvent::RunStart => "run:start",
            RunnerEvent::RunEnd => "run:end",
            RunnerEvent::ViewportChanged(_) => "viewport:changed",
            RunnerEvent::Config(_) => "config",
            RunnerEvent::UrlChanged { .. } => "url:changed",
            RunnerEvent::PageLoading { .. } => "page:loading",
            RunnerEvent::ShowSnapshot(_) => "show:snapshot",
            RunnerEvent::HideSnapshot => "hide:snapshot",
            RunnerEvent::PinSnapshot(_) => "pin:snapshot",
            RunnerEvent::UnpinSnapshot => "unpin:snapshot",
        }
    }
}

/// Notices the timeline sends back to the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum TimelineNotice {
    #[serde(rename = "snapshot:unpinned")]
    SnapshotUnpinned,
}

impl TimelineNotice {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TimelineNotice::SnapshotUnpinned => "snapshot:unpinned",
        }
    }
}

/// Everything the timeline actor processes, one at a time.
#[derive(Debug)]
pub(crate) enum TimelineInput {
    Event(Box<RunnerEvent>),
    CycleTick { generation: u64 },
    DeferredRestore(RestoreToken),
    BridgeFrame(String),
}
