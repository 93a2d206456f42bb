use serde::Serialize;

use crate::snapshot::{SnapshotControls, Viewport};

pub(crate) const DOM_SNAPSHOT_TITLE: &str = "DOM Snapshot";
pub(crate) const PINNED_DESCRIPTION: &str = "pinned";
pub(crate) const MISSING_SNAPSHOT_TITLE: &str =
    "The snapshot is missing. Displaying current state of the DOM.";
pub(crate) const TESTS_RUNNING_TITLE: &str = "Cannot show Snapshot while tests are running";
pub(crate) const STUDIO_OPEN_TITLE: &str = "Cannot show Snapshot while creating commands in Studio";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Plain,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBanner {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub controls: Option<SnapshotControls>,
}

impl MessageBanner {
    fn new(title: &str, description: &str, kind: MessageType) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            kind,
            controls: None,
        }
    }

    pub(crate) fn warning(title: &str) -> Self {
        Self::new(title, "", MessageType::Warning)
    }

    pub(crate) fn showing(snapshot_name: &str) -> Self {
        Self::new(DOM_SNAPSHOT_TITLE, snapshot_name, MessageType::Plain)
    }

    pub(crate) fn pinned(controls: SnapshotControls) -> Self {
        Self {
            controls: Some(controls),
            ..Self::new(DOM_SNAPSHOT_TITLE, PINNED_DESCRIPTION, MessageType::Info)
        }
    }
}

/// DOM currently rendered in the preview pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedDom {
    Live,
    Snapshot {
        request_id: u64,
        index: usize,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotView {
    pub showing_highlights: bool,
    pub state_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub url: Option<String>,
    pub viewport: Viewport,
    pub is_loading: bool,
    pub is_loading_url: bool,
    pub is_running: bool,
    pub highlight_url: bool,
    pub message: Option<MessageBanner>,
    pub snapshot: SnapshotView,
    pub rendered: RenderedDom,
}

impl DisplayState {
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            url: None,
            viewport,
            is_loading: false,
            is_loading_url: false,
            is_running: false,
            highlight_url: false,
            message: None,
            snapshot: SnapshotView {
                showing_highlights: false,
                state_index: 0,
            },
            rendered: RenderedDom::Live,
        }
    }

    pub(crate) fn clear_message(&mut self) {
        self.message = None;
    }

    pub(crate) fn reset_url(&mut self) {
        self.url = None;
    }

    /// Keeps the banner kind and drops description and controls.
    pub(crate) fn reset_snapshot_message(&mut self) {
        let kind = self
            .message
            .as_ref()
            .map_or(MessageType::Plain, |message| message.kind);
        self.message = Some(MessageBanner::new(DOM_SNAPSHOT_TITLE, "", kind));
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
