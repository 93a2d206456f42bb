use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000, 660)
    }
}

/// One captured DOM state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub body: String,
    #[serde(default)]
    pub html_attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub timestamp: u64,
}

/// Element a command acted on; drives the highlight overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetElement {
    pub selector: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Snapshots produced by a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub id: u64,
    #[serde(default)]
    pub snapshots: Vec<Arc<Snapshot>>,
    #[serde(default)]
    pub url: Option<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    #[serde(default)]
    pub target: Option<TargetElement>,
}

impl SnapshotRequest {
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<&Arc<Snapshot>> {
        self.snapshots.get(index)
    }

    /// Index that follows `index`, wrapping to the first snapshot.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        let next = index.saturating_add(1);
        if next < self.snapshots.len() { next } else { 0 }
    }
}

/// Controls shown next to a pinned snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotControls {
    pub request_id: u64,
    pub states: Vec<String>,
    pub can_toggle_highlights: bool,
}

impl SnapshotControls {
    #[must_use]
    pub fn for_request(request: &SnapshotRequest) -> Self {
        Self {
            request_id: request.id,
            states: request
                .snapshots
                .iter()
                .map(|snapshot| snapshot.name.clone())
                .collect(),
            can_toggle_highlights: request.target.is_some(),
        }
    }
}

/// Final page state captured inside an isolated context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSnapshot {
    pub body: String,
    #[serde(default)]
    pub html_attrs: BTreeMap<String, String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl FinalSnapshot {
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, viewport: Viewport) -> Self {
        Self {
            body: snapshot.body.clone(),
            html_attrs: snapshot.html_attrs.clone(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        }
    }

    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            name: "final state".to_owned(),
            body: self.body,
            html_attrs: self.html_attrs,
            timestamp: 0,
        }
    }
}

/// Live page state saved before the first preview of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalState {
    pub snapshot: Arc<Snapshot>,
    pub url: Option<String>,
    pub viewport: Viewport,
}

impl OriginalState {
    #[must_use]
    pub fn new(snapshot: Snapshot, url: Option<String>, viewport: Viewport) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            url,
            viewport,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.snapshot.body
    }

    #[must_use]
    pub fn html_attrs(&self) -> &BTreeMap<String, String> {
        &self.snapshot.html_attrs
    }
}
