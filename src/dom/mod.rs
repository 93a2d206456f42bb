//! DOM capture/restore collaborators.
mod memory;
mod origin;


pub use memory::{Document, HighlightRecord, MemoryPage};
pub use origin::{parse_origin, same_origin};

use crate::snapshot::{Snapshot, SnapshotControls, SnapshotRequest};

/// Access to the page under test from one browsing context.
///
/// Implementations never fail: anything that cannot be captured is reported
/// as `None`.
pub trait DomHost: Send + 'static {
    /// Captures the live document, if there is one.
    fn detach_dom(&mut self) -> Option<Snapshot>;

    fn restore_dom(&mut self, snapshot: &Snapshot);

    fn highlight_el(&mut self, snapshot: &Snapshot, request: &SnapshotRequest);

    /// The page under test moved to `url`. Called in bus order, so origin
    /// checks for later events see the navigation.
    fn url_changed(&mut self, _url: &str) {}

    /// Whether this context can read the page under test directly.
    fn is_aut_same_origin(&self) -> bool;

    fn snapshot_controls(&self, request: &SnapshotRequest) -> SnapshotControls {
        SnapshotControls::for_request(request)
    }

    fn is_studio_open(&self) -> bool {
        false
    }

    fn set_selector_playground_enabled(&mut self, _enabled: bool) {}
}
