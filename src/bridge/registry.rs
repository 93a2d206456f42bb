use std::collections::HashMap;

use crate::snapshot::Viewport;

use super::protocol::CorrelationId;

/// What the primary knew when it asked for the final snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCapture {
    pub url: Option<String>,
    pub viewport: Viewport,
}

/// Outstanding final-snapshot requests. Each entry resolves at most once.
#[derive(Debug)]
pub struct PendingRequests {
    next_id: u64,
    entries: HashMap<CorrelationId, PendingCapture>,
}

impl PendingRequests {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, capture: PendingCapture) -> CorrelationId {
        let id = CorrelationId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.entries.insert(id, capture);
        id
    }

    /// Removes and returns the entry; later calls for the same id get `None`.
    pub fn resolve(&mut self, id: CorrelationId) -> Option<PendingCapture> {
        self.entries.remove(&id)
    }

    #[must_use]
    pub fn is_pending(&self, id: CorrelationId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Ids keep increasing, so late answers stay unknown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new()
    }
}
