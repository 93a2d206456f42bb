use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::{Origin, Url};

use crate::snapshot::{Snapshot, SnapshotRequest, TargetElement};

use super::DomHost;

/// Serialized page content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: String,
    pub html_attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRecord {
    pub snapshot: String,
    pub target: TargetElement,
}

#[derive(Debug, Default)]
struct PageState {
    location: Option<Url>,
    document: Option<Document>,
    rendered: Option<Document>,
    highlights: Vec<HighlightRecord>,
    restore_count: usize,
    studio_open: bool,
    selector_playground_enabled: bool,
}

/// In-memory page under test seen from one context.
///
/// Clones share the same page, so a driver can navigate while the timeline
/// owns another handle.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    origin: Origin,
    state: Arc<Mutex<PageState>>,
}

impl MemoryPage {
    #[must_use]
    pub fn new(origin: Origin, document: Option<Document>) -> Self {
        Self {
            origin,
            state: Arc::new(Mutex::new(PageState {
                document,
                ..PageState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Moves the page to `url`. Unparseable URLs leave the page on about:blank.
    pub fn navigate(&self, url: &str) {
        let location = Url::parse(url).ok();
        if location.is_none() {
            tracing::debug!("Page navigated to unparseable url '{}'", url);
        }
        self.lock().location = location;
    }

    pub fn set_document(&self, document: Option<Document>) {
        self.lock().document = document;
    }

    pub fn set_studio_open(&self, open: bool) {
        self.lock().studio_open = open;
    }

    #[must_use]
    pub fn rendered(&self) -> Option<Document> {
        self.lock().rendered.clone()
    }

    /// Number of times any DOM was restored into the page.
    #[must_use]
    pub fn restore_count(&self) -> usize {
        self.lock().restore_count
    }

    #[must_use]
    pub fn highlights(&self) -> Vec<HighlightRecord> {
        self.lock().highlights.clone()
    }

    #[must_use]
    pub fn selector_playground_enabled(&self) -> bool {
        self.lock().selector_playground_enabled
    }
}

impl DomHost for MemoryPage {
    fn detach_dom(&mut self) -> Option<Snapshot> {
        let state = self.lock();
        state.document.as_ref().map(|document| Snapshot {
            name: "final state".to_owned(),
            body: document.body.clone(),
            html_attrs: document.html_attrs.clone(),
            timestamp: 0,
        })
    }

    fn restore_dom(&mut self, snapshot: &Snapshot) {
        let mut state = self.lock();
        state.highlights.clear();
        state.restore_count = state.restore_count.saturating_add(1);
        state.rendered = Some(Document {
            body: snapshot.body.clone(),
            html_attrs: snapshot.html_attrs.clone(),
        });
    }

    fn highlight_el(&mut self, snapshot: &Snapshot, request: &SnapshotRequest) {
        if let Some(target) = request.target.as_ref() {
            self.lock().highlights.push(HighlightRecord {
                snapshot: snapshot.name.clone(),
                target: target.clone(),
            });
        }
    }

    fn url_changed(&mut self, url: &str) {
        self.navigate(url);
    }

    fn is_aut_same_origin(&self) -> bool {
        // about:blank and friends belong to whoever opened them.
        self.lock()
            .location
            .as_ref()
            .is_none_or(|location| location.origin() == self.origin)
    }

    fn is_studio_open(&self) -> bool {
        self.lock().studio_open
    }

    fn set_selector_playground_enabled(&mut self, enabled: bool) {
        self.lock().selector_playground_enabled = enabled;
    }
}
