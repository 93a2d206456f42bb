use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::bridge::BridgeChannel;
use crate::display::state::{MISSING_SNAPSHOT_TITLE, STUDIO_OPEN_TITLE, TESTS_RUNNING_TITLE};
use crate::display::{DisplayState, MessageBanner, RenderedDom, SnapshotView};
use crate::dom::DomHost;
use crate::snapshot::{OriginalState, Snapshot, SnapshotRequest, Viewport};

use super::DEFAULT_CYCLE_INTERVAL;
use super::capture::{CaptureResolver, CaptureState};
use super::cycle::CycleTimer;
use super::events::{RunnerEvent, TimelineInput, TimelineNotice};
use super::state::{PinState, RestoreToken, TimelineState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    pub cycle_interval: Duration,
    pub viewport: Viewport,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            viewport: Viewport::default(),
        }
    }
}

/// Owns the display state and applies runner events to it.
///
/// All inputs go through [`TimelineManager::handle`]; timers and deferred
/// work are fed back through the input queue returned by
/// [`TimelineManager::new`].
pub struct TimelineManager<H: DomHost> {
    host: H,
    bridge: BridgeChannel,
    resolver: CaptureResolver,
    state: TimelineState,
    display: DisplayState,
    display_tx: watch::Sender<DisplayState>,
    notices: Option<mpsc::UnboundedSender<TimelineNotice>>,
    inputs_tx: mpsc::UnboundedSender<TimelineInput>,
    cycle_interval: Duration,
}

impl<H: DomHost> TimelineManager<H> {
    pub(crate) fn new(
        host: H,
        bridge: BridgeChannel,
        options: TimelineOptions,
        notices: Option<mpsc::UnboundedSender<TimelineNotice>>,
    ) -> (Self, mpsc::UnboundedReceiver<TimelineInput>) {
        let display = DisplayState::new(options.viewport);
        let (display_tx, _) = watch::channel(display.clone());
        let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
        (
            Self {
                host,
                bridge,
                resolver: CaptureResolver::new(),
                state: TimelineState::default(),
                display,
                display_tx,
                notices,
                inputs_tx,
                cycle_interval: options.cycle_interval,
            },
            inputs_rx,
        )
    }

    #[must_use]
    pub const fn display(&self) -> &DisplayState {
        &self.display
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display_tx.subscribe()
    }

    #[must_use]
    pub const fn original_state(&self) -> Option<&OriginalState> {
        self.resolver.original()
    }

    #[must_use]
    pub const fn capture_state(&self) -> &CaptureState {
        self.resolver.state()
    }

    #[must_use]
    pub const fn detached_id(&self) -> Option<u64> {
        self.state.detached_id()
    }

    #[must_use]
    pub const fn pin_state(&self) -> PinState {
        self.state.pin()
    }

    #[must_use]
    pub const fn is_cycling(&self) -> bool {
        self.state.is_cycling()
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn input_sender(&self) -> mpsc::UnboundedSender<TimelineInput> {
        self.inputs_tx.clone()
    }

    pub(crate) fn handle(&mut self, input: TimelineInput) {
        match input {
            TimelineInput::Event(event) => self.on_event(*event),
            TimelineInput::CycleTick { generation } => self.on_cycle_tick(generation),
            TimelineInput::DeferredRestore(token) => self.on_deferred_restore(token),
            TimelineInput::BridgeFrame(frame) => self.on_bridge_frame(&frame),
        }
        self.publish();
    }

    fn publish(&self) {
        let display = &self.display;
        self.display_tx.send_if_modified(|current| {
            if current == display {
                return false;
            }
            current.clone_from(display);
            true
        });
    }

    fn on_event(&mut self, event: RunnerEvent) {
        tracing::trace!("Timeline event {}", event.name());
        match event {
            RunnerEvent::RunStart => self.on_run_start(),
            RunnerEvent::RunEnd => self.on_run_end(),
            RunnerEvent::ViewportChanged(viewport) => self.display.viewport = viewport,
            RunnerEvent::Config(config) => self.display.viewport = config.viewport(),
            RunnerEvent::UrlChanged { url } => {
                self.host.url_changed(&url);
                self.display.url = Some(url);
            }
            RunnerEvent::PageLoading { loading } => self.display.is_loading_url = loading,
            RunnerEvent::ShowSnapshot(request) => self.on_show_snapshot(Arc::new(request)),
            RunnerEvent::HideSnapshot => self.on_hide_snapshot(),
            RunnerEvent::PinSnapshot(request) => self.on_pin_snapshot(&request),
            RunnerEvent::UnpinSnapshot => self.on_unpin_snapshot(),
        }
    }

    fn on_run_start(&mut self) {
        self.display.is_loading = false;
        self.display.is_running = true;
        self.display.reset_url();
        self.host.set_selector_playground_enabled(false);
        self.state.reset();
        self.resolver.reset(&mut self.bridge);
        self.display.clear_message();
    }

    const fn on_run_end(&mut self) {
        self.display.is_running = false;
    }

    fn on_show_snapshot(&mut self, request: Arc<SnapshotRequest>) {
        if self.state.is_pinned() {
            return;
        }
        if self.display.is_running {
            self.display.message = Some(MessageBanner::warning(TESTS_RUNNING_TITLE));
            return;
        }
        if self.host.is_studio_open() {
            self.display.message = Some(MessageBanner::warning(STUDIO_OPEN_TITLE));
            return;
        }
        let Some(first) = request.snapshot(0).cloned() else {
            self.on_hide_snapshot();
            self.display.message = Some(MessageBanner::warning(MISSING_SNAPSHOT_TITLE));
            return;
        };

        self.display.highlight_url = true;
        self.resolver.ensure_captured(
            &mut self.host,
            &mut self.bridge,
            self.display.url.as_deref(),
            self.display.viewport,
        );
        self.state.mark_displayed(request.id);
        self.display.viewport = request.viewport();
        self.display.url = request.url.clone();

        self.state.cancel_cycle();
        if request.snapshots.len() > 1 {
            let generation = self.state.next_cycle_generation();
            let timer = CycleTimer::start(self.cycle_interval, generation, self.inputs_tx.clone());
            self.state.start_cycle(Arc::clone(&request), timer);
        }

        self.show_snapshot(&first, 0, &request);
    }

    fn on_cycle_tick(&mut self, generation: u64) {
        if self.state.is_pinned() {
            return;
        }
        let Some(cycle) = self.state.cycle_mut() else {
            return;
        };
        if cycle.generation() != generation {
            return;
        }
        let index = cycle.advance();
        let request = Arc::clone(&cycle.request);
        if let Some(snapshot) = request.snapshot(index).cloned() {
            self.show_snapshot(&snapshot, index, &request);
        }
    }

    fn show_snapshot(&mut self, snapshot: &Snapshot, index: usize, request: &SnapshotRequest) {
        self.display.message = Some(MessageBanner::showing(&snapshot.name));
        self.render(snapshot, index, request);
    }

    fn render(&mut self, snapshot: &Snapshot, index: usize, request: &SnapshotRequest) {
        self.host.restore_dom(snapshot);
        if request.target.is_some() {
            self.host.highlight_el(snapshot, request);
        }
        self.display.rendered = RenderedDom::Snapshot {
            request_id: request.id,
            index,
            name: snapshot.name.clone(),
        };
    }

    fn on_hide_snapshot(&mut self) {
        if self.state.is_pinned() {
            return;
        }
        self.state.cancel_cycle();
        self.display.highlight_url = false;

        let restorable = self
            .resolver
            .original()
            .is_some_and(|original| !original.body().is_empty());
        if !restorable {
            self.display.clear_message();
            return;
        }

        // Restore on the next turn so a show that is already queued wins.
        let token = self.state.schedule_restore();
        if self
            .inputs_tx
            .send(TimelineInput::DeferredRestore(token))
            .is_err()
        {
            tracing::debug!("Timeline input queue closed; restore skipped");
        }
    }

    fn on_deferred_restore(&mut self, token: RestoreToken) {
        if self.state.is_pinned() || !self.state.is_restore_current(token) {
            tracing::trace!("Skipping stale restore");
            return;
        }
        let Some(original) = self.resolver.take() else {
            return;
        };
        self.display.viewport = original.viewport;
        self.display.url = original.url.clone();
        self.host.restore_dom(&original.snapshot);
        self.display.rendered = RenderedDom::Live;
        self.display.clear_message();
        self.state.clear_detached();
    }

    fn on_pin_snapshot(&mut self, request: &SnapshotRequest) {
        let Some(first) = request.snapshot(0).cloned() else {
            self.notify(TimelineNotice::SnapshotUnpinned);
            self.display.message = Some(MessageBanner::warning(MISSING_SNAPSHOT_TITLE));
            return;
        };

        self.state.pin_at(0);
        self.display.snapshot = SnapshotView {
            showing_highlights: true,
            state_index: 0,
        };
        self.display.message = Some(MessageBanner::pinned(self.host.snapshot_controls(request)));
        self.render(&first, 0, request);
    }

    fn on_unpin_snapshot(&mut self) {
        self.state.unpin();
        self.display.reset_snapshot_message();
    }

    fn on_bridge_frame(&mut self, frame: &str) {
        self.resolver.accept_frame(&mut self.bridge, frame);
    }

    fn notify(&self, notice: TimelineNotice) {
        if let Some(notices) = self.notices.as_ref()
            && notices.send(notice).is_err()
        {
            tracing::debug!("Reporter stopped listening for timeline notices");
        }
    }
}
