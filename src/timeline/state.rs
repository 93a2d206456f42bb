use std::sync::Arc;

use crate::snapshot::SnapshotRequest;

use super::cycle::CycleTimer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinState {
    pub pinned: bool,
    pub index: usize,
}

/// Identifies one scheduled restoration. It only applies if nothing was
/// displayed or hidden after it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RestoreToken {
    detached_id: Option<u64>,
    generation: u64,
}

/// Automatic stepping through the snapshots of one request.
pub(crate) struct Cycle {
    pub(crate) request: Arc<SnapshotRequest>,
    pub(crate) index: usize,
    timer: CycleTimer,
}

impl Cycle {
    pub(crate) const fn generation(&self) -> u64 {
        self.timer.generation()
    }

    /// Moves to the next snapshot and returns its index.
    pub(crate) fn advance(&mut self) -> usize {
        self.index = self.request.next_index(self.index);
        self.index
    }
}

/// Run-scoped state of the timeline.
#[derive(Default)]
pub(crate) struct TimelineState {
    detached_id: Option<u64>,
    pin: PinState,
    cycle: Option<Cycle>,
    cycle_generation: u64,
    restore_generation: u64,
}

impl TimelineState {
    pub(crate) const fn detached_id(&self) -> Option<u64> {
        self.detached_id
    }

    pub(crate) const fn pin(&self) -> PinState {
        self.pin
    }

    pub(crate) const fn is_pinned(&self) -> bool {
        self.pin.pinned
    }

    pub(crate) const fn is_cycling(&self) -> bool {
        self.cycle.is_some()
    }

    pub(crate) const fn cycle_mut(&mut self) -> Option<&mut Cycle> {
        self.cycle.as_mut()
    }

    /// Records `id` as the request on screen and invalidates scheduled
    /// restorations.
    pub(crate) const fn mark_displayed(&mut self, id: u64) {
        self.detached_id = Some(id);
        self.restore_generation = self.restore_generation.wrapping_add(1);
    }

    pub(crate) const fn clear_detached(&mut self) {
        self.detached_id = None;
    }

    /// Dropping the previous cycle aborts its timer.
    pub(crate) fn cancel_cycle(&mut self) {
        self.cycle = None;
    }

    pub(crate) const fn next_cycle_generation(&mut self) -> u64 {
        self.cycle_generation = self.cycle_generation.wrapping_add(1);
        self.cycle_generation
    }

    pub(crate) fn start_cycle(&mut self, request: Arc<SnapshotRequest>, timer: CycleTimer) {
        self.cycle = Some(Cycle {
            request,
            index: 0,
            timer,
        });
    }

    pub(crate) fn pin_at(&mut self, index: usize) {
        self.cancel_cycle();
        self.pin = PinState {
            pinned: true,
            index,
        };
    }

    pub(crate) const fn unpin(&mut self) {
        self.pin.pinned = false;
    }

    /// Issues a token for a deferred restoration; older tokens become stale.
    pub(crate) const fn schedule_restore(&mut self) -> RestoreToken {
        self.restore_generation = self.restore_generation.wrapping_add(1);
        RestoreToken {
            detached_id: self.detached_id,
            generation: self.restore_generation,
        }
    }

    pub(crate) fn is_restore_current(&self, token: RestoreToken) -> bool {
        token.detached_id == self.detached_id && token.generation == self.restore_generation
    }

    pub(crate) fn reset(&mut self) {
        self.cancel_cycle();
        self.detached_id = None;
        self.pin = PinState::default();
        self.restore_generation = self.restore_generation.wrapping_add(1);
    }
}
