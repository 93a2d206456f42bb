use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::events::TimelineInput;

/// `tokio::time::interval` rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Periodic tick source for snapshot cycling. Dropping it stops the ticks.
pub(crate) struct CycleTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl CycleTimer {
    /// Sends `CycleTick { generation }` every `period`, first after one period.
    pub(crate) fn start(
        period: Duration,
        generation: u64,
        inputs_tx: mpsc::UnboundedSender<TimelineInput>,
    ) -> Self {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if inputs_tx
                    .send(TimelineInput::CycleTick { generation })
                    .is_err()
                {
                    break;
                }
            }
        });
        Self { generation, handle }
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CycleTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
