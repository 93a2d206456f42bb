//! Snapshot timeline: decides which DOM the runner shows while previewing
//! command snapshots.
mod actor;
mod capture;
mod cycle;
mod events;
mod manager;
mod state;


pub use actor::{TimelineHandle, spawn_timeline};
pub use capture::CaptureState;
pub use events::{RunnerConfig, RunnerEvent, TimelineNotice};
pub use manager::{TimelineManager, TimelineOptions};
pub use state::PinState;

/// Period between automatic steps through a multi-snapshot command.
pub const DEFAULT_CYCLE_INTERVAL: std::time::Duration = std::time::Duration::from_millis(800);
