//! Snapshot records and the requests that carry them.
mod types;


pub use types::{
    FinalSnapshot, OriginalState, Snapshot, SnapshotControls, SnapshotRequest, TargetElement,
    Viewport,
};
