//! What the runner currently shows, as published to the renderer.
mod format;
pub(crate) mod state;


pub use format::{OutputFormat, format_display};
pub use state::{DisplayState, MessageBanner, MessageType, RenderedDom, SnapshotView};
