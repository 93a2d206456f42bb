//! Replay driver: feeds a recorded event script into the timeline and
//! prints every display transition.
mod render;
mod script;
mod session;

#[cfg(test)]
mod tests;

pub(crate) use script::read_script;
pub(crate) use session::{SessionSettings, run_session};
