//! Configuration loading and application.
pub(crate) mod apply;
mod loader;
mod parse;
pub mod types;

#[cfg(test)]
mod test_support;

pub use apply::{apply_config, ensure_unique_contexts};
pub use loader::load_config;
pub(crate) use loader::DEFAULT_CONFIG_FILES;

pub(crate) use parse::parse_duration_value;
