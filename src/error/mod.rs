mod app;
mod bridge;
mod config;
mod script;
mod timeline;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bridge::BridgeError;
pub use config::ConfigError;
pub use script::ScriptError;
pub use timeline::TimelineError;
pub use validation::ValidationError;
