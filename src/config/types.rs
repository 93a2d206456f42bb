use std::time::Duration;

use serde::Deserialize;

use crate::display::OutputFormat;
use crate::error::ValidationError;

/// Settings accepted from `snapview.toml` / `snapview.json`. Every field
/// mirrors a CLI option; the CLI wins when both are set.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub script: Option<String>,
    pub cycle_interval: Option<DurationValue>,
    pub settle: Option<DurationValue>,
    pub primary_origin: Option<String>,
    #[serde(alias = "context")]
    pub contexts: Option<Vec<String>>,
    pub studio_open: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Either whole seconds or a suffixed string such as `"800ms"`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
