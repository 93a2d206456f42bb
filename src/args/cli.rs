use std::time::Duration;

use clap::Parser;
use url::Origin;

use crate::display::OutputFormat;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_origin_arg};

/// Origin of the runner page when nothing else is configured.
pub const DEFAULT_PRIMARY_ORIGIN: &str = "http://localhost:3500";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replays test-runner events through the snapshot timeline and prints what the runner would display."
)]
pub struct ViewerArgs {
    /// JSON-lines event script to replay
    pub script: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./snapview.toml or ./snapview.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Delay between automatic steps through a multi-snapshot command (supports ms/s/m/h)
    #[arg(long = "cycle-interval", default_value = "800ms", value_parser = parse_duration_arg)]
    pub cycle_interval: Duration,

    /// How long to keep the timeline alive after the last event (supports ms/s/m/h)
    #[arg(long, default_value = "1s", value_parser = parse_duration_arg)]
    pub settle: Duration,

    /// Origin the runner page is served from
    #[arg(long = "primary-origin", default_value = DEFAULT_PRIMARY_ORIGIN, value_parser = parse_origin_arg)]
    pub primary_origin: Origin,

    /// Attach an isolated context for ORIGIN (repeatable)
    #[arg(long = "context", value_name = "ORIGIN", value_parser = parse_origin_arg)]
    pub contexts: Vec<Origin>,

    /// Simulate an open studio session
    #[arg(long = "studio-open")]
    pub studio_open: bool,

    /// How display transitions are printed
    #[arg(long = "output-format", value_enum, default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Enable verbose logging (sets log level to debug unless overridden by SNAPVIEW_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
