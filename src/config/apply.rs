use std::collections::BTreeSet;

use clap::ArgMatches;
use clap::parser::ValueSource;
use url::Origin;

use crate::args::ViewerArgs;
use crate::dom::parse_origin;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Values given on the
/// command line are left alone.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut ViewerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "script")
        && let Some(script) = config.script.clone()
    {
        args.script = Some(script);
    }

    if !is_cli(matches, "cycle_interval")
        && let Some(interval) = config.cycle_interval.as_ref()
    {
        args.cycle_interval = config_duration(interval, "cycle_interval")?;
    }

    if !is_cli(matches, "settle")
        && let Some(settle) = config.settle.as_ref()
    {
        args.settle = config_duration(settle, "settle")?;
    }

    if !is_cli(matches, "primary_origin")
        && let Some(origin) = config.primary_origin.as_deref()
    {
        args.primary_origin = config_origin(origin, "primary_origin")?;
    }

    if !is_cli(matches, "contexts")
        && let Some(contexts) = config.contexts.as_ref()
    {
        let mut parsed = Vec::with_capacity(contexts.len());
        for origin in contexts {
            parsed.push(config_origin(origin, "contexts")?);
        }
        ensure_unique_contexts(&parsed)?;
        args.contexts = parsed;
    }

    if !is_cli(matches, "studio_open")
        && let Some(studio_open) = config.studio_open
    {
        args.studio_open = studio_open;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

/// Rejects context lists that name the same origin twice.
///
/// # Errors
///
/// Returns an error naming the first repeated origin.
pub fn ensure_unique_contexts(contexts: &[Origin]) -> AppResult<()> {
    let mut seen = BTreeSet::new();
    for origin in contexts {
        let serialized = origin.ascii_serialization();
        if !seen.insert(serialized.clone()) {
            return Err(AppError::config(ConfigError::DuplicateContext {
                origin: serialized,
            }));
        }
    }
    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn config_duration(
    value: &DurationValue,
    field: &'static str,
) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|source| AppError::config(ConfigError::InvalidField { field, source }))
}

fn config_origin(value: &str, field: &'static str) -> AppResult<Origin> {
    parse_origin(value)
        .map_err(|source| AppError::config(ConfigError::InvalidField { field, source }))
}
