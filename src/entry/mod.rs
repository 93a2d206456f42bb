use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use clap::{CommandFactory, FromArgMatches};

use crate::app::{SessionSettings, read_script, run_session};
use crate::args::ViewerArgs;
use crate::config::{DEFAULT_CONFIG_FILES, apply_config, ensure_unique_contexts, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Parses the command line, then replays the requested script.
///
/// # Errors
///
/// Returns an error when arguments, config or script are invalid, or the
/// replay fails.
pub fn run() -> AppResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<ViewerArgs>> {
    let mut cmd = ViewerArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let mut args = ViewerArgs::from_arg_matches(&matches)?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }
    ensure_unique_contexts(&args.contexts)?;

    Ok(Some(args))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: ViewerArgs) -> AppResult<()> {
    let Some(script_path) = args.script.as_deref() else {
        tracing::error!("Missing event script (pass SCRIPT or set 'script' in config).");
        return Err(AppError::validation(ValidationError::MissingScript));
    };
    let script = read_script(Path::new(script_path)).await?;
    let settings = SessionSettings::from_args(&args);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let report = run_session(&settings, script, std::io::stdout(), &shutdown_tx).await?;
    signal_handle.await?;
    let mut out = report.out;
    out.flush()?;
    tracing::debug!("Final display: {:?}", report.final_display);

    if report.interrupted {
        tracing::warn!("Replay interrupted after {} events", report.events_sent);
    } else {
        tracing::info!(
            "Replayed {} events, {} display updates",
            report.events_sent,
            report.lines_written
        );
    }
    Ok(())
}
