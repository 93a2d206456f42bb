use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

/// Runs the `snapview` binary inside `cwd` so no stray config is picked up.
///
/// # Errors
///
/// Returns an error if the binary path is unknown or the process cannot be
/// started.
pub fn run_snapview<I, S>(cwd: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = snapview_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("SNAPVIEW_LOG", "error")
        .env_remove("RUST_LOG")
        .output()
        .map_err(|err| format!("run snapview failed: {}", err))
}

fn snapview_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_snapview").map_or_else(
        || Err("CARGO_BIN_EXE_snapview missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

/// Parses every stdout line as JSON.
///
/// # Errors
///
/// Returns an error naming the first line that is not JSON.
pub fn json_lines(output: &Output) -> Result<Vec<serde_json::Value>, String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| {
            serde_json::from_str(line).map_err(|err| format!("bad JSON line '{}': {}", line, err))
        })
        .collect()
}
