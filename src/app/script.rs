use std::path::Path;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{AppError, AppResult, ScriptError};
use crate::timeline::RunnerEvent;

/// One scripted runner event and when to deliver it, relative to the start
/// of the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ScriptEvent {
    #[serde(default)]
    pub(crate) at_ms: u64,
    #[serde(flatten)]
    pub(crate) event: RunnerEvent,
}

/// Reads a JSON-lines event script. Blank lines and `#` comments are
/// skipped; offsets must never go backwards.
pub(crate) async fn read_script(path: &Path) -> AppResult<Vec<ScriptEvent>> {
    let read_error = |err: std::io::Error| {
        AppError::script(ScriptError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    };
    let file = tokio::fs::File::open(path).await.map_err(read_error)?;
    let mut lines = BufReader::new(file).lines();

    let mut events = Vec::new();
    let mut line_no = 0usize;
    let mut previous_ms = 0u64;
    while let Some(line) = lines.next_line().await.map_err(read_error)? {
        line_no = line_no.saturating_add(1);
        let Some(event) = parse_script_line(line_no, &line)? else {
            continue;
        };
        if event.at_ms < previous_ms {
            return Err(AppError::script(ScriptError::OutOfOrder {
                line: line_no,
                at_ms: event.at_ms,
                previous_ms,
            }));
        }
        previous_ms = event.at_ms;
        events.push(event);
    }
    tracing::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

pub(super) fn parse_script_line(line_no: usize, line: &str) -> AppResult<Option<ScriptEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some).map_err(|err| {
        AppError::script(ScriptError::InvalidEvent {
            line: line_no,
            source: err,
        })
    })
}
