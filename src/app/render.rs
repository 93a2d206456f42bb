use std::io::Write;

use tokio::sync::{mpsc, watch};

use crate::display::{DisplayState, OutputFormat, format_display};
use crate::error::AppResult;
use crate::shutdown::ShutdownReceiver;
use crate::timeline::TimelineNotice;

/// Writes one line per display transition and per timeline notice until
/// shutdown, then flushes the last state it has not written yet.
///
/// Transitions that happen between two wake-ups collapse into the latest
/// state.
pub(super) async fn render_display<W: Write>(
    mut display_rx: watch::Receiver<DisplayState>,
    mut notices_rx: mpsc::UnboundedReceiver<TimelineNotice>,
    format: OutputFormat,
    mut out: W,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<(W, usize)> {
    let mut written = 0usize;
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            changed = display_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = display_rx.borrow_and_update().clone();
                written = written.saturating_add(write_state(&mut out, &state, format)?);
            }
            Some(notice) = notices_rx.recv() => {
                tracing::info!("Timeline notice: {:?}", notice);
                written = written.saturating_add(write_notice(&mut out, notice, format)?);
            }
        }
    }

    if display_rx.has_changed().unwrap_or(false) {
        let state = display_rx.borrow_and_update().clone();
        written = written.saturating_add(write_state(&mut out, &state, format)?);
    }
    out.flush()?;
    Ok((out, written))
}

fn write_state<W: Write>(out: &mut W, state: &DisplayState, format: OutputFormat) -> AppResult<usize> {
    let Some(line) = format_display(state, format)? else {
        return Ok(0);
    };
    writeln!(out, "{}", line)?;
    Ok(1)
}

fn write_notice<W: Write>(
    out: &mut W,
    notice: TimelineNotice,
    format: OutputFormat,
) -> AppResult<usize> {
    match format {
        OutputFormat::Quiet => return Ok(0),
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&notice)?)?,
        OutputFormat::Text => writeln!(out, "notice {}", notice.name())?,
    }
    Ok(1)
}
