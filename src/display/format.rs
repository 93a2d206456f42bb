use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

use super::state::{DisplayState, MessageType, RenderedDom};

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Quiet,
}

/// Renders one display transition as a single output line.
///
/// # Errors
///
/// Returns an error when the state cannot be serialized as JSON or the text
/// line cannot be formatted.
pub fn format_display(state: &DisplayState, format: OutputFormat) -> AppResult<Option<String>> {
    match format {
        OutputFormat::Quiet => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string(state)?)),
        OutputFormat::Text => Ok(Some(format_text(state)?)),
    }
}

fn format_text(state: &DisplayState) -> Result<String, std::fmt::Error> {
    let mut line = format!(
        "url={} viewport={}x{}",
        state.url.as_deref().unwrap_or("-"),
        state.viewport.width,
        state.viewport.height
    );
    if state.is_running {
        line.push_str(" running");
    }
    if state.is_loading_url {
        line.push_str(" loading");
    }
    if state.highlight_url {
        line.push_str(" highlighted");
    }
    match &state.rendered {
        RenderedDom::Live => line.push_str(" dom=live"),
        RenderedDom::Snapshot {
            request_id,
            index,
            name,
        } => {
            write!(line, " dom=snapshot#{request_id}[{index}] '{name}'")?;
        }
    }
    if let Some(message) = state.message.as_ref() {
        let kind = match message.kind {
            MessageType::Plain => "",
            MessageType::Info => " (info)",
            MessageType::Warning => " (warning)",
        };
        write!(line, " | {}{}", message.title, kind)?;
        if !message.description.is_empty() {
            write!(line, ": {}", message.description)?;
        }
        if let Some(controls) = message.controls.as_ref() {
            write!(line, " [{} states]", controls.states.len())?;
        }
    }
    Ok(line)
}
