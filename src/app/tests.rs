use std::future::Future;
use std::time::Duration;

use tempfile::tempdir;

use super::script::{ScriptEvent, parse_script_line};
use super::{SessionSettings, read_script, run_session};
use crate::display::{OutputFormat, RenderedDom};
use crate::dom::parse_origin;
use crate::error::{AppError, AppResult, ScriptError};
use crate::shutdown_handlers::shutdown_channel;
use crate::timeline::RunnerEvent;

const LIVE_URL: &str = "http://localhost:3500/fixtures/generic.html";
const CROSS_URL: &str = "http://foobar.com:3500/fixtures/dom.html";

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| AppError::script(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn settings(contexts: &[&str], output_format: OutputFormat) -> AppResult<SessionSettings> {
    let mut parsed = Vec::with_capacity(contexts.len());
    for origin in contexts {
        parsed.push(parse_origin(origin)?);
    }
    Ok(SessionSettings {
        cycle_interval: Duration::from_millis(800),
        settle: Duration::from_millis(100),
        primary_origin: parse_origin("http://localhost:3500")?,
        contexts: parsed,
        studio_open: false,
        output_format,
    })
}

fn script(lines: &[&str]) -> AppResult<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(event) = parse_script_line(idx.saturating_add(1), line)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn show_line(at_ms: u64, id: u64, names: &[&str]) -> String {
    let snapshots: Vec<String> = names
        .iter()
        .map(|name| format!(r#"{{"name":"{name}","body":"<body>{name}</body>"}}"#))
        .collect();
    format!(
        r#"{{"at_ms":{at_ms},"event":"show:snapshot","id":{id},"viewport_width":1280,"viewport_height":720,"snapshots":[{}]}}"#,
        snapshots.join(",")
    )
}

#[test]
fn parse_script_line_skips_blank_and_comment_lines() -> AppResult<()> {
    for line in ["", "   ", "# run:start", "  # indented comment"] {
        if parse_script_line(1, line)?.is_some() {
            return Err(AppError::script(format!("Expected '{line}' to be skipped")));
        }
    }
    let event = parse_script_line(2, r#"{"event":"run:start"}"#)?
        .ok_or_else(|| AppError::script("Expected an event"))?;
    if event.at_ms != 0 || event.event != RunnerEvent::RunStart {
        return Err(AppError::script(format!("Unexpected event: {event:?}")));
    }
    let event = parse_script_line(3, r#"{"at_ms":250,"event":"url:changed","url":"http://a.test/"}"#)?
        .ok_or_else(|| AppError::script("Expected an event"))?;
    if event.at_ms != 250 || event.event.name() != "url:changed" {
        return Err(AppError::script(format!("Unexpected event: {event:?}")));
    }
    Ok(())
}

#[test]
fn parse_script_line_reports_line_number() -> AppResult<()> {
    match parse_script_line(7, r#"{"event":"snapshot:explode"}"#) {
        Err(AppError::Script(ScriptError::InvalidEvent { line: 7, .. })) => Ok(()),
        other => Err(AppError::script(format!("Expected invalid event, got {other:?}"))),
    }
}

#[test]
fn read_script_rejects_events_out_of_order() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("events.jsonl");
        std::fs::write(
            &path,
            "{\"at_ms\":100,\"event\":\"run:start\"}\n\n{\"at_ms\":50,\"event\":\"run:end\"}\n",
        )?;
        match read_script(&path).await {
            Err(AppError::Script(ScriptError::OutOfOrder {
                line: 3,
                at_ms: 50,
                previous_ms: 100,
            })) => {}
            other => {
                return Err(AppError::script(format!("Expected out of order, got {other:?}")));
            }
        }

        let missing = dir.path().join("missing.jsonl");
        if !matches!(
            read_script(&missing).await,
            Err(AppError::Script(ScriptError::Read { .. }))
        ) {
            return Err(AppError::script("Expected a read error"));
        }
        Ok(())
    })
}

#[test]
fn read_script_loads_events_in_order() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("events.jsonl");
        let content = [
            "# warm up".to_owned(),
            r#"{"event":"run:start"}"#.to_owned(),
            r#"{"at_ms":5,"event":"run:end"}"#.to_owned(),
            show_line(5, 1, &["a", "b"]),
        ]
        .join("\n");
        std::fs::write(&path, content)?;

        let events = read_script(&path).await?;
        let names: Vec<&str> = events.iter().map(|event| event.event.name()).collect();
        if names != ["run:start", "run:end", "show:snapshot"] {
            return Err(AppError::script(format!("Unexpected events: {names:?}")));
        }
        Ok(())
    })
}

#[test]
fn session_cycles_then_restores_live_page() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let url_line = format!(r#"{{"event":"url:changed","url":"{LIVE_URL}"}}"#);
        let show = show_line(10, 1, &["s0", "s1", "s2"]);
        let events = script(&[
            r#"{"event":"run:start"}"#,
            url_line.as_str(),
            r#"{"event":"run:end"}"#,
            show.as_str(),
            r#"{"at_ms":1000,"event":"hide:snapshot"}"#,
        ])?;

        let report = run_session(
            &settings(&[], OutputFormat::Text)?,
            events,
            Vec::new(),
            &shutdown_tx,
        )
        .await?;

        if report.events_sent != 5 || report.interrupted {
            return Err(AppError::script(format!(
                "Unexpected report: sent {} interrupted {}",
                report.events_sent, report.interrupted
            )));
        }
        let display = &report.final_display;
        if display.rendered != RenderedDom::Live
            || display.url.as_deref() != Some(LIVE_URL)
            || display.message.is_some()
        {
            return Err(AppError::script(format!("Unexpected final display: {display:?}")));
        }
        let output = String::from_utf8(report.out)
            .map_err(|err| AppError::script(format!("Output is not UTF-8: {err}")))?;
        for expected in [
            "dom=snapshot#1[0] 's0' | DOM Snapshot: s0",
            "dom=snapshot#1[1] 's1' | DOM Snapshot: s1",
        ] {
            if !output.contains(expected) {
                return Err(AppError::script(format!("Missing '{expected}' in:\n{output}")));
            }
        }
        if output.lines().count() != report.lines_written {
            return Err(AppError::script("Line count mismatch"));
        }
        Ok(())
    })
}

#[test]
fn session_restores_cross_origin_page_through_context() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let url_line = format!(r#"{{"event":"url:changed","url":"{CROSS_URL}"}}"#);
        let show = show_line(20, 4, &["before", "after"]);
        let events = script(&[
            url_line.as_str(),
            show.as_str(),
            r#"{"at_ms":400,"event":"hide:snapshot"}"#,
        ])?;

        let report = run_session(
            &settings(&["http://foobar.com:3500"], OutputFormat::Json)?,
            events,
            Vec::new(),
            &shutdown_tx,
        )
        .await?;

        let display = &report.final_display;
        if display.rendered != RenderedDom::Live || display.url.as_deref() != Some(CROSS_URL) {
            return Err(AppError::script(format!("Expected live cross-origin page: {display:?}")));
        }
        let output = String::from_utf8(report.out)
            .map_err(|err| AppError::script(format!("Output is not UTF-8: {err}")))?;
        for line in output.lines() {
            let value: serde_json::Value = serde_json::from_str(line)?;
            if value.pointer("/viewport/width").is_none() {
                return Err(AppError::script(format!("Unexpected JSON line: {line}")));
            }
        }
        Ok(())
    })
}

#[test]
fn session_navigation_waits_for_queued_show() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let live_line = format!(r#"{{"event":"url:changed","url":"{LIVE_URL}"}}"#);
        let show = show_line(10, 1, &["s0"]);
        let cross_line = format!(r#"{{"at_ms":10,"event":"url:changed","url":"{CROSS_URL}"}}"#);
        let events = script(&[
            live_line.as_str(),
            show.as_str(),
            cross_line.as_str(),
            r#"{"at_ms":400,"event":"hide:snapshot"}"#,
        ])?;

        let report = run_session(
            &settings(&["http://foobar.com:3500"], OutputFormat::Quiet)?,
            events,
            Vec::new(),
            &shutdown_tx,
        )
        .await?;

        // The show ran while the page was still on the primary origin, so
        // the live page was captured locally and comes back on hide.
        let display = &report.final_display;
        if display.rendered != RenderedDom::Live
            || display.url.as_deref() != Some(LIVE_URL)
            || display.message.is_some()
        {
            return Err(AppError::script(format!("Expected the live page back: {display:?}")));
        }
        Ok(())
    })
}

#[test]
fn session_reports_unpinned_notice() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let events = script(&[
            r#"{"event":"pin:snapshot","id":9,"viewport_width":10,"viewport_height":10,"snapshots":[]}"#,
        ])?;

        let report = run_session(
            &settings(&[], OutputFormat::Json)?,
            events,
            Vec::new(),
            &shutdown_tx,
        )
        .await?;

        let output = String::from_utf8(report.out)
            .map_err(|err| AppError::script(format!("Output is not UTF-8: {err}")))?;
        if !output.lines().any(|line| line == r#"{"event":"snapshot:unpinned"}"#) {
            return Err(AppError::script(format!("Missing notice in:\n{output}")));
        }
        Ok(())
    })
}

#[test]
fn session_stops_on_shutdown() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let events = script(&[r#"{"at_ms":60000,"event":"run:start"}"#])?;

        let trigger = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            drop(trigger.send(()));
        });

        let report = run_session(
            &settings(&[], OutputFormat::Quiet)?,
            events,
            Vec::new(),
            &shutdown_tx,
        )
        .await?;

        if !report.interrupted || report.events_sent != 0 || !report.out.is_empty() {
            return Err(AppError::script("Expected an interrupted, silent session"));
        }
        Ok(())
    })
}
