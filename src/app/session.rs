use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use url::Origin;

use crate::args::ViewerArgs;
use crate::bridge::{BridgeChannel, SpecBridge, spawn_spec_bridge};
use crate::display::{DisplayState, OutputFormat};
use crate::dom::{Document, MemoryPage};
use crate::error::AppResult;
use crate::shutdown::ShutdownSender;
use crate::snapshot::Viewport;
use crate::timeline::{TimelineOptions, spawn_timeline};

use super::render::render_display;
use super::script::ScriptEvent;

/// Everything a replay session needs besides the script itself.
#[derive(Debug, Clone)]
pub(crate) struct SessionSettings {
    pub(crate) cycle_interval: Duration,
    pub(crate) settle: Duration,
    pub(crate) primary_origin: Origin,
    pub(crate) contexts: Vec<Origin>,
    pub(crate) studio_open: bool,
    pub(crate) output_format: OutputFormat,
}

impl SessionSettings {
    pub(crate) fn from_args(args: &ViewerArgs) -> Self {
        Self {
            cycle_interval: args.cycle_interval,
            settle: args.settle,
            primary_origin: args.primary_origin.clone(),
            contexts: args.contexts.clone(),
            studio_open: args.studio_open,
            output_format: args.output_format,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SessionReport<W> {
    pub(crate) events_sent: usize,
    pub(crate) lines_written: usize,
    pub(crate) interrupted: bool,
    pub(crate) final_display: DisplayState,
    pub(crate) out: W,
}

/// Placeholder document served by a page of `origin`.
fn page_document(origin: &Origin) -> Document {
    Document {
        body: format!(
            "<body data-origin=\"{}\"></body>",
            origin.ascii_serialization()
        ),
        html_attrs: Default::default(),
    }
}

/// Replays `script` against a fresh timeline, writing display transitions
/// to `out`. Returns once the script and the settle period are over, or as
/// soon as `shutdown_tx` fires.
///
/// # Errors
///
/// Returns an error when the timeline stops early, a task fails, or `out`
/// cannot be written.
pub(crate) async fn run_session<W>(
    settings: &SessionSettings,
    script: Vec<ScriptEvent>,
    out: W,
    shutdown_tx: &ShutdownSender,
) -> AppResult<SessionReport<W>>
where
    W: Write + Send + 'static,
{
    let mut shutdown_rx = shutdown_tx.subscribe();

    let page = MemoryPage::new(
        settings.primary_origin.clone(),
        Some(page_document(&settings.primary_origin)),
    );
    page.set_studio_open(settings.studio_open);

    let (mut bridge, responses_rx) = BridgeChannel::new();
    let mut contexts = Vec::with_capacity(settings.contexts.len());
    for origin in &settings.contexts {
        let endpoint = bridge.attach(origin);
        let context_page = MemoryPage::new(origin.clone(), Some(page_document(origin)));
        contexts.push(spawn_spec_bridge(
            SpecBridge::new(origin.clone(), context_page, Viewport::default()),
            endpoint,
            shutdown_tx.subscribe(),
        ));
    }

    let (notices_tx, notices_rx) = mpsc::unbounded_channel();
    let timeline = spawn_timeline(
        page.clone(),
        bridge,
        responses_rx,
        TimelineOptions {
            cycle_interval: settings.cycle_interval,
            viewport: Viewport::default(),
        },
        Some(notices_tx),
        shutdown_tx.subscribe(),
    );
    let renderer = tokio::spawn(render_display(
        timeline.subscribe(),
        notices_rx,
        settings.output_format,
        out,
        shutdown_tx.subscribe(),
    ));

    tracing::info!(
        "Replaying {} events ({} isolated contexts)",
        script.len(),
        settings.contexts.len()
    );
    let started = Instant::now();
    let mut events_sent = 0usize;
    let mut interrupted = false;
    for ScriptEvent { at_ms, event } in script {
        let deadline = started
            .checked_add(Duration::from_millis(at_ms))
            .unwrap_or(started);
        tokio::select! {
            () = tokio::time::sleep_until(deadline) => {}
            _ = shutdown_rx.recv() => {
                interrupted = true;
                break;
            }
        }
        tracing::debug!("Delivering {} at {}ms", event.name(), at_ms);
        timeline.send(event)?;
        events_sent = events_sent.saturating_add(1);
    }

    if !interrupted {
        tokio::select! {
            () = tokio::time::sleep(settings.settle) => {}
            _ = shutdown_rx.recv() => interrupted = true,
        }
    }

    let final_display = timeline.display();
    drop(shutdown_tx.send(()));
    timeline.join().await?;
    for context in contexts {
        context.await?;
    }
    let (writer, lines_written) = renderer.await??;

    Ok(SessionReport {
        events_sent,
        lines_written,
        interrupted,
        final_display,
        out: writer,
    })
}
