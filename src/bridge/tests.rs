use std::future::Future;

use crate::dom::{Document, MemoryPage, parse_origin};
use crate::error::{AppError, AppResult};
use crate::shutdown_handlers::shutdown_channel;
use crate::snapshot::{FinalSnapshot, Viewport};

use super::{
    BridgeChannel, BridgeMessage, CorrelationId, MAX_FRAME_BYTES, PendingCapture,
    PendingRequests, SpecBridge, decode_frame, encode_frame, spawn_spec_bridge,
};

const CROSS_ORIGIN: &str = "http://foobar.com:3500";
const FINAL_URL: &str = "http://foobar.com:3500/fixtures/dom.html";

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::bridge(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn context(origin: &str, body: &str) -> AppResult<SpecBridge<MemoryPage>> {
    let origin = parse_origin(origin)?;
    let page = MemoryPage::new(
        origin.clone(),
        Some(Document {
            body: body.to_owned(),
            html_attrs: Default::default(),
        }),
    );
    Ok(SpecBridge::new(origin, page, Viewport::new(500, 400)))
}

fn response_frame(correlation_id: u64, body: &str) -> AppResult<String> {
    encode_frame(&BridgeMessage::FinalSnapshotGenerated {
        correlation_id: CorrelationId::new(correlation_id),
        origin: CROSS_ORIGIN.to_owned(),
        snapshot: FinalSnapshot {
            body: body.to_owned(),
            html_attrs: Default::default(),
            viewport_width: 500,
            viewport_height: 400,
        },
    })
}

#[test]
fn frames_use_hyphenated_message_names() -> AppResult<()> {
    let frame = encode_frame(&BridgeMessage::GenerateFinalSnapshot {
        correlation_id: CorrelationId::new(9),
        url: Some(FINAL_URL.to_owned()),
    })?;
    if !frame.contains(r#""type":"generate-final-snapshot""#) || !frame.contains(r#""correlation_id":9"#)
    {
        return Err(AppError::bridge(format!("Unexpected frame: {frame}")));
    }
    let decoded = decode_frame(&response_frame(9, "<body/>")?)?;
    if !matches!(decoded, BridgeMessage::FinalSnapshotGenerated { .. }) {
        return Err(AppError::bridge("Expected final-snapshot-generated"));
    }
    Ok(())
}

#[test]
fn oversized_and_unknown_frames_are_rejected() -> AppResult<()> {
    let oversized = "x".repeat(MAX_FRAME_BYTES.saturating_add(1));
    if decode_frame(&oversized).is_ok() {
        return Err(AppError::bridge("Expected oversized frame to fail"));
    }
    if decode_frame(r#"{"type":"snapshot:unpinned"}"#).is_ok() {
        return Err(AppError::bridge("Expected unknown type to fail"));
    }
    Ok(())
}

#[test]
fn pending_requests_resolve_once() -> AppResult<()> {
    let mut pending = PendingRequests::new();
    let capture = PendingCapture {
        url: Some(FINAL_URL.to_owned()),
        viewport: Viewport::new(800, 600),
    };
    let first = pending.register(capture.clone());
    let second = pending.register(capture.clone());
    if first == second {
        return Err(AppError::bridge("Correlation ids must be unique"));
    }
    if pending.resolve(first) != Some(capture) {
        return Err(AppError::bridge("Expected first capture"));
    }
    if pending.resolve(first).is_some() {
        return Err(AppError::bridge("Capture resolved twice"));
    }
    pending.clear();
    if !pending.is_empty() || pending.is_pending(second) {
        return Err(AppError::bridge("Expected registry to be empty"));
    }
    Ok(())
}

#[test]
fn first_response_wins_and_duplicates_are_ignored() -> AppResult<()> {
    let (mut channel, _responses) = BridgeChannel::new();
    let id = channel.request_final_snapshot(Some(FINAL_URL.to_owned()), Viewport::new(800, 600))?;

    let resolved = channel
        .accept_frame(&response_frame(id.get(), "<body>first</body>")?)
        .ok_or_else(|| AppError::bridge("Expected the first response to resolve"))?;
    if resolved.snapshot.body != "<body>first</body>"
        || resolved.capture.url.as_deref() != Some(FINAL_URL)
    {
        return Err(AppError::bridge(format!("Unexpected resolution: {resolved:?}")));
    }
    if channel
        .accept_frame(&response_frame(id.get(), "<body>second</body>")?)
        .is_some()
    {
        return Err(AppError::bridge("Duplicate response must be ignored"));
    }
    if channel.accept_frame("{not json").is_some() {
        return Err(AppError::bridge("Malformed frame must be ignored"));
    }
    Ok(())
}

#[test]
fn reset_makes_late_answers_unknown() -> AppResult<()> {
    let (mut channel, _responses) = BridgeChannel::new();
    let id = channel.request_final_snapshot(None, Viewport::new(800, 600))?;
    channel.reset();
    if channel.accept_frame(&response_frame(id.get(), "<body/>")?).is_some() {
        return Err(AppError::bridge("Answer from before reset must be ignored"));
    }
    Ok(())
}

#[test]
fn request_fans_out_and_closed_contexts_are_dropped() -> AppResult<()> {
    let (mut channel, _responses) = BridgeChannel::new();
    let mut live = channel.attach(&parse_origin(CROSS_ORIGIN)?);
    let closed = channel.attach(&parse_origin("http://www.foobar.com:3500")?);
    drop(closed);

    channel.request_final_snapshot(Some(FINAL_URL.to_owned()), Viewport::new(800, 600))?;

    if channel.context_count() != 1 {
        return Err(AppError::bridge("Expected closed context to be pruned"));
    }
    let frame = live
        .requests
        .try_recv()
        .map_err(|err| AppError::bridge(format!("Expected a request frame: {err}")))?;
    if !matches!(
        decode_frame(&frame)?,
        BridgeMessage::GenerateFinalSnapshot { .. }
    ) {
        return Err(AppError::bridge("Expected generate-final-snapshot"));
    }
    Ok(())
}

#[test]
fn context_answers_only_for_its_origin() -> AppResult<()> {
    let mut bridge = context(CROSS_ORIGIN, "<body>cross</body>")?;
    let request = |url: &str| {
        encode_frame(&BridgeMessage::GenerateFinalSnapshot {
            correlation_id: CorrelationId::new(1),
            url: Some(url.to_owned()),
        })
    };

    if bridge.handle_frame(&request("http://localhost:3500/")?)?.is_some() {
        return Err(AppError::bridge("Context answered for another origin"));
    }
    let response = bridge
        .handle_frame(&request(FINAL_URL)?)?
        .ok_or_else(|| AppError::bridge("Expected the matching context to answer"))?;
    match decode_frame(&response)? {
        BridgeMessage::FinalSnapshotGenerated {
            origin, snapshot, ..
        } if origin == CROSS_ORIGIN && snapshot.body == "<body>cross</body>" => Ok(()),
        other => Err(AppError::bridge(format!("Unexpected response: {other:?}"))),
    }
}

#[test]
fn spawned_context_round_trip() -> AppResult<()> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let (mut channel, mut responses) = BridgeChannel::new();
        for (origin, body) in [
            ("http://localhost:4000", "<body>other</body>"),
            (CROSS_ORIGIN, "<body>cross</body>"),
        ] {
            let endpoint = channel.attach(&parse_origin(origin)?);
            spawn_spec_bridge(context(origin, body)?, endpoint, shutdown_tx.subscribe());
        }

        let id = channel.request_final_snapshot(Some(FINAL_URL.to_owned()), Viewport::new(800, 600))?;
        let frame = tokio::time::timeout(std::time::Duration::from_secs(1), responses.recv())
            .await
            .map_err(|err| AppError::bridge(format!("Timed out waiting for response: {err}")))?
            .ok_or_else(|| AppError::bridge("Response channel closed"))?;
        let resolved = channel
            .accept_frame(&frame)
            .ok_or_else(|| AppError::bridge("Expected response to resolve"))?;
        if resolved.correlation_id != id || resolved.snapshot.body != "<body>cross</body>" {
            return Err(AppError::bridge(format!("Unexpected resolution: {resolved:?}")));
        }
        drop(shutdown_tx.send(()));
        Ok(())
    })
}
