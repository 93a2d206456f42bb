use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::bridge::BridgeChannel;
use crate::display::DisplayState;
use crate::dom::DomHost;
use crate::error::{AppError, AppResult, TimelineError};
use crate::shutdown::ShutdownReceiver;

use super::events::{RunnerEvent, TimelineInput, TimelineNotice};
use super::manager::{TimelineManager, TimelineOptions};

/// Sending side of a running timeline actor.
pub struct TimelineHandle {
    inputs_tx: mpsc::UnboundedSender<TimelineInput>,
    display_rx: watch::Receiver<DisplayState>,
    task: JoinHandle<()>,
}

impl TimelineHandle {
    /// Queues an event behind everything already delivered.
    ///
    /// # Errors
    ///
    /// Returns an error when the actor has stopped.
    pub fn send(&self, event: RunnerEvent) -> AppResult<()> {
        self.inputs_tx
            .send(TimelineInput::Event(Box::new(event)))
            .map_err(|err| {
                tracing::debug!("Timeline rejected event: {}", err);
                AppError::timeline(TimelineError::Stopped)
            })
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display_rx.clone()
    }

    #[must_use]
    pub fn display(&self) -> DisplayState {
        self.display_rx.borrow().clone()
    }

    /// Waits for the actor to exit after shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error when the actor task panicked or was cancelled.
    pub async fn join(self) -> AppResult<()> {
        self.task.await?;
        Ok(())
    }
}

/// Spawns the timeline actor. It runs until `shutdown_rx` fires.
pub fn spawn_timeline<H: DomHost>(
    host: H,
    bridge: BridgeChannel,
    responses_rx: mpsc::UnboundedReceiver<String>,
    options: TimelineOptions,
    notices: Option<mpsc::UnboundedSender<TimelineNotice>>,
    shutdown_rx: ShutdownReceiver,
) -> TimelineHandle {
    let (manager, inputs_rx) = TimelineManager::new(host, bridge, options, notices);
    let display_rx = manager.subscribe();
    let inputs_tx = manager.input_sender();
    let task = tokio::spawn(run_timeline(manager, inputs_rx, responses_rx, shutdown_rx));
    TimelineHandle {
        inputs_tx,
        display_rx,
        task,
    }
}

async fn run_timeline<H: DomHost>(
    mut manager: TimelineManager<H>,
    mut inputs_rx: mpsc::UnboundedReceiver<TimelineInput>,
    mut responses_rx: mpsc::UnboundedReceiver<String>,
    mut shutdown_rx: ShutdownReceiver,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            input = inputs_rx.recv() => {
                let Some(input) = input else {
                    break;
                };
                manager.handle(input);
            }
            Some(frame) = responses_rx.recv() => {
                manager.handle(TimelineInput::BridgeFrame(frame));
            }
        }
    }
    tracing::debug!("Timeline actor stopped");
}
