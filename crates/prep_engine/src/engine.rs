use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use url::Url;

use prep_logging::{prep_error, prep_info, prep_warn};

use crate::format::render_response;
use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{EngineEvent, FailureKind, FormData, Generation, RenderedResult, SubmitError};

enum EngineCommand {
    Submit {
        generation: Generation,
        endpoint: Url,
        form: FormData,
    },
}

/// Background submission worker: one thread owning a tokio runtime.
///
/// Dropping the handle (or calling [`EngineHandle::shutdown`]) cancels every
/// in-flight submission; cancelled submissions emit no event. Every other
/// submission ends with exactly one `SubmissionCompleted`, a panicking
/// submitter or a dead worker included.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    /// Lets `submit` report a failure when the worker is gone.
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings) -> Self {
        Self::with_submitter(Arc::new(ReqwestSubmitter::new(settings)))
    }

    pub fn with_submitter(submitter: Arc<dyn Submitter>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let worker_events = event_tx.clone();
        thread::spawn(move || {
            let event_tx = worker_events;
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    prep_error!("failed to start engine runtime: {}", err);
                    let message = format!("engine runtime unavailable: {err}");
                    while let Ok(EngineCommand::Submit { generation, .. }) = cmd_rx.recv() {
                        let _ = event_tx.send(failed(generation, message.clone()));
                    }
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                if worker_cancel.is_cancelled() {
                    break;
                }
                let EngineCommand::Submit {
                    generation,
                    endpoint,
                    form,
                } = command;
                let submitter = submitter.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.clone();
                runtime.spawn(async move {
                    let submission = run_submission(submitter.as_ref(), generation, endpoint, form);
                    let task = AssertUnwindSafe(submission).catch_unwind();
                    match cancel.run_until_cancelled(task).await {
                        Some(Ok(event)) => {
                            let _ = event_tx.send(event);
                        }
                        Some(Err(_)) => {
                            prep_error!("submission {} panicked", generation);
                            let _ = event_tx.send(failed(generation, "submission task panicked"));
                        }
                        None => prep_info!("submission cancelled"),
                    }
                });
            }
            runtime.shutdown_timeout(Duration::from_millis(100));
        });

        Self {
            cmd_tx,
            event_tx,
            event_rx,
            cancel,
        }
    }

    pub fn submit(&self, generation: Generation, endpoint: Url, form: FormData) {
        if self.cancel.is_cancelled() {
            prep_warn!("engine is shut down; dropping submission {}", generation);
            return;
        }
        let sent = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            endpoint,
            form,
        });
        if let Err(mpsc::SendError(EngineCommand::Submit { generation, .. })) = sent {
            prep_error!("engine worker is gone; failing submission {}", generation);
            let _ = self
                .event_tx
                .send(failed(generation, "submission engine is not running"));
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_submission(
    submitter: &dyn Submitter,
    generation: Generation,
    endpoint: Url,
    form: FormData,
) -> EngineEvent {
    let result: Result<RenderedResult, SubmitError> = submitter
        .submit(&endpoint, &form)
        .await
        .map(|response| render_response(&response));
    match &result {
        Ok(rendered) => prep_info!(
            "submission {} rendered ({:?}, {} bytes)",
            generation,
            rendered.source,
            rendered.html.len()
        ),
        Err(err) => prep_warn!("submission {} failed: {} ({})", generation, err, err.kind),
    }
    EngineEvent::SubmissionCompleted { generation, result }
}

fn failed(generation: Generation, message: impl Into<String>) -> EngineEvent {
    EngineEvent::SubmissionCompleted {
        generation,
        result: Err(SubmitError::new(FailureKind::Network, message)),
    }
}
