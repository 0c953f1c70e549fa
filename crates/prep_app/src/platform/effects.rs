use std::collections::HashMap;
use std::sync::mpsc;

use prep_core::{Effect, Generation, Msg};
use prep_engine::{copy_section, Clipboard, CopyFormat, EngineEvent, EngineHandle, FormData};
use prep_logging::{prep_debug, prep_info, prep_warn};
use url::Url;

use super::timers::{schedule_once, ProgressTimer};
use super::ui::result_pane::ResultPane;

/// Executes effects produced by `update` and feeds their outcomes back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    endpoint: Url,
    msg_tx: mpsc::Sender<Msg>,
    timers: HashMap<Generation, ProgressTimer>,
    clipboard: Box<dyn Clipboard>,
    copy_format: CopyFormat,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        endpoint: Url,
        msg_tx: mpsc::Sender<Msg>,
        clipboard: Box<dyn Clipboard>,
        copy_format: CopyFormat,
    ) -> Self {
        Self {
            engine,
            endpoint,
            msg_tx,
            timers: HashMap::new(),
            clipboard,
            copy_format,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>, pane: &ResultPane) {
        for effect in effects {
            match effect {
                Effect::StartProgressTimer {
                    generation,
                    interval,
                } => {
                    prep_debug!("progress timer {} every {:?}", generation, interval);
                    let timer = ProgressTimer::start(generation, interval, self.msg_tx.clone());
                    if let Some(previous) = self.timers.insert(generation, timer) {
                        previous.cancel();
                    }
                }
                Effect::CancelProgressTimer { generation } => {
                    if let Some(timer) = self.timers.remove(&generation) {
                        prep_debug!("progress timer {} cancelled", generation);
                        timer.cancel();
                    }
                }
                Effect::SendSubmission { generation, fields } => {
                    let form: FormData = fields
                        .into_iter()
                        .map(|field| (field.name, field.value))
                        .collect();
                    prep_info!(
                        "submission {} -> {} ({} fields)",
                        generation,
                        self.endpoint,
                        form.len()
                    );
                    self.engine.submit(generation, self.endpoint.clone(), form);
                }
                Effect::CopySection {
                    generation,
                    heading_index,
                } => {
                    let outcome = match pane.document_for(generation) {
                        Some(document) => copy_section(
                            document,
                            heading_index,
                            self.copy_format,
                            self.clipboard.as_ref(),
                        )
                        .map(|_| ())
                        .map_err(|err| {
                            prep_warn!("copy of section {} failed: {}", heading_index, err);
                            err.to_string()
                        }),
                        None => Err("result is no longer displayed".to_string()),
                    };
                    let _ = self.msg_tx.send(Msg::CopyFinished {
                        generation,
                        heading_index,
                        outcome,
                    });
                }
                Effect::ScheduleCopyFeedbackReset {
                    generation,
                    heading_index,
                    token,
                    after,
                } => schedule_once(
                    after,
                    self.msg_tx.clone(),
                    Msg::CopyFeedbackExpired {
                        generation,
                        heading_index,
                        token,
                    },
                ),
                Effect::Shutdown => {
                    prep_info!("shutting down engine");
                    for (_, timer) in self.timers.drain() {
                        timer.cancel();
                    }
                    self.engine.shutdown();
                }
            }
        }
    }

    /// Forwards finished submissions to the message channel.
    pub fn drain_engine_events(&self) {
        while let Some(event) = self.engine.try_recv() {
            let msg = match event {
                EngineEvent::SubmissionCompleted { generation, result } => match result {
                    Ok(rendered) => Msg::SubmissionSucceeded {
                        generation,
                        html: rendered.html,
                    },
                    Err(err) => Msg::SubmissionFailed {
                        generation,
                        message: err.message,
                    },
                },
            };
            let _ = self.msg_tx.send(msg);
        }
    }
}
