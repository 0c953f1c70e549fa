use crate::{AppState, CopyFeedback, Effect, Generation, Msg, Phase, ResultPanel};
use crate::COPY_FEEDBACK_DURATION;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.phase() == Phase::TornDown {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::FieldChanged { name, value } => {
            state.set_field(name, value);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // One request at a time; the disabled submit control is not the only guard.
            if state.phase() == Phase::Submitting {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(3);
            if let Some(previous) = state.take_active_timer() {
                effects.push(Effect::CancelProgressTimer {
                    generation: previous,
                });
            }
            let generation = state.begin_submission();
            effects.push(Effect::StartProgressTimer {
                generation,
                interval: state.progress_interval(),
            });
            effects.push(Effect::SendSubmission {
                generation,
                fields: state.fields().to_vec(),
            });
            effects
        }
        Msg::ProgressTick { generation } => {
            let live = state.is_current(generation)
                && state.phase() == Phase::Submitting
                && state.active_timer() == Some(generation);
            if !live || state.advance_progress() {
                Vec::new()
            } else {
                state.take_active_timer();
                vec![Effect::CancelProgressTimer { generation }]
            }
        }
        Msg::SubmissionSucceeded { generation, html } => {
            complete(&mut state, generation, ResultPanel::Content { html })
        }
        Msg::SubmissionFailed {
            generation,
            message,
        } => complete(&mut state, generation, ResultPanel::Error { message }),
        Msg::CopyClicked {
            generation,
            heading_index,
        } => {
            if state.is_current(generation) && state.has_content() {
                vec![Effect::CopySection {
                    generation,
                    heading_index,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::CopyFinished {
            generation,
            heading_index,
            outcome,
        } => {
            if state.is_current(generation) && state.has_content() {
                let feedback = match outcome {
                    Ok(()) => CopyFeedback::Copied,
                    Err(reason) => CopyFeedback::Failed(reason),
                };
                let token = state.set_copy_feedback(heading_index, feedback);
                vec![Effect::ScheduleCopyFeedbackReset {
                    generation,
                    heading_index,
                    token,
                    after: COPY_FEEDBACK_DURATION,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::CopyFeedbackExpired {
            generation,
            heading_index,
            token,
        } => {
            if state.is_current(generation) {
                state.expire_copy_feedback(heading_index, token);
            }
            Vec::new()
        }
        Msg::Teardown => {
            let mut effects = Vec::with_capacity(2);
            if let Some(generation) = state.take_active_timer() {
                effects.push(Effect::CancelProgressTimer { generation });
            }
            state.tear_down();
            effects.push(Effect::Shutdown);
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn complete(state: &mut AppState, generation: Generation, result: ResultPanel) -> Vec<Effect> {
    if !state.is_current(generation) || state.phase() != Phase::Submitting {
        return Vec::new();
    }
    let mut effects = Vec::with_capacity(1);
    if let Some(timer) = state.take_active_timer() {
        effects.push(Effect::CancelProgressTimer { generation: timer });
    }
    state.finish_submission(result);
    effects
}
