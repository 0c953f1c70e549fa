use std::time::Duration;

use prep_core::{update, AppState, CopyControlState, Effect, Msg};

fn rendered_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmissionSucceeded {
            generation: 1,
            html: "<h2>A</h2><p>a</p><h2>B</h2><p>b</p>".to_string(),
        },
    );
    state
}

fn finish_copy(
    state: AppState,
    heading_index: usize,
    outcome: Result<(), String>,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::CopyFinished {
            generation: 1,
            heading_index,
            outcome,
        },
    )
}

#[test]
fn copy_click_emits_copy_effect_for_current_render() {
    let state = rendered_state();
    let (_state, effects) = update(
        state,
        Msg::CopyClicked {
            generation: 1,
            heading_index: 1,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::CopySection {
            generation: 1,
            heading_index: 1
        }]
    );
}

#[test]
fn copy_click_without_content_is_ignored() {
    let (state, _) = update(AppState::new(), Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmissionFailed {
            generation: 1,
            message: "nope".to_string(),
        },
    );
    let (_state, effects) = update(
        state,
        Msg::CopyClicked {
            generation: 1,
            heading_index: 0,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn copied_feedback_reverts_after_reset() {
    let (state, effects) = finish_copy(rendered_state(), 0, Ok(()));
    let token = match effects.as_slice() {
        [Effect::ScheduleCopyFeedbackReset {
            generation: 1,
            heading_index: 0,
            token,
            after,
        }] => {
            assert_eq!(*after, Duration::from_secs(2));
            *token
        }
        other => panic!("unexpected effects: {other:?}"),
    };

    let control = state.view().copy_control(0);
    assert_eq!(control.state, CopyControlState::Copied);
    assert_eq!(control.label, "Copied");
    assert_eq!(state.view().copy_control(1).state, CopyControlState::Idle);

    let (state, _) = update(
        state,
        Msg::CopyFeedbackExpired {
            generation: 1,
            heading_index: 0,
            token,
        },
    );
    assert_eq!(state.view().copy_control(0).state, CopyControlState::Idle);
    assert_eq!(state.view().copy_control(0).label, "Copy");
}

#[test]
fn clipboard_failure_is_surfaced() {
    let (state, _) = finish_copy(rendered_state(), 1, Err("clipboard unavailable".to_string()));
    let control = state.view().copy_control(1);
    assert_eq!(control.state, CopyControlState::Failed);
    assert_eq!(control.detail.as_deref(), Some("clipboard unavailable"));
}

#[test]
fn older_reset_does_not_revert_newer_feedback() {
    let (state, first) = finish_copy(rendered_state(), 0, Ok(()));
    let (state, _second) = finish_copy(state, 0, Ok(()));
    let stale_token = match first.as_slice() {
        [Effect::ScheduleCopyFeedbackReset { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, _) = update(
        state,
        Msg::CopyFeedbackExpired {
            generation: 1,
            heading_index: 0,
            token: stale_token,
        },
    );
    assert_eq!(state.view().copy_control(0).state, CopyControlState::Copied);
}

#[test]
fn resubmission_clears_copy_feedback() {
    let (state, _) = finish_copy(rendered_state(), 0, Ok(()));
    let (state, _) = update(state, Msg::SubmitClicked);
    assert!(state.view().copy_feedback.is_empty());
}
