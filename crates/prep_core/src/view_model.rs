use crate::{CopyFeedback, Generation, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Hidden,
    Content {
        html: String,
        generation: Generation,
    },
    Error {
        message: String,
        hint: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub generation: Generation,
    pub submit_label: String,
    pub submit_enabled: bool,
    pub loading_visible: bool,
    pub loading_text: String,
    pub result: ResultView,
    /// Feedback for controls that are not in their idle state, by heading index.
    pub copy_feedback: Vec<(usize, CopyFeedback)>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyControlState {
    Idle,
    Copied,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyControlView {
    pub heading_index: usize,
    pub state: CopyControlState,
    pub label: &'static str,
    pub detail: Option<String>,
}

impl AppViewModel {
    pub fn copy_control(&self, heading_index: usize) -> CopyControlView {
        let feedback = self
            .copy_feedback
            .iter()
            .find(|(index, _)| *index == heading_index)
            .map(|(_, feedback)| feedback);
        match feedback {
            None => CopyControlView {
                heading_index,
                state: CopyControlState::Idle,
                label: "Copy",
                detail: None,
            },
            Some(CopyFeedback::Copied) => CopyControlView {
                heading_index,
                state: CopyControlState::Copied,
                label: "Copied",
                detail: None,
            },
            Some(CopyFeedback::Failed(reason)) => CopyControlView {
                heading_index,
                state: CopyControlState::Failed,
                label: "Copy failed",
                detail: Some(reason.clone()),
            },
        }
    }
}
