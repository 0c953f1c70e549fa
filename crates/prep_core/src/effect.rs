use std::time::Duration;

use crate::{FormField, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the cosmetic status-text rotation for a submission.
    StartProgressTimer {
        generation: Generation,
        interval: Duration,
    },
    CancelProgressTimer {
        generation: Generation,
    },
    /// POST the form to the backend.
    SendSubmission {
        generation: Generation,
        fields: Vec<FormField>,
    },
    /// Copy one section of the rendered result to the clipboard.
    CopySection {
        generation: Generation,
        heading_index: usize,
    },
    ScheduleCopyFeedbackReset {
        generation: Generation,
        heading_index: usize,
        token: u64,
        after: Duration,
    },
    /// Stop the engine; in-flight submissions are dropped.
    Shutdown,
}
