use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited a form field.
    FieldChanged { name: String, value: String },
    /// User submitted the meeting-details form.
    SubmitClicked,
    /// Progress timer fired for a submission.
    ProgressTick { generation: Generation },
    /// Backend answered with a renderable result (server HTML or formatted text).
    SubmissionSucceeded { generation: Generation, html: String },
    /// Transport failure, non-2xx status or malformed response.
    SubmissionFailed {
        generation: Generation,
        message: String,
    },
    /// User clicked the copy control of a section heading.
    CopyClicked {
        generation: Generation,
        heading_index: usize,
    },
    /// Clipboard write finished.
    CopyFinished {
        generation: Generation,
        heading_index: usize,
        outcome: Result<(), String>,
    },
    /// The copy feedback period elapsed.
    CopyFeedbackExpired {
        generation: Generation,
        heading_index: usize,
        token: u64,
    },
    /// The controller is being torn down.
    Teardown,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
