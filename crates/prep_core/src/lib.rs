//! Meeting prep core: pure submission state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, CopyFeedback, FormField, Generation, Phase, ResultPanel, COPY_FEEDBACK_DURATION,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_SUBMIT_LABEL, ERROR_HINT, INITIAL_LOADING_TEXT,
    PROCESSING_LABEL, PROGRESS_STEPS,
};
pub use update::update;
pub use view_model::{AppViewModel, CopyControlState, CopyControlView, ResultView};
