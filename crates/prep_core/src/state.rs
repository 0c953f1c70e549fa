use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{AppViewModel, ResultView};

/// Render generation; bumped once per submission.
pub type Generation = u64;

pub const PROGRESS_STEPS: [&str; 5] = [
    "Analyzing company information...",
    "Researching industry trends...",
    "Creating meeting strategy and agenda...",
    "Generating executive brief...",
    "Finalizing meeting preparation materials...",
];

pub const INITIAL_LOADING_TEXT: &str = "Preparing your meeting materials...";
pub const DEFAULT_SUBMIT_LABEL: &str = "Prepare Meeting";
pub const PROCESSING_LABEL: &str = "Processing...";
pub const ERROR_HINT: &str =
    "Please check that you've set up the required API keys in your .env file.";
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(12);
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Done,
    TornDown,
}

/// The single result slot. A new submission replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultPanel {
    #[default]
    Hidden,
    Content {
        html: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyFeedback {
    Copied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FeedbackEntry {
    feedback: CopyFeedback,
    token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    phase: Phase,
    generation: Generation,
    fields: Vec<FormField>,
    submit_label: String,
    progress_interval: Duration,
    progress_step: usize,
    loading_text: String,
    active_timer: Option<Generation>,
    result: ResultPanel,
    copy_feedback: BTreeMap<usize, FeedbackEntry>,
    next_feedback_token: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            fields: Vec::new(),
            submit_label: DEFAULT_SUBMIT_LABEL.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_step: 0,
            loading_text: INITIAL_LOADING_TEXT.to_string(),
            active_timer: None,
            result: ResultPanel::Hidden,
            copy_feedback: BTreeMap::new(),
            next_feedback_token: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn view(&self) -> AppViewModel {
        let submitting = self.phase == Phase::Submitting;
        let result = match &self.result {
            ResultPanel::Hidden => ResultView::Hidden,
            ResultPanel::Content { html } => ResultView::Content {
                html: html.clone(),
                generation: self.generation,
            },
            ResultPanel::Error { message } => ResultView::Error {
                message: message.clone(),
                hint: ERROR_HINT,
            },
        };
        AppViewModel {
            phase: self.phase,
            generation: self.generation,
            submit_label: if submitting {
                PROCESSING_LABEL.to_string()
            } else {
                self.submit_label.clone()
            },
            submit_enabled: matches!(self.phase, Phase::Idle | Phase::Done),
            loading_visible: submitting,
            loading_text: self.loading_text.clone(),
            result,
            copy_feedback: self
                .copy_feedback
                .iter()
                .map(|(index, entry)| (*index, entry.feedback.clone()))
                .collect(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    pub fn active_timer(&self) -> Option<Generation> {
        self.active_timer
    }

    pub fn result(&self) -> &ResultPanel {
        &self.result
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub(crate) fn has_content(&self) -> bool {
        matches!(self.result, ResultPanel::Content { .. })
    }

    /// Sets a field value, keeping the original field order.
    pub(crate) fn set_field(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField { name, value }),
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_submission(&mut self) -> Generation {
        self.generation += 1;
        self.phase = Phase::Submitting;
        self.progress_step = 0;
        self.loading_text = INITIAL_LOADING_TEXT.to_string();
        self.active_timer = Some(self.generation);
        self.result = ResultPanel::Hidden;
        self.copy_feedback.clear();
        self.mark_dirty();
        self.generation
    }

    /// Shows the next status text. Returns `false` once every step was shown.
    pub(crate) fn advance_progress(&mut self) -> bool {
        match PROGRESS_STEPS.get(self.progress_step) {
            Some(text) => {
                self.loading_text = (*text).to_string();
                self.progress_step += 1;
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_active_timer(&mut self) -> Option<Generation> {
        self.active_timer.take()
    }

    pub(crate) fn finish_submission(&mut self, result: ResultPanel) {
        self.phase = Phase::Done;
        self.result = result;
        self.mark_dirty();
    }

    pub(crate) fn set_copy_feedback(
        &mut self,
        heading_index: usize,
        feedback: CopyFeedback,
    ) -> u64 {
        self.next_feedback_token += 1;
        let token = self.next_feedback_token;
        self.copy_feedback
            .insert(heading_index, FeedbackEntry { feedback, token });
        self.mark_dirty();
        token
    }

    /// Reverts a control only if no newer feedback replaced the one that expired.
    pub(crate) fn expire_copy_feedback(&mut self, heading_index: usize, token: u64) {
        let matches = self
            .copy_feedback
            .get(&heading_index)
            .is_some_and(|entry| entry.token == token);
        if matches {
            self.copy_feedback.remove(&heading_index);
            self.mark_dirty();
        }
    }

    pub(crate) fn tear_down(&mut self) {
        self.phase = Phase::TornDown;
        self.active_timer = None;
        self.mark_dirty();
    }
}
