use prep_core::{Generation, ResultView};
use prep_engine::ResultDocument;
use prep_logging::prep_debug;

/// The `#resultContent` slot: holds the augmented document of the result on screen.
#[derive(Default)]
pub struct ResultPane {
    current: Option<(Generation, ResultDocument)>,
}

impl ResultPane {
    /// Mirrors the view's result slot. A result is parsed and augmented once,
    /// when it first appears; returns `true` in that case.
    pub fn sync(&mut self, result: &ResultView) -> bool {
        match result {
            ResultView::Content { html, generation } => {
                if self.generation() == Some(*generation) {
                    return false;
                }
                let mut document = ResultDocument::parse(html);
                let controls = document.augment();
                prep_debug!(
                    "result {} injected with {} copy controls",
                    generation,
                    controls
                );
                self.current = Some((*generation, document));
                true
            }
            ResultView::Hidden | ResultView::Error { .. } => {
                self.current = None;
                false
            }
        }
    }

    pub fn generation(&self) -> Option<Generation> {
        self.current.as_ref().map(|(generation, _)| *generation)
    }

    pub fn document(&self) -> Option<&ResultDocument> {
        self.current.as_ref().map(|(_, document)| document)
    }

    /// The document, only while it still belongs to `generation`.
    pub fn document_for(&self, generation: Generation) -> Option<&ResultDocument> {
        self.current
            .as_ref()
            .filter(|(current, _)| *current == generation)
            .map(|(_, document)| document)
    }
}
