use std::collections::BTreeSet;
use std::io::{self, Write};

use prep_core::{AppViewModel, ResultView};

use super::result_pane::ResultPane;

/// Terminal lines for the parts of `view` that changed since `previous`.
pub fn render(
    previous: Option<&AppViewModel>,
    view: &AppViewModel,
    pane: &ResultPane,
) -> Vec<String> {
    let mut lines = Vec::new();

    let submit_changed = previous.is_none_or(|prev| {
        prev.submit_enabled != view.submit_enabled || prev.submit_label != view.submit_label
    });
    if submit_changed {
        let state = if view.submit_enabled { "ready" } else { "disabled" };
        lines.push(format!("[{}] ({state})", view.submit_label));
    }

    let loading_changed = previous.is_none_or(|prev| {
        !prev.loading_visible || prev.loading_text != view.loading_text
    });
    if view.loading_visible && loading_changed {
        lines.push(format!("  {}", view.loading_text));
    }

    let result_changed = previous.is_none_or(|prev| prev.result != view.result);
    if result_changed {
        lines.extend(render_result(view, pane));
    } else {
        lines.extend(render_copy_feedback(previous, view));
    }

    lines
}

fn render_result(view: &AppViewModel, pane: &ResultPane) -> Vec<String> {
    match &view.result {
        ResultView::Hidden => Vec::new(),
        ResultView::Error { message, hint } => {
            vec![format!("Error: {message}"), format!("  {hint}")]
        }
        ResultView::Content { .. } => {
            let Some(document) = pane.document() else {
                return Vec::new();
            };
            let mut lines = vec!["Result:".to_string()];
            for heading in document.headings() {
                let control = view.copy_control(heading.index);
                lines.push(format!("  [{}] {} ({})", heading.index, heading.label, control.label));
            }
            lines.push(String::new());
            lines.extend(document.plain_text().lines().map(str::to_string));
            lines
        }
    }
}

fn render_copy_feedback(previous: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let indices: BTreeSet<usize> = previous
        .into_iter()
        .flat_map(|prev| prev.copy_feedback.iter())
        .chain(view.copy_feedback.iter())
        .map(|(index, _)| *index)
        .collect();

    indices
        .into_iter()
        .filter_map(|index| {
            let control = view.copy_control(index);
            let unchanged = previous.is_some_and(|prev| prev.copy_control(index) == control);
            if unchanged {
                return None;
            }
            Some(match control.detail {
                Some(detail) => format!("  [{index}] {}: {detail}", control.label),
                None => format!("  [{index}] {}", control.label),
            })
        })
        .collect()
}

/// Writes rendered lines, remembering the last view for diffing.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: Option<AppViewModel>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn render(&mut self, view: &AppViewModel, pane: &ResultPane) -> io::Result<()> {
        for line in render(self.last.as_ref(), view, pane) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last = Some(view.clone());
        Ok(())
    }
}
