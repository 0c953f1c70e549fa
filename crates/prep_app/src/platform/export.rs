use std::path::PathBuf;

use chrono::Utc;
use prep_core::{AppViewModel, FormField, ResultView};
use prep_engine::{
    error_panel_html, render_result_page, result_filename, ExportWriter, PersistError, ResultPage,
};

use super::ui::result_pane::ResultPane;

pub const COMPANY_FIELD: &str = "company_name";

/// Writes the shown result (augmented content or error panel) as a standalone page.
/// Returns `None` when nothing is shown.
pub fn export_result(
    writer: &ExportWriter,
    view: &AppViewModel,
    pane: &ResultPane,
    fields: &[FormField],
) -> Result<Option<PathBuf>, PersistError> {
    let content_html = match &view.result {
        ResultView::Hidden => return Ok(None),
        ResultView::Error { message, hint } => error_panel_html(message, hint),
        ResultView::Content { html, .. } => pane
            .document()
            .map(|document| document.to_html())
            .unwrap_or_else(|| html.clone()),
    };

    let company_name = fields
        .iter()
        .find(|field| field.name == COMPANY_FIELD)
        .map(|field| field.value.as_str())
        .filter(|value| !value.trim().is_empty());
    let seed = fields
        .iter()
        .map(|field| field.value.as_str())
        .collect::<Vec<_>>()
        .join("\u{1f}");
    let generated_utc = Utc::now().to_rfc3339();

    let page = render_result_page(&ResultPage {
        company_name,
        content_html: &content_html,
        generated_utc: &generated_utc,
    });
    writer
        .write(&result_filename(company_name, &seed), &page)
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::export_result;
    use crate::platform::ui::result_pane::ResultPane;
    use prep_core::{AppViewModel, FormField, ResultView, ERROR_HINT};
    use prep_engine::ExportWriter;

    fn fields() -> Vec<FormField> {
        vec![
            FormField::new("company_name", "Acme Corp"),
            FormField::new("meeting_objective", "Renewal"),
        ]
    }

    #[test]
    fn content_export_keeps_copy_controls() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_path_buf());
        let result = ResultView::Content {
            html: "<h2>Agenda</h2><p>x</p>".to_string(),
            generation: 1,
        };
        let mut pane = ResultPane::default();
        pane.sync(&result);
        let view = AppViewModel {
            result,
            ..AppViewModel::default()
        };

        let path = export_result(&writer, &view, &pane, &fields())
            .unwrap()
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Acme_Corp--"), "{name}");

        let page = std::fs::read_to_string(path).unwrap();
        assert!(page.contains("data-copy-section"));
        assert!(page.contains("value=\"Acme Corp\""));
    }

    #[test]
    fn error_export_uses_error_panel() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_path_buf());
        let view = AppViewModel {
            result: ResultView::Error {
                message: "missing API key".to_string(),
                hint: ERROR_HINT,
            },
            ..AppViewModel::default()
        };

        let path = export_result(&writer, &view, &ResultPane::default(), &fields())
            .unwrap()
            .unwrap();
        let page = std::fs::read_to_string(path).unwrap();
        assert!(page.contains("<p class=\"error-message\">missing API key</p>"));
    }

    #[test]
    fn nothing_shown_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_path_buf());
        let exported =
            export_result(&writer, &AppViewModel::default(), &ResultPane::default(), &fields())
                .unwrap();
        assert!(exported.is_none());
    }
}
