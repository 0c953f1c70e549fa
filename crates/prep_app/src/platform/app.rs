use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{bail, Context};
use prep_core::{update, AppState, AppViewModel, CopyControlView, FormField, Msg, Phase};
use prep_engine::{resolve_endpoint, Clipboard, EngineHandle, ExportWriter};
use prep_logging::{prep_info, prep_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::export::export_result;
use super::ui::render::TerminalRenderer;
use super::ui::result_pane::ResultPane;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub struct PrepareRequest {
    pub fields: Vec<FormField>,
    /// Copy this section once the result is shown.
    pub copy_section: Option<usize>,
    pub export: bool,
}

#[derive(Debug)]
pub struct PrepareReport {
    pub view: AppViewModel,
    pub export_path: Option<PathBuf>,
    pub copied: Option<CopyControlView>,
}

/// One form submission, start to finish: fill the form, submit, wait for the
/// result, optionally copy a section and export, then tear down.
pub fn run_prepare<W: Write>(
    config: &AppConfig,
    request: PrepareRequest,
    clipboard: Box<dyn Clipboard>,
    out: W,
) -> anyhow::Result<PrepareReport> {
    let endpoint = resolve_endpoint(&config.endpoint_mode, &config.page_host)?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let engine = EngineHandle::new(config.submit.clone());
    let runner = EffectRunner::new(engine, endpoint, msg_tx, clipboard, config.copy_format);
    let mut controller = Controller::new(
        AppState::new().with_progress_interval(config.progress_interval),
        runner,
        msg_rx,
        out,
    );

    for field in request.fields {
        controller.dispatch(Msg::FieldChanged {
            name: field.name,
            value: field.value,
        })?;
    }
    controller.dispatch(Msg::SubmitClicked)?;
    controller.run_until(|state| state.phase() == Phase::Done)?;

    let mut copied = None;
    if let Some(heading_index) = request.copy_section {
        if controller.pane.document().is_some() {
            let generation = controller.state.generation();
            controller.dispatch(Msg::CopyClicked {
                generation,
                heading_index,
            })?;
            controller.run_until(|state| {
                state
                    .view()
                    .copy_feedback
                    .iter()
                    .any(|(index, _)| *index == heading_index)
            })?;
            copied = Some(controller.state.view().copy_control(heading_index));
        } else {
            prep_warn!("no result to copy section {} from", heading_index);
        }
    }

    let view = controller.state.view();
    let export_path = if request.export {
        let writer = ExportWriter::new(config.output_dir.clone());
        export_result(&writer, &view, &controller.pane, controller.state.fields())
            .context("failed to export result")?
    } else {
        None
    };

    controller.dispatch(Msg::Teardown)?;
    Ok(PrepareReport {
        view,
        export_path,
        copied,
    })
}

struct Controller<W: Write> {
    state: AppState,
    runner: EffectRunner,
    pane: ResultPane,
    renderer: TerminalRenderer<W>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl<W: Write> Controller<W> {
    fn new(state: AppState, runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>, out: W) -> Self {
        Self {
            state,
            runner,
            pane: ResultPane::default(),
            renderer: TerminalRenderer::new(out),
            msg_rx,
        }
    }

    /// Effects still run when rendering fails.
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        let rendered = if self.state.consume_dirty() {
            let view = self.state.view();
            if self.pane.sync(&view.result) {
                prep_info!("result {} shown", view.generation);
            }
            self.renderer.render(&view, &self.pane)
        } else {
            Ok(())
        };
        self.runner.run(effects, &self.pane);
        rendered.context("failed to write to the terminal")
    }

    /// Pumps messages until `done` holds for the current state.
    fn run_until(&mut self, done: impl Fn(&AppState) -> bool) -> anyhow::Result<()> {
        while !done(&self.state) {
            self.runner.drain_engine_events();
            match self.msg_rx.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => self.dispatch(msg)?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => bail!("message channel closed"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{run_prepare, Controller, PrepareRequest};
    use crate::platform::config::AppConfig;
    use crate::platform::effects::EffectRunner;
    use pretty_assertions::assert_eq;
    use prep_core::{
        AppState, CopyControlState, FormField, Msg, Phase, ResultView, DEFAULT_SUBMIT_LABEL,
    };
    use prep_engine::{
        Clipboard, ClipboardError, CopyFormat, EndpointMode, EngineHandle, SubmitSettings,
    };
    use std::io::{self, Write};
    use std::sync::{mpsc, Arc, Mutex};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Clone, Default)]
    struct MemoryClipboard {
        copied: Arc<Mutex<Vec<String>>>,
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn start_server(response: ResponseTemplate) -> (tokio::runtime::Runtime, MockServer) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/prepare_meeting"))
                .respond_with(response)
                .mount(&server)
                .await;
            server
        });
        (runtime, server)
    }

    fn config_for(server: &MockServer, output_dir: &std::path::Path) -> AppConfig {
        AppConfig {
            endpoint_mode: EndpointMode::Relative {
                origin: server.uri(),
            },
            output_dir: output_dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    fn request(copy_section: Option<usize>) -> PrepareRequest {
        PrepareRequest {
            fields: vec![
                FormField::new("company_name", "Acme"),
                FormField::new("meeting_objective", "Kickoff"),
            ],
            copy_section,
            export: true,
        }
    }

    #[test]
    fn formatted_result_is_shown_and_exported() {
        let (_runtime, server) = start_server(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"result": "# Agenda\n- Item1\n- Item2"}),
        ));
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let report = run_prepare(
            &config_for(&server, dir.path()),
            request(None),
            Box::new(MemoryClipboard::default()),
            &mut out,
        )
        .unwrap();

        assert_eq!(report.view.phase, Phase::Done);
        assert!(!report.view.loading_visible);
        assert!(report.view.submit_enabled);
        assert_eq!(report.view.submit_label, DEFAULT_SUBMIT_LABEL);
        let ResultView::Content { html, .. } = &report.view.result else {
            panic!("expected content, got {:?}", report.view.result);
        };
        assert!(html.contains("<h1>Agenda</h1>"));
        assert_eq!(html.matches("<li>").count(), 2);

        let exported = std::fs::read_to_string(report.export_path.unwrap()).unwrap();
        assert!(exported.contains("<h1>Agenda</h1>"));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("- Item1"), "{printed}");
    }

    #[test]
    fn server_error_text_is_shown_verbatim() {
        let (_runtime, server) = start_server(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"error": "missing API key"})),
        );
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let report = run_prepare(
            &config_for(&server, dir.path()),
            request(None),
            Box::new(MemoryClipboard::default()),
            &mut out,
        )
        .unwrap();

        assert_eq!(
            report.view.result,
            ResultView::Error {
                message: "missing API key".to_string(),
                hint: prep_core::ERROR_HINT,
            }
        );
        assert!(report.view.submit_enabled);
        assert_eq!(report.view.submit_label, DEFAULT_SUBMIT_LABEL);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Error: missing API key"));
    }

    #[test]
    fn requested_section_is_copied() {
        let (_runtime, server) = start_server(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"html_result": "<h2>Brief</h2><p>b</p><h2>Agenda</h2><p>a</p>"}),
        ));
        let dir = tempfile::tempdir().unwrap();
        let clipboard = MemoryClipboard::default();

        let report = run_prepare(
            &config_for(&server, dir.path()),
            request(Some(1)),
            Box::new(clipboard.clone()),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(report.copied.unwrap().state, CopyControlState::Copied);
        assert_eq!(
            clipboard.copied.lock().unwrap().as_slice(),
            ["Agenda\n\na".to_string()]
        );
    }

    #[test]
    fn missing_section_reports_failed_copy() {
        let (_runtime, server) = start_server(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"html_result": "<h2>Only</h2>"}),
        ));
        let dir = tempfile::tempdir().unwrap();

        let report = run_prepare(
            &config_for(&server, dir.path()),
            request(Some(3)),
            Box::new(MemoryClipboard::default()),
            Vec::new(),
        )
        .unwrap();

        let copied = report.copied.unwrap();
        assert_eq!(copied.state, CopyControlState::Failed);
        assert_eq!(copied.detail.as_deref(), Some("no section with index 3"));
    }

    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn render_failure_keeps_the_updated_state() {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(
            EngineHandle::new(SubmitSettings::default()),
            Url::parse("http://localhost:5000/prepare_meeting").unwrap(),
            msg_tx,
            Box::new(MemoryClipboard::default()),
            CopyFormat::PlainText,
        );
        let mut controller = Controller::new(AppState::new(), runner, msg_rx, ClosedTerminal);

        let dispatched = controller.dispatch(Msg::FieldChanged {
            name: "company_name".to_string(),
            value: "Acme".to_string(),
        });

        assert!(dispatched.is_err());
        assert_eq!(
            controller.state.fields().to_vec(),
            vec![FormField::new("company_name", "Acme")]
        );
    }
}
