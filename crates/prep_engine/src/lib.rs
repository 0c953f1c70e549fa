//! Meeting prep engine: result rendering, section copy and backend IO.
mod clipboard;
mod decode;
mod endpoint;
mod engine;
mod filename;
mod format;
mod page;
mod persist;
mod sections;
mod submit;
mod types;

pub use clipboard::{Clipboard, ClipboardError};
pub use decode::{decode_body, DecodeError, DecodedBody};
pub use endpoint::{
    resolve_endpoint, EndpointError, EndpointMode, DEFAULT_LOCAL_BASE, DEFAULT_REMOTE_BASE,
    LOCAL_HOST, PREPARE_MEETING_PATH,
};
pub use engine::EngineHandle;
pub use filename::result_filename;
pub use format::{format_markup, format_result, render_response, NO_RESULTS_PLACEHOLDER};
pub use page::{error_panel_html, escape_html, render_result_page, ResultPage};
pub use persist::{ensure_output_dir, ExportWriter, PersistError};
pub use sections::{
    copy_section, CopyError, CopyFormat, ResultDocument, SectionHeading, COPY_CONTROL_ATTR,
};
pub use submit::{ReqwestSubmitter, SubmitSettings, Submitter};
pub use types::{
    EngineEvent, FailureKind, FormData, Generation, PrepareResponse, RenderedResult,
    ResultSource, SubmitError,
};
