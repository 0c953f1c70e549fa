use std::fs;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use prep_engine::{Clipboard, ClipboardError};

/// Terminal clipboard through the OSC 52 escape sequence.
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError::Unavailable(
                "stdout is not a terminal".to_string(),
            ));
        }
        let mut out = stdout.lock();
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| out.flush())
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))
    }
}

/// Writes copied content to a file; for sessions without a terminal.
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Clipboard for FileClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text).map_err(|err| match err.kind() {
            std::io::ErrorKind::PermissionDenied => ClipboardError::Denied(err.to_string()),
            _ => ClipboardError::Unavailable(err.to_string()),
        })
    }
}

pub fn clipboard_for(file: Option<PathBuf>) -> Box<dyn Clipboard> {
    match file {
        Some(path) => Box::new(FileClipboard::new(path)),
        None => Box::new(Osc52Clipboard),
    }
}

fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
