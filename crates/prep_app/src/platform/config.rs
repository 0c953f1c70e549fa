use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use prep_core::DEFAULT_PROGRESS_INTERVAL;
use prep_engine::{
    CopyFormat, EndpointMode, SubmitSettings, DEFAULT_LOCAL_BASE, DEFAULT_REMOTE_BASE, LOCAL_HOST,
};
use prep_logging::{prep_info, prep_warn, LogDestination};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {0:?} not found")]
    Missing(PathBuf),
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PersistedEndpointMode {
    AbsoluteByHost,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PersistedCopyFormat {
    PlainText,
    HtmlStripped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PersistedLogDestination {
    Terminal,
    File,
    Both,
    Off,
}

/// On-disk shape of `meeting_prep.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConfig {
    endpoint_mode: PersistedEndpointMode,
    local_base: String,
    remote_base: String,
    /// Page origin for the relative mode; derived from `page_host` when absent.
    origin: Option<String>,
    page_host: String,
    copy_format: PersistedCopyFormat,
    progress_interval_secs: u64,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
    max_response_bytes: u64,
    output_dir: PathBuf,
    log_destination: PersistedLogDestination,
    log_file: Option<PathBuf>,
    /// Copy into this file instead of the terminal clipboard.
    clipboard_file: Option<PathBuf>,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        let submit = SubmitSettings::default();
        Self {
            endpoint_mode: PersistedEndpointMode::AbsoluteByHost,
            local_base: DEFAULT_LOCAL_BASE.to_string(),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            origin: None,
            page_host: LOCAL_HOST.to_string(),
            copy_format: PersistedCopyFormat::PlainText,
            progress_interval_secs: DEFAULT_PROGRESS_INTERVAL.as_secs(),
            connect_timeout_secs: submit.connect_timeout.as_secs(),
            request_timeout_secs: submit.request_timeout.as_secs(),
            max_response_bytes: submit.max_bytes,
            output_dir: PathBuf::from("output"),
            log_destination: PersistedLogDestination::Terminal,
            log_file: None,
            clipboard_file: None,
        }
    }
}

impl PersistedConfig {
    pub fn log_destination(&self) -> LogDestination {
        match self.log_destination {
            PersistedLogDestination::Terminal => LogDestination::Terminal,
            PersistedLogDestination::File => LogDestination::File,
            PersistedLogDestination::Both => LogDestination::Both,
            PersistedLogDestination::Off => LogDestination::Off,
        }
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint_mode: EndpointMode,
    pub page_host: String,
    pub copy_format: CopyFormat,
    pub progress_interval: Duration,
    pub submit: SubmitSettings,
    pub output_dir: PathBuf,
    pub clipboard_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from(PersistedConfig::default())
    }
}

impl From<PersistedConfig> for AppConfig {
    fn from(persisted: PersistedConfig) -> Self {
        let endpoint_mode = match persisted.endpoint_mode {
            PersistedEndpointMode::AbsoluteByHost => EndpointMode::AbsoluteByHost {
                local_base: persisted.local_base,
                remote_base: persisted.remote_base,
            },
            PersistedEndpointMode::Relative => EndpointMode::Relative {
                origin: persisted
                    .origin
                    .unwrap_or_else(|| format!("http://{}", persisted.page_host)),
            },
        };
        let copy_format = match persisted.copy_format {
            PersistedCopyFormat::PlainText => CopyFormat::PlainText,
            PersistedCopyFormat::HtmlStripped => CopyFormat::HtmlStripped,
        };
        Self {
            endpoint_mode,
            page_host: persisted.page_host,
            copy_format,
            // A zero interval would spin the progress timer.
            progress_interval: Duration::from_secs(persisted.progress_interval_secs.max(1)),
            submit: SubmitSettings {
                connect_timeout: Duration::from_secs(persisted.connect_timeout_secs),
                request_timeout: Duration::from_secs(persisted.request_timeout_secs),
                max_bytes: persisted.max_response_bytes,
            },
            output_dir: persisted.output_dir,
            clipboard_file: persisted.clipboard_file,
        }
    }
}

pub fn read_config(path: &Path) -> Result<PersistedConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Falls back to defaults when the file could not be used. Call after the
/// logger is up so the fallback is reported.
pub fn resolve_config(loaded: Result<PersistedConfig, ConfigError>) -> AppConfig {
    match loaded {
        Ok(persisted) => AppConfig::from(persisted),
        Err(ConfigError::Missing(path)) => {
            prep_info!("No config at {:?}; using defaults", path);
            AppConfig::default()
        }
        Err(err) => {
            prep_warn!("{}; using defaults", err);
            AppConfig::default()
        }
    }
}

pub fn default_config_ron() -> Result<String, ron::Error> {
    ron::ser::to_string_pretty(&PersistedConfig::default(), ron::ser::PrettyConfig::new())
}
