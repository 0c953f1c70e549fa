use url::Url;

pub const PREPARE_MEETING_PATH: &str = "prepare_meeting";
pub const LOCAL_HOST: &str = "localhost";
pub const DEFAULT_LOCAL_BASE: &str = "http://localhost:5000";
pub const DEFAULT_REMOTE_BASE: &str = "https://meeting-preparation-agent-drollagents.onrender.com";

/// How the backend address is derived from the page the form lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointMode {
    /// A page served from `localhost` talks to `local_base`; anything else to `remote_base`.
    AbsoluteByHost {
        local_base: String,
        remote_base: String,
    },
    /// `/prepare_meeting` on the page's own origin.
    Relative { origin: String },
}

impl Default for EndpointMode {
    fn default() -> Self {
        Self::AbsoluteByHost {
            local_base: DEFAULT_LOCAL_BASE.to_string(),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid endpoint url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

pub fn resolve_endpoint(mode: &EndpointMode, page_host: &str) -> Result<Url, EndpointError> {
    match mode {
        EndpointMode::AbsoluteByHost {
            local_base,
            remote_base,
        } => {
            let base = if page_host.eq_ignore_ascii_case(LOCAL_HOST) {
                local_base
            } else {
                remote_base
            };
            let raw = format!("{}/{PREPARE_MEETING_PATH}", base.trim_end_matches('/'));
            Url::parse(&raw).map_err(|err| EndpointError::InvalidUrl {
                url: raw.clone(),
                message: err.to_string(),
            })
        }
        EndpointMode::Relative { origin } => {
            let invalid = |message: String| EndpointError::InvalidUrl {
                url: origin.clone(),
                message,
            };
            let origin_url = Url::parse(origin).map_err(|err| invalid(err.to_string()))?;
            origin_url
                .join(&format!("/{PREPARE_MEETING_PATH}"))
                .map_err(|err| invalid(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_endpoint, EndpointMode};

    #[test]
    fn localhost_page_targets_local_backend() {
        let url = resolve_endpoint(&EndpointMode::default(), "localhost").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/prepare_meeting");
    }

    #[test]
    fn other_hosts_target_remote_backend() {
        let url = resolve_endpoint(&EndpointMode::default(), "prep.example.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://meeting-preparation-agent-drollagents.onrender.com/prepare_meeting"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let mode = EndpointMode::AbsoluteByHost {
            local_base: "http://127.0.0.1:8000/".to_string(),
            remote_base: "https://unused.example".to_string(),
        };
        let url = resolve_endpoint(&mode, "localhost").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/prepare_meeting");
    }

    #[test]
    fn relative_mode_resolves_against_origin_root() {
        let mode = EndpointMode::Relative {
            origin: "https://prep.example.com/app/index.html".to_string(),
        };
        let url = resolve_endpoint(&mode, "ignored").unwrap();
        assert_eq!(url.as_str(), "https://prep.example.com/prepare_meeting");
    }

    #[test]
    fn garbage_base_is_rejected() {
        let mode = EndpointMode::Relative {
            origin: "not a url".to_string(),
        };
        assert!(resolve_endpoint(&mode, "localhost").is_err());
    }
}
