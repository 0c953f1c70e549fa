use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use prep_logging::{prep_debug, prep_info, prep_warn};

use crate::decode::decode_body;
use crate::{FailureKind, FormData, PrepareResponse, SubmitError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSettings {
    pub connect_timeout: Duration,
    /// Whole-request budget; the backend runs several model calls per submission.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        endpoint: &Url,
        form: &FormData,
    ) -> Result<PrepareResponse, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<BytesMut, SubmitError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        endpoint: &Url,
        form: &FormData,
    ) -> Result<PrepareResponse, SubmitError> {
        if form.is_empty() {
            prep_warn!("submitting an empty form to {}", endpoint);
        }
        let client = self.build_client()?;
        let multipart = form
            .iter()
            .fold(reqwest::multipart::Form::new(), |multipart, (name, value)| {
                multipart.text(name.to_string(), value.to_string())
            });

        prep_info!("POST {} ({} fields)", endpoint, form.len());
        let response = client
            .post(endpoint.clone())
            .header(ACCEPT, "application/json")
            .multipart(multipart)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        prep_debug!("response status: {}", status);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if !status.is_success() {
            let body = match self.read_body(response).await {
                Ok(bytes) => decode_body(&bytes, content_type.as_deref())
                    .ok()
                    .map(|decoded| decoded.text),
                Err(err) => {
                    prep_warn!("could not read error body: {}", err);
                    None
                }
            };
            return Err(status_error(status, body.as_deref()));
        }

        let bytes = self.read_body(response).await?;
        let decoded = decode_body(&bytes, content_type.as_deref())
            .map_err(|err| SubmitError::new(FailureKind::MalformedResponse, err.to_string()))?;
        serde_json::from_str::<PrepareResponse>(&decoded.text).map_err(|err| {
            SubmitError::new(
                FailureKind::MalformedResponse,
                format!("Invalid response from server: {err}"),
            )
        })
    }
}

/// Non-2xx: the backend's `error` text when present, else a generic status line.
fn status_error(status: StatusCode, body: Option<&str>) -> SubmitError {
    let message = body
        .and_then(|text| serde_json::from_str::<PrepareResponse>(text).ok())
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Server returned {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });
    SubmitError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SubmitError {
    SubmitError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return SubmitError::new(FailureKind::InvalidUrl, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
