use std::time::Duration;

use analyzer_logging::analyzer_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_document;
use crate::{ExtractionFailure, TabDocument};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
                "text/plain".to_string(),
            ],
        }
    }
}

/// Loads the document behind a URL.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<TabDocument, ExtractionFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, ExtractionFailure> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| load_failed("<client>", err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_document(&self, url: &str) -> Result<TabDocument, ExtractionFailure> {
        let parsed = url::Url::parse(url).map_err(|err| load_failed(url, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|err| load_failed(url, describe_reqwest_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_failed(url, format!("http status {}", status.as_u16())));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(load_failed(
                    url,
                    format!(
                        "response too large (max {}, actual {content_len})",
                        self.settings.max_bytes
                    ),
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(load_failed(url, format!("unsupported content type {ct}")));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| load_failed(url, describe_reqwest_error(&err)))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(load_failed(
                    url,
                    format!(
                        "response too large (max {}, actual {next_len})",
                        self.settings.max_bytes
                    ),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let (html, encoding) = decode_document(&bytes, content_type.as_deref());
        analyzer_debug!(
            "Fetched {} bytes from {} (final {}, encoding {})",
            bytes.len(),
            url,
            final_url,
            encoding.name()
        );

        Ok(TabDocument {
            url: final_url,
            html,
        })
    }
}

fn load_failed(url: &str, reason: impl Into<String>) -> ExtractionFailure {
    ExtractionFailure::LoadFailed {
        url: url.to_string(),
        reason: reason.into(),
    }
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return format!("timeout: {err}");
    }
    if err.is_redirect() {
        return format!("redirect limit exceeded: {err}");
    }
    format!("network error: {err}")
}
