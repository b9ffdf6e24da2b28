//! HTTP access to the compiler and session service.
//!
//! [`CompileService`] is the network capability consumed by the orchestrator
//! and the auth gate. [`HttpCompileService`] implements it with a blocking
//! reqwest client whose cookie store carries the session between `/login`
//! and `/compile`.

use crate::error::Result;
use crate::model::Credentials;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;

/// Status code and undecoded body of a service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (refused, DNS, reset, TLS...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{url}: {detail}")]
pub struct TransportError {
    pub url: String,
    pub detail: String,
}

pub type TransportResult = std::result::Result<RawResponse, TransportError>;

/// Health information reported by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Network operations offered by the compiler service.
///
/// Implementations return the raw status and body; interpreting them is the
/// job of the normalizer and the auth gate.
pub trait CompileService: Send + Sync {
    /// Base URL used in user-facing connectivity messages.
    fn endpoint(&self) -> &str;

    /// `POST /compile` with the source as `text/plain`.
    fn compile(&self, source_text: &str) -> TransportResult;

    /// `POST /login` with the credentials as JSON.
    fn login(&self, credentials: &Credentials) -> TransportResult;

    /// `GET /`.
    fn health(&self) -> TransportResult;
}

/// reqwest-backed [`CompileService`].
pub struct HttpCompileService {
    client: Client,
    base_url: String,
}

impl HttpCompileService {
    /// Build a client for `base_url`. Cookies set by the server are kept for
    /// the life of this value and attached to later requests.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn finish(
        &self,
        url: String,
        sent: std::result::Result<reqwest::blocking::Response, reqwest::Error>,
    ) -> TransportResult {
        let to_transport = |e: reqwest::Error| TransportError {
            url: url.clone(),
            detail: e.to_string(),
        };
        let response = sent.map_err(to_transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(to_transport)?;
        tracing::debug!(%url, status, bytes = body.len(), "service responded");
        Ok(RawResponse { status, body })
    }
}

impl CompileService for HttpCompileService {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn compile(&self, source_text: &str) -> TransportResult {
        let url = self.url("/compile");
        tracing::info!(%url, bytes = source_text.len(), "submitting source");
        let sent = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(source_text.to_string())
            .send();
        self.finish(url, sent)
    }

    fn login(&self, credentials: &Credentials) -> TransportResult {
        let url = self.url("/login");
        tracing::info!(%url, username = %credentials.username, "attempting login");
        let sent = self.client.post(&url).json(credentials).send();
        self.finish(url, sent)
    }

    fn health(&self) -> TransportResult {
        let url = self.url("/");
        let sent = self.client.get(&url).send();
        self.finish(url, sent)
    }
}

/// Decode a health probe body, tolerating servers that answer with plain text.
pub fn parse_health(response: &RawResponse) -> HealthStatus {
    serde_json::from_str(&response.body).unwrap_or_else(|_| HealthStatus {
        status: response.body.trim().to_string(),
        version: None,
    })
}
