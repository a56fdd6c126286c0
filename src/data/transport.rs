//! HTTP transport used by the QuickStats client.
//!
//! The client only needs "GET this URL with these query pairs and give me the
//! status and body". Keeping that behind a trait lets the report builders be
//! exercised against a recording fake instead of the live API.

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::AppError;

/// Raw response: HTTP status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Perform one blocking GET.
    ///
    /// Only connection-level failures are errors here; non-success statuses
    /// are returned as-is so the caller decides how to report them.
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, AppError>;
}

/// `reqwest` blocking client with default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, AppError> {
        debug!(url, params = query.len(), "GET");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| AppError::request(format!("QuickStats request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| AppError::request(format!("Failed to read QuickStats response: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}
