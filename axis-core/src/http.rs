//! HTTP port to the AXIS backend
//!
//! Session components only see the `HttpClient` trait; `ReqwestHttpClient` is
//! the production adapter. Every response, success or error, passes through
//! the envelope unwrapper before the caller sees it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::envelope;
use crate::error::AxisError;

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// `GET {base}{path}`, returning the unwrapped payload.
    async fn get(&self, path: &str) -> Result<Value, AxisError>;

    /// `POST {base}{path}` with a JSON body, returning the unwrapped payload.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, AxisError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: String,
}

impl ReqwestHttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AxisError> {
        Self::with_base_url(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, AxisError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AxisError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn finish(&self, response: reqwest::Response) -> Result<Value, AxisError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AxisError::Network(e.to_string()))?;

        if status.is_success() {
            return envelope::unwrap_text(&text);
        }

        // Error bodies can also arrive wrapped; a body we cannot read still
        // leaves the status text to report.
        let message = envelope::unwrap_text(&text)
            .ok()
            .as_ref()
            .and_then(envelope::error_message);

        tracing::warn!(status = status.as_u16(), message = ?message, "AXIS backend error");

        Err(AxisError::from_status(status.as_u16(), message, status_text(status)))
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Request failed")
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, path: &str) -> Result<Value, AxisError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AxisError::Network(e.to_string()))?;
        self.finish(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, AxisError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AxisError::Network(e.to_string()))?;
        self.finish(response).await
    }
}
