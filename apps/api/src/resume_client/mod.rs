//! Resume backend client: the single point of entry for writes to the resume
//! store. Sessions reach it through the `ResumeStore` trait.
//!
//! No retries: a failed write is surfaced and the user resubmits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::ResumePayload;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Create/update operations against the resume store.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, space_id: &str, payload: &ResumePayload) -> Result<(), TransportError>;

    async fn update(
        &self,
        space_id: &str,
        resume_id: &str,
        payload: &ResumePayload,
    ) -> Result<(), TransportError>;
}

#[derive(Debug, Deserialize)]
struct BackendError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<BackendErrorBody>,
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

impl BackendError {
    fn into_message(self) -> Option<String> {
        self.error.map(|e| e.message).or(self.message)
    }
}

/// HTTP client for the resume backend. Cheap to clone; per-request
/// credentials are attached with [`ResumeApiClient::with_cookie`].
#[derive(Clone)]
pub struct ResumeApiClient {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl ResumeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: None,
        })
    }

    /// Returns a client that forwards the caller's cookie on every request.
    pub fn with_cookie(&self, cookie: Option<String>) -> Self {
        Self {
            cookie,
            ..self.clone()
        }
    }

    fn collection_url(&self, space_id: &str) -> String {
        format!("{}/api/v1/resume/{space_id}/resume", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, payload: &ResumePayload) -> Result<(), TransportError> {
        let request = match &self.cookie {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        };

        let response = request.json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Resume backend returned {status}: {body}");
            let message = serde_json::from_str::<BackendError>(&body)
                .ok()
                .and_then(BackendError::into_message)
                .unwrap_or(body);
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Resume backend accepted write ({status})");
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for ResumeApiClient {
    async fn create(&self, space_id: &str, payload: &ResumePayload) -> Result<(), TransportError> {
        let request = self.client.post(self.collection_url(space_id));
        self.send(request, payload).await
    }

    async fn update(
        &self,
        space_id: &str,
        resume_id: &str,
        payload: &ResumePayload,
    ) -> Result<(), TransportError> {
        let url = format!("{}/{resume_id}", self.collection_url(space_id));
        self.send(self.client.put(url), payload).await
    }
}
