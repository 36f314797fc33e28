//! Photonic cloud REST API client.
//!
//! Production implementation of [`RemoteHandler`] against a
//! Quandela-style photonic cloud API.
//!
//! ## Submission flow
//!
//! 1. `GET /platforms/{name}` — availability and telemetry
//! 2. `POST /jobs` with the serialized canonical request → `job.id`
//! 3. Poll `GET /jobs/{id}` until terminal state
//! 4. Read results from the inline `results` field

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, instrument};

use bifrost_types::CanonicalRequest;

use crate::error::TransportError;
use crate::remote::{PlatformDetails, RemoteHandler, RemoteJobHandle, RemoteJobStatus};

/// Default cloud API base URL.
pub const BASE_URL: &str = "https://api.cloud.quandela.com";

/// API version path.
const API_PATH: &str = "/api/v1";

/// How long to wait between job status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Photonic cloud API client, bound to one platform.
#[derive(Clone)]
pub struct CloudClient {
    /// HTTP client with timeouts configured.
    client: Client,
    /// API base URL.
    base_url: String,
    /// API key for authentication.
    api_key: String,
    /// Platform this client is bound to.
    platform: String,
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("base_url", &self.base_url)
            .field("platform", &self.platform)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl CloudClient {
    /// Create a client bound to a platform.
    pub fn new(
        api_key: impl Into<String>,
        platform: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(TransportError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
            platform: platform.into(),
        })
    }

    /// Create a client from the `BIFROST_API_KEY` environment variable.
    pub fn from_env(platform: impl Into<String>) -> Result<Self, TransportError> {
        let api_key = std::env::var("BIFROST_API_KEY").unwrap_or_default();
        Self::new(api_key, platform)
    }

    /// Override the base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the full API URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PATH, path)
    }

    /// Fetch platform telemetry.
    #[instrument(skip(self))]
    pub async fn get_platform(&self) -> Result<PlatformResponse, TransportError> {
        let url = self.url(&format!("/platforms/{}", self.platform));
        debug!("Getting platform from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        handle_response(response).await
    }

    /// Create a job from a canonical request.
    #[instrument(skip(self, request))]
    pub async fn create_job(
        &self,
        request: &CanonicalRequest,
        job_name: &str,
    ) -> Result<JobResponse, TransportError> {
        let url = self.url("/jobs");
        debug!("Creating job at {}", url);

        let body = CreateJobRequest {
            name: job_name.to_string(),
            platform_name: request.platform_name.clone(),
            payload: serde_json::to_value(request)?,
            client_request_id: format!("bifrost-{}", uuid::Uuid::new_v4()),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        handle_response(response).await
    }

    /// Get job status.
    #[instrument(skip(self))]
    pub async fn get_job(&self, job_id: &str) -> Result<JobResponse, TransportError> {
        let url = self.url(&format!("/jobs/{job_id}"));
        debug!("Getting job from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        handle_response(response).await
    }
}

/// Handle HTTP response, extracting JSON or returning an error.
async fn handle_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();

    if status.is_success() {
        let body = response.json().await?;
        Ok(body)
    } else {
        let message = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(TransportError::AuthFailed(message))
            }
            StatusCode::NOT_FOUND => Err(TransportError::JobNotFound(message)),
            _ => Err(TransportError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[async_trait]
impl RemoteHandler for CloudClient {
    async fn platform_details(&self) -> Result<PlatformDetails, TransportError> {
        let platform = self.get_platform().await?;
        Ok(PlatformDetails {
            status: platform.status,
            performance: platform.performance,
            waiting_jobs: platform.waiting_job_count,
        })
    }

    async fn dispatch(
        &self,
        request: &CanonicalRequest,
        job_name: &str,
    ) -> Result<Arc<dyn RemoteJobHandle>, TransportError> {
        let job = self.create_job(request, job_name).await?;
        Ok(Arc::new(CloudJobHandle {
            client: self.clone(),
            job_id: job.id,
        }))
    }
}

/// Handle to one cloud job, polling the job endpoint.
#[derive(Debug)]
pub struct CloudJobHandle {
    client: CloudClient,
    job_id: String,
}

impl CloudJobHandle {
    /// Remote job identifier.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

#[async_trait]
impl RemoteJobHandle for CloudJobHandle {
    async fn execute_and_await(&self) -> Result<Value, TransportError> {
        // No local deadline: the transport's own timeouts govern.
        loop {
            let job = self.client.get_job(&self.job_id).await?;
            if job.is_terminal() {
                debug!(job_id = %self.job_id, status = %job.status, "job reached terminal state");
                return Ok(job.results.unwrap_or(Value::Null));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn status(&self) -> Result<RemoteJobStatus, TransportError> {
        let job = self.client.get_job(&self.job_id).await?;
        Ok(job.to_status())
    }
}

// ─── Request types ──────────────────────────────────────────────────

/// Request body for creating a job.
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobRequest {
    /// Human-readable job name.
    pub name: String,
    /// Target platform.
    pub platform_name: String,
    /// Serialized canonical request.
    pub payload: Value,
    /// Client-generated id, lets the service deduplicate retried posts.
    pub client_request_id: String,
}

// ─── Response types ─────────────────────────────────────────────────

/// Platform telemetry response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformResponse {
    /// Platform name.
    #[serde(default)]
    pub name: Option<String>,
    /// Platform status ("available", "maintenance", …).
    pub status: String,
    /// Live performance fields.
    #[serde(default)]
    pub performance: Option<serde_json::Map<String, Value>>,
    /// Number of jobs waiting on this platform.
    #[serde(default)]
    pub waiting_job_count: Option<u32>,
}

/// Job response (from create or get).
#[derive(Debug, Clone, Deserialize)]
pub struct JobResponse {
    /// Job ID.
    pub id: String,
    /// Job name.
    #[serde(default)]
    pub name: Option<String>,
    /// Job status: waiting, running, completed, error, cancelled.
    pub status: String,
    /// Completion fraction in `[0, 1]`.
    #[serde(default)]
    pub progress: Option<f64>,
    /// Failure message when status is "error".
    #[serde(default)]
    pub stop_message: Option<String>,
    /// Inline results, present when status is "completed".
    #[serde(default)]
    pub results: Option<Value>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl JobResponse {
    /// Check if the job is still pending (waiting or running).
    pub fn is_pending(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "waiting" | "running")
    }

    /// Check if the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Check if the job failed on the platform.
    pub fn is_failed(&self) -> bool {
        self.status.to_lowercase() == "error"
    }

    /// Project into the bridge's job status shape.
    pub fn to_status(&self) -> RemoteJobStatus {
        let progress = self
            .progress
            .unwrap_or(if self.is_terminal() { 1.0 } else { 0.0 });
        RemoteJobStatus {
            progress,
            failed: self.is_failed(),
            stop_message: self.stop_message.clone().unwrap_or_default(),
        }
    }
}
