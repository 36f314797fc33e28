//! Remote-handler seam.
//!
//! The bridge never talks to the network directly; it goes through
//! [`RemoteHandler`] for platform telemetry and dispatch, and through
//! [`RemoteJobHandle`] for the lifetime of one dispatched job. The
//! production implementation is [`crate::api::CloudClient`]; tests
//! substitute mocks.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use bifrost_types::CanonicalRequest;

use crate::error::TransportError;

/// Platform status string that admits new submissions.
pub const AVAILABLE_STATUS: &str = "available";

/// Status reported when the remote service cannot be reached.
pub const UNREACHABLE_STATUS: &str = "unreachable";

/// Live platform telemetry fetched from the remote service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformDetails {
    /// Platform status ("available", "maintenance", …).
    pub status: String,
    /// Live performance fields, merged over the bridge's cached record.
    #[serde(default)]
    pub performance: Option<serde_json::Map<String, Value>>,
    /// Queue depth, if the service reports one.
    #[serde(default)]
    pub waiting_jobs: Option<u32>,
}

impl PlatformDetails {
    /// Degraded default used when the telemetry fetch fails.
    pub fn unreachable() -> Self {
        Self {
            status: UNREACHABLE_STATUS.to_string(),
            performance: None,
            waiting_jobs: None,
        }
    }

    /// Whether the platform accepts new submissions.
    pub fn is_available(&self) -> bool {
        self.status == AVAILABLE_STATUS
    }
}

/// Point-in-time status of a dispatched job.
#[derive(Debug, Clone, Default)]
pub struct RemoteJobStatus {
    /// Completion fraction in `[0, 1]`.
    pub progress: f64,
    /// Whether the platform reports the job as failed.
    pub failed: bool,
    /// Failure message when `failed` is set; empty otherwise.
    pub stop_message: String,
}

/// Handle to a single dispatched job.
#[async_trait]
pub trait RemoteJobHandle: Send + Sync {
    /// Block until the job reaches a terminal state and return the raw
    /// result value.
    ///
    /// Only transport faults surface as errors here. A job that
    /// executed and failed on the platform still resolves `Ok` (with
    /// whatever partial value the service returned, possibly null) —
    /// the failure is read from [`status`](Self::status) afterwards.
    async fn execute_and_await(&self) -> Result<Value, TransportError>;

    /// Query the job's live status from the remote service.
    async fn status(&self) -> Result<RemoteJobStatus, TransportError>;
}

/// Transport to one remote processing service endpoint.
#[async_trait]
pub trait RemoteHandler: Send + Sync {
    /// Fetch live platform telemetry.
    async fn platform_details(&self) -> Result<PlatformDetails, TransportError>;

    /// Dispatch a canonical request under a human-readable job name.
    async fn dispatch(
        &self,
        request: &CanonicalRequest,
        job_name: &str,
    ) -> Result<Arc<dyn RemoteJobHandle>, TransportError>;
}
