//! Error types for the bridge crate.
//!
//! Remote-reported job failure is deliberately absent from this
//! taxonomy: a job that executed and failed on the platform is reported
//! through the returned result value, not through an error (see
//! `Bridge::submit_job`).

use thiserror::Error;

use bifrost_types::MetaError;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur while translating and submitting jobs.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The job carried neither a usable circuit nor an embedded request.
    #[error("No valid payload data found on job — attach a circuit with shots or an embedded request")]
    MissingPayload,

    /// The request targets a different processor than this bridge is
    /// bound to. Never auto-redirected.
    #[error("Platform name mismatch: bridge is bound to '{expected}' but request targets '{found}'")]
    PlatformMismatch {
        /// Processor this bridge is bound to.
        expected: String,
        /// Processor the request was built for.
        found: String,
    },

    /// The remote service reports a non-available status. Point-in-time
    /// fact, propagated without retry.
    #[error("Platform not available (status: {0})")]
    PlatformUnavailable(String),

    /// A job is already in flight on this bridge instance.
    #[error("A job is already in flight on this bridge")]
    Busy,

    /// Circuit-to-experiment conversion failed.
    #[error("Circuit conversion error: {0}")]
    Conversion(String),

    /// Envelope codec failure, including missing provenance.
    #[error(transparent)]
    Meta(#[from] MetaError),

    /// Transport fault during dispatch. Fatal to the submission.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Faults raised by the remote transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Wire payload failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing API key.
    #[error("Missing API key (set BIFROST_API_KEY)")]
    MissingApiKey,

    /// Remote job does not exist.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// API error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },
}
