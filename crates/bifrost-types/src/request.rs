//! Canonical request — the normalized, transport-ready description of a
//! unit of work.
//!
//! A request is produced one of two ways: deserialized from the payload
//! key of a job's envelope, or synthesized from a native circuit by the
//! bridge's resolver. Either way the same invariant holds before
//! dispatch: `platform_name` is non-empty and equals the processor the
//! bridge is bound to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bridge SDK version stamped into every generated request.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fallback job name when a payload names neither a job nor a command.
pub const DEFAULT_JOB_NAME: &str = "bifrost-job";

/// Opaque reference to a platform-native experiment.
///
/// The bridge never looks inside — experiments are produced by the
/// circuit converter or embedded by the caller, and shipped verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentRef(pub Value);

impl ExperimentRef {
    /// An empty experiment, used when a command needs no circuit data.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }
}

/// The inner payload of a canonical request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    /// Remote command name (e.g. "sample_count").
    pub command: String,
    /// Platform-native experiment description.
    pub experiment: ExperimentRef,
    /// Free-form parameters listed alongside the command.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub parameters: serde_json::Map<String, Value>,
    /// Shot budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_shots: Option<u64>,
    /// Sample budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_samples: Option<u64>,
    /// Human-readable job name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    /// Opaque caller correlation value, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_context: Option<Value>,
}

/// Optional fields accepted by the request generator.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Shot budget.
    pub max_shots: Option<u64>,
    /// Sample budget.
    pub max_samples: Option<u64>,
    /// Human-readable job name.
    pub job_name: Option<String>,
    /// Opaque caller correlation value.
    pub job_context: Option<Value>,
}

/// The normalized, transport-ready description of a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    /// Target platform. Blank on a freshly generated request; the
    /// bridge fills it with its bound processor name at resolve time.
    pub platform_name: String,
    /// Version of the SDK that built the request.
    pub sdk_version: String,
    /// The work itself.
    pub payload: RequestPayload,
}

impl CanonicalRequest {
    /// Generate a request from its parts.
    ///
    /// Deterministic: identical inputs always yield an identical
    /// request. `experiment` defaults to [`ExperimentRef::empty`] and
    /// `parameters` to an empty map.
    pub fn generate(
        command: impl Into<String>,
        experiment: Option<ExperimentRef>,
        parameters: Option<serde_json::Map<String, Value>>,
        platform_name: impl Into<String>,
        options: RequestOptions,
    ) -> Self {
        Self {
            platform_name: platform_name.into(),
            sdk_version: SDK_VERSION.to_string(),
            payload: RequestPayload {
                command: command.into(),
                experiment: experiment.unwrap_or_else(ExperimentRef::empty),
                parameters: parameters.unwrap_or_default(),
                max_shots: options.max_shots,
                max_samples: options.max_samples,
                job_name: options.job_name,
                job_context: options.job_context,
            },
        }
    }

    /// Human-readable job name for dispatch.
    ///
    /// Falls back from `payload.job_name` to `payload.command` to
    /// [`DEFAULT_JOB_NAME`].
    pub fn derived_job_name(&self) -> &str {
        match self.payload.job_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.payload.command.is_empty() => &self.payload.command,
            _ => DEFAULT_JOB_NAME,
        }
    }
}
