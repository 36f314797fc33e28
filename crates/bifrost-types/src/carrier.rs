//! Framework-facing carrier objects.
//!
//! These are the bridge's view of the caller framework's job, result,
//! and hardware-specs objects. Each carries an optional metadata
//! envelope; all bridge-specific data travels inside that envelope,
//! never as fields the framework would have to know about.

use serde_json::Value;

use crate::circuit::Circuit;
use crate::error::MetaResult;
use crate::meta::{Metadata, MetaCarrier, keys, require_meta, write_meta};
use crate::request::{CanonicalRequest, ExperimentRef, RequestOptions};

/// A job handed to the bridge by the caller framework.
///
/// Exactly one representation is used per submission: a native circuit
/// with a shot count, or a canonical request embedded in the envelope.
/// The circuit takes precedence when both are present.
#[derive(Debug, Clone, Default)]
pub struct FrameworkJob {
    /// Native gate-level circuit, if the caller attached one.
    pub circuit: Option<Circuit>,
    /// Requested shot count for a circuit submission.
    pub shots: Option<u32>,
    meta: Option<Metadata>,
}

impl FrameworkJob {
    /// Create an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a job from a native circuit and shot count.
    pub fn from_circuit(circuit: Circuit, shots: u32) -> Self {
        Self {
            circuit: Some(circuit),
            shots: Some(shots),
            meta: None,
        }
    }
}

impl MetaCarrier for FrameworkJob {
    fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        self.meta.get_or_insert_with(Metadata::new)
    }
}

/// A result returned to the caller framework.
///
/// On success the envelope carries the raw remote result under the
/// results key; on a remote execution failure it carries
/// `{"error": message}` instead — never both.
#[derive(Debug, Clone, Default)]
pub struct FrameworkResult {
    /// Opaque caller correlation value, copied from the request's
    /// payload on success so asynchronously dispatched jobs can be
    /// matched back up.
    pub job_context: Option<Value>,
    meta: Option<Metadata>,
}

impl FrameworkResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaCarrier for FrameworkResult {
    fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        self.meta.get_or_insert_with(Metadata::new)
    }
}

/// A hardware-specs sheet, the envelope-encoded form of a snapshot.
#[derive(Debug, Clone, Default)]
pub struct HardwareSpecs {
    meta: Option<Metadata>,
}

impl HardwareSpecs {
    /// Create an empty specs sheet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaCarrier for HardwareSpecs {
    fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        self.meta.get_or_insert_with(Metadata::new)
    }
}

/// Build a framework job carrying a freshly generated canonical request.
///
/// The request lands in the job's envelope under the payload key;
/// `platform_name` may be left blank and will be filled by the bridge at
/// resolve time.
pub fn make_job(
    command: impl Into<String>,
    experiment: Option<ExperimentRef>,
    parameters: Option<serde_json::Map<String, Value>>,
    platform_name: impl Into<String>,
    options: RequestOptions,
) -> MetaResult<FrameworkJob> {
    let request =
        CanonicalRequest::generate(command, experiment, parameters, platform_name, options);
    let mut job = FrameworkJob::new();
    write_meta(&mut job, keys::PAYLOAD, &request)?;
    Ok(job)
}

/// Decode the raw result value carried by a framework result.
///
/// Fails with a provenance error when the result was not produced by a
/// bridge submission.
pub fn retrieve_results(result: &FrameworkResult) -> MetaResult<Value> {
    require_meta(result, keys::RESULTS, "job results")
}
