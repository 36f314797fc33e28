//! Generic metadata envelope codec.
//!
//! The envelope is the only channel between the caller framework's job
//! and result objects and the bridge's own data model. It is a typed
//! side-channel struct carried *alongside* the framework objects, never
//! injected into them as ad-hoc fields.
//!
//! **Invariants:**
//! - A value is never stored unserialized — every write passes through
//!   [`write_meta`], every read through [`read_meta`].
//! - Writes never clobber unrelated keys.
//! - Absence of the envelope on a carrier (`meta() == None`) is distinct
//!   from an empty envelope.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{MetaError, MetaResult};

/// Envelope key constants.
///
/// The key set is fixed: new telemetry fields get a new constant here
/// rather than ad-hoc strings at call sites.
pub mod keys {
    /// Embedded canonical request on a job.
    pub const PAYLOAD: &str = "bifrost_payload";
    /// Platform specs on a hardware specs carrier.
    pub const SPECS: &str = "platform_specs";
    /// Performance record (physical platforms only).
    pub const PERFORMANCE: &str = "platform_perf";
    /// Platform type (physical / simulated).
    pub const PLATFORM_TYPE: &str = "platform_type";
    /// Raw remote results (or a `{"error": ...}` value) on a result.
    pub const RESULTS: &str = "bifrost_results";
    /// Live platform status string.
    pub const STATUS: &str = "platform_status";
    /// Progress of the tracked job, in `[0, 1]`.
    pub const PROGRESS: &str = "job_progress";
    /// Number of jobs waiting on the remote platform.
    pub const WAITING_JOBS: &str = "waiting_jobs";
}

/// String-keyed metadata envelope.
///
/// Values are stored in serialized string form; ordering is
/// deterministic (`BTreeMap`) so envelopes serialize reproducibly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    /// Create an empty envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the envelope holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the envelope.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for a key without deserializing its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw serialized value under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Objects that can carry a metadata envelope.
///
/// Implemented by the three bridge carriers: jobs, results, and
/// hardware specs sheets.
pub trait MetaCarrier {
    /// The envelope, if one has been attached.
    fn meta(&self) -> Option<&Metadata>;

    /// Mutable access to the envelope, creating it if absent.
    fn meta_mut(&mut self) -> &mut Metadata;
}

/// Serialize `value` and store it under `key` in the carrier's envelope.
///
/// Creates the envelope if the carrier has none. Other keys are left
/// untouched.
pub fn write_meta<C, T>(carrier: &mut C, key: &str, value: &T) -> MetaResult<()>
where
    C: MetaCarrier + ?Sized,
    T: Serialize,
{
    let encoded = serde_json::to_string(value)?;
    carrier.meta_mut().entries.insert(key.to_string(), encoded);
    Ok(())
}

/// Read and deserialize the value under `key`, if present.
///
/// Returns `Ok(None)` when the carrier has no envelope or the key is
/// missing. Round-trips exactly with [`write_meta`] for every type the
/// serializer supports.
pub fn read_meta<C, T>(carrier: &C, key: &str) -> MetaResult<Option<T>>
where
    C: MetaCarrier + ?Sized,
    T: DeserializeOwned,
{
    let Some(meta) = carrier.meta() else {
        return Ok(None);
    };
    match meta.entries.get(key) {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
    }
}

/// Like [`read_meta`], but a missing key is a provenance failure.
///
/// `kind` names the carrier being asserted (e.g. "job results",
/// "hardware specs") and ends up in the error message — this is how the
/// bridge rejects foreign objects passed in by mistake.
pub fn require_meta<C, T>(carrier: &C, key: &str, kind: &str) -> MetaResult<T>
where
    C: MetaCarrier + ?Sized,
    T: DeserializeOwned,
{
    read_meta(carrier, key)?.ok_or_else(|| MetaError::MissingProvenance {
        kind: kind.to_string(),
    })
}
