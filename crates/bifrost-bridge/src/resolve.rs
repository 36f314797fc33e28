//! Canonical payload resolver.
//!
//! Reconciles the two job representations — a native circuit with a
//! shot count, or a pre-built request embedded in the job's envelope —
//! into one canonical request bound to this bridge's processor.

use tracing::debug;

use bifrost_types::{
    CanonicalRequest, FrameworkJob, RequestOptions, keys, read_meta,
};

use crate::convert::CircuitConverter;
use crate::error::{BridgeError, BridgeResult};

/// Command synthesized for circuit-based submissions.
pub const SAMPLE_COUNT_COMMAND: &str = "sample_count";

/// Resolve a framework job into a canonical request.
///
/// A native circuit with a positive shot count takes precedence over an
/// embedded payload — attaching a circuit at job-build time overrides a
/// generic payload. Platform identity is normalized last: a blank
/// `platform_name` is filled with `processor_name`; a non-blank
/// mismatch fails with [`BridgeError::PlatformMismatch`] rather than
/// silently redirecting the request.
pub fn resolve_request(
    job: &FrameworkJob,
    processor_name: &str,
    converter: &dyn CircuitConverter,
) -> BridgeResult<CanonicalRequest> {
    let mut request = match (&job.circuit, job.shots) {
        (Some(circuit), Some(shots)) if shots > 0 => {
            debug!(circuit = %circuit.name, shots, "synthesizing request from native circuit");
            let experiment = converter.convert(circuit, true)?;
            CanonicalRequest::generate(
                SAMPLE_COUNT_COMMAND,
                Some(experiment),
                None,
                "",
                RequestOptions {
                    max_shots: Some(u64::from(shots)),
                    max_samples: Some(u64::from(shots)),
                    ..Default::default()
                },
            )
        }
        _ => read_meta(job, keys::PAYLOAD)?.ok_or(BridgeError::MissingPayload)?,
    };

    if request.platform_name.is_empty() {
        request.platform_name = processor_name.to_string();
    } else if request.platform_name != processor_name {
        return Err(BridgeError::PlatformMismatch {
            expected: processor_name.to_string(),
            found: request.platform_name,
        });
    }

    Ok(request)
}
