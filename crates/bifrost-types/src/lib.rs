//! Data model for the Bifrost job translation bridge.
//!
//! This crate defines the types that cross the boundary between a
//! generic compute-job framework and a remote photonic processing
//! service:
//!
//! - [`Metadata`] and the [`meta`] codec — the string-keyed envelope
//!   that carries bridge data on foreign job/result/specs objects.
//! - [`CanonicalRequest`] — the normalized, transport-ready description
//!   of a unit of work.
//! - [`FrameworkJob`] / [`FrameworkResult`] / [`HardwareSpecs`] — the
//!   carrier objects the bridge exchanges with the caller framework.
//! - [`HardwareSnapshot`] — the composite telemetry snapshot.
//! - [`Circuit`] — the minimal gate-level seam handed to a converter.
//!
//! The bridge logic itself lives in `bifrost-bridge`.

pub mod carrier;
pub mod circuit;
pub mod error;
pub mod meta;
pub mod request;
pub mod snapshot;

pub use carrier::{FrameworkJob, FrameworkResult, HardwareSpecs, make_job, retrieve_results};
pub use circuit::{Circuit, Gate};
pub use error::{MetaError, MetaResult};
pub use meta::{Metadata, MetaCarrier, keys, read_meta, require_meta, write_meta};
pub use request::{
    CanonicalRequest, DEFAULT_JOB_NAME, ExperimentRef, RequestOptions, RequestPayload, SDK_VERSION,
};
pub use snapshot::{HardwareSnapshot, PlatformType};
