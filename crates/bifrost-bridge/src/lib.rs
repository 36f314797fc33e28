//! Bifrost — job translation and submission bridge.
//!
//! Middleware that lets a generic compute-job framework submit work to
//! a remote photonic processing service, and turns the service's
//! responses back into framework-native results.
//!
//! # Architecture
//!
//! ```text
//!   caller ──→ resolve (canonical request)
//!          ──→ Bridge::submit_job (single-flight, dispatch, await)
//!          ──→ envelope codec (encode result)
//!          ──→ caller
//!
//!   Bridge::snapshot runs independently, including while a job is
//!   in flight (live progress).
//! ```
//!
//! - [`resolve_request`] reconciles a native circuit or an embedded
//!   payload into one [`CanonicalRequest`] bound to this bridge's
//!   processor.
//! - [`Bridge`] owns the single-in-flight-job invariant and the
//!   lifecycle: availability gate, dispatch, await, failure
//!   translation, state reset on every exit path.
//! - [`Bridge::snapshot`] aggregates specs, status, performance, queue
//!   depth, and progress — degrading to "unreachable" instead of
//!   failing when the remote service cannot be reached.
//! - [`CloudClient`] is the production [`RemoteHandler`]; any transport
//!   can be substituted through the trait.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bifrost_bridge::{Bridge, BridgeConfig, CloudClient};
//! use bifrost_types::{RequestOptions, make_job, retrieve_results};
//!
//! let client = CloudClient::from_env("qpu-1")?;
//! let bridge = Bridge::new(BridgeConfig::new("qpu-1"), Arc::new(client));
//!
//! let job = make_job("sample_count", None, None, "", RequestOptions {
//!     max_shots: Some(100),
//!     ..Default::default()
//! })?;
//! let result = bridge.submit_job(&job).await?;
//! let counts = retrieve_results(&result)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod bridge;
pub mod convert;
pub mod error;
pub mod remote;
pub mod resolve;

pub use api::{CloudClient, CloudJobHandle};
pub use bridge::{Bridge, BridgeConfig};
pub use convert::{CircuitConverter, DualRailConverter};
pub use error::{BridgeError, BridgeResult, TransportError};
pub use remote::{
    AVAILABLE_STATUS, PlatformDetails, RemoteHandler, RemoteJobHandle, RemoteJobStatus,
    UNREACHABLE_STATUS,
};
pub use resolve::{SAMPLE_COUNT_COMMAND, resolve_request};

// Re-export the data model for convenience.
pub use bifrost_types::{
    CanonicalRequest, Circuit, FrameworkJob, FrameworkResult, HardwareSnapshot, HardwareSpecs,
    PlatformType, RequestOptions, make_job, retrieve_results,
};
