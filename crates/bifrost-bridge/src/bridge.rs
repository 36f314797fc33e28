//! The bridge: remote job lifecycle controller and hardware snapshot
//! aggregator.
//!
//! Each [`Bridge`] wraps exactly one remote processor binding. It owns
//! the single-in-flight-job invariant: at most one submission runs at a
//! time per instance, enforced by an atomic check-and-set on the bridge
//! state. Snapshots may run concurrently with a live submission — they
//! only take a consistent read of the tracked job handle.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use bifrost_types::{
    FrameworkJob, FrameworkResult, HardwareSnapshot, HardwareSpecs, PlatformType, keys, write_meta,
};

use crate::convert::{CircuitConverter, DualRailConverter};
use crate::error::{BridgeError, BridgeResult};
use crate::remote::{PlatformDetails, RemoteHandler, RemoteJobHandle};
use crate::resolve::resolve_request;

/// Configuration for a bridge instance.
#[derive(Clone, Default)]
pub struct BridgeConfig {
    /// Name of the remote processor this bridge is bound to.
    pub name: String,
    /// API endpoint URL.
    pub endpoint: Option<String>,
    /// Authentication token.
    pub token: Option<String>,
    /// Additional configuration.
    pub extra: serde_json::Map<String, Value>,
}

impl BridgeConfig {
    /// Create a configuration bound to a processor name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the authentication token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Per-instance submission state.
///
/// `submitting` is the Idle/Submitting flag; `handle` is registered
/// once dispatch returns, and read by concurrent snapshots for live
/// progress. Both are cleared together on every submission exit path.
#[derive(Default)]
struct BridgeState {
    submitting: bool,
    handle: Option<Arc<dyn RemoteJobHandle>>,
}

/// Middleware instance bound to one remote processing service endpoint.
///
/// Translates framework jobs into canonical requests, submits them,
/// and aggregates platform telemetry. See the crate docs for the
/// overall control flow.
pub struct Bridge {
    config: BridgeConfig,
    platform_type: PlatformType,
    /// Platform specs, static for the lifetime of the bridge.
    specs: Value,
    /// Locally cached performance record (physical platforms).
    performance: serde_json::Map<String, Value>,
    handler: Arc<dyn RemoteHandler>,
    converter: Arc<dyn CircuitConverter>,
    /// Guards the Idle→Submitting transition. Never held across an
    /// await point.
    state: Mutex<BridgeState>,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("processor", &self.config.name)
            .field("platform_type", &self.platform_type)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl Bridge {
    /// Create a bridge over a remote handler.
    ///
    /// Defaults: simulated platform, empty specs, empty performance
    /// record, [`DualRailConverter`]. Use the `with_*` builders to
    /// override.
    pub fn new(config: BridgeConfig, handler: Arc<dyn RemoteHandler>) -> Self {
        Self {
            config,
            platform_type: PlatformType::Simulated,
            specs: Value::Object(serde_json::Map::new()),
            performance: serde_json::Map::new(),
            handler,
            converter: Arc::new(DualRailConverter),
            state: Mutex::new(BridgeState::default()),
        }
    }

    /// Set the platform type.
    pub fn with_platform_type(mut self, platform_type: PlatformType) -> Self {
        self.platform_type = platform_type;
        self
    }

    /// Set the static platform specs.
    pub fn with_specs(mut self, specs: Value) -> Self {
        self.specs = specs;
        self
    }

    /// Set the locally cached performance record.
    pub fn with_performance(mut self, performance: serde_json::Map<String, Value>) -> Self {
        self.performance = performance;
        self
    }

    /// Replace the circuit converter.
    pub fn with_converter(mut self, converter: Arc<dyn CircuitConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Name of the processor this bridge is bound to.
    pub fn processor_name(&self) -> &str {
        &self.config.name
    }

    /// Platform type of the bound processor.
    pub fn platform_type(&self) -> PlatformType {
        self.platform_type
    }

    /// Whether a submission is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.lock_state().submitting
    }

    fn lock_state(&self) -> MutexGuard<'_, BridgeState> {
        // A poisoned lock only means a panic elsewhere; the state
        // itself stays coherent (two plain fields).
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Submit a framework job and await its completion.
    ///
    /// Synchronous from the caller's point of view: resolves the job
    /// into a canonical request, gates on platform availability,
    /// dispatches, and blocks until the remote service reports a
    /// terminal state.
    ///
    /// A job that executed and *failed on the platform* is not an
    /// error: the returned result's envelope carries
    /// `{"error": stop_message}` under the results key and the call
    /// returns `Ok`. Transport faults, by contrast, propagate.
    ///
    /// Fails with [`BridgeError::Busy`] when a submission is already in
    /// flight on this instance; the bridge returns to idle on every
    /// exit path.
    #[instrument(skip(self, job), fields(processor = %self.config.name))]
    pub async fn submit_job(&self, job: &FrameworkJob) -> BridgeResult<FrameworkResult> {
        let request = resolve_request(job, &self.config.name, self.converter.as_ref())?;

        let details = self.handler.platform_details().await?;
        if !details.is_available() {
            return Err(BridgeError::PlatformUnavailable(details.status));
        }

        let job_name = request.derived_job_name().to_string();
        let job_context = request.payload.job_context.clone();

        let _guard = InFlightGuard::acquire(self)?;

        debug!(job_name = %job_name, command = %request.payload.command, "dispatching job");
        let handle = self.handler.dispatch(&request, &job_name).await?;
        self.lock_state().handle = Some(Arc::clone(&handle));

        let raw = handle.execute_and_await().await?;
        let status = handle.status().await?;

        let mut result = FrameworkResult::new();
        if status.failed {
            error!(
                job_name = %job_name,
                stop_message = %status.stop_message,
                "remote platform reported job failure"
            );
            write_meta(
                &mut result,
                keys::RESULTS,
                &json!({ "error": status.stop_message }),
            )?;
        } else {
            write_meta(&mut result, keys::RESULTS, &raw)?;
            result.job_context = job_context;
            info!(job_name = %job_name, "job completed");
        }

        Ok(result)
    }

    /// Aggregate a point-in-time hardware snapshot.
    ///
    /// Never fails: a transport fault while fetching live platform
    /// details degrades the snapshot to status "unreachable" instead of
    /// raising — specs queries feed monitoring, where some answer beats
    /// none. Runs concurrently with an in-flight submission.
    #[instrument(skip(self), fields(processor = %self.config.name))]
    pub async fn snapshot(&self) -> HardwareSnapshot {
        let tracked = {
            let state = self.lock_state();
            if state.submitting {
                Some(state.handle.clone())
            } else {
                None
            }
        };

        let progress = match tracked {
            None => 1.0,
            // Dispatch has started but the handle is not registered yet.
            Some(None) => 0.0,
            Some(Some(handle)) => match handle.status().await {
                Ok(status) => status.progress,
                Err(e) => {
                    warn!(error = %e, "job status fetch failed during snapshot");
                    0.0
                }
            },
        };

        let details = match self.handler.platform_details().await {
            Ok(details) => details,
            Err(e) => {
                warn!(error = %e, "platform details fetch failed, degrading snapshot");
                PlatformDetails::unreachable()
            }
        };

        let performance = match self.platform_type {
            PlatformType::Physical => {
                let mut merged = self.performance.clone();
                if let Some(live) = details.performance {
                    // Live fields win over the cached record.
                    merged.extend(live);
                }
                Some(merged)
            }
            PlatformType::Simulated => None,
        };

        HardwareSnapshot {
            specs: self.specs.clone(),
            platform_type: self.platform_type,
            performance,
            status: details.status,
            progress,
            waiting_jobs: details.waiting_jobs,
        }
    }

    /// Envelope-encoded form of [`snapshot`](Self::snapshot), for
    /// handing back to the caller framework.
    pub async fn get_specs(&self) -> BridgeResult<HardwareSpecs> {
        Ok(self.snapshot().await.encode()?)
    }
}

/// RAII guard for the Idle→Submitting transition.
///
/// Acquisition is the atomic check-and-set; dropping the guard restores
/// Idle and clears the tracked handle, so every exit path of
/// `submit_job` — success, remote failure, propagated fault — resets
/// the bridge.
struct InFlightGuard<'a> {
    bridge: &'a Bridge,
}

impl std::fmt::Debug for InFlightGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightGuard").finish_non_exhaustive()
    }
}

impl<'a> InFlightGuard<'a> {
    fn acquire(bridge: &'a Bridge) -> BridgeResult<Self> {
        let mut state = bridge.lock_state();
        if state.submitting {
            return Err(BridgeError::Busy);
        }
        state.submitting = true;
        Ok(Self { bridge })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.bridge.lock_state();
        state.submitting = false;
        state.handle = None;
    }
}
