//! End-to-end bridge tests over a mock remote handler.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;
use tokio::time::sleep;

use bifrost_bridge::{
    Bridge, BridgeConfig, BridgeError, PlatformDetails, RemoteHandler, RemoteJobHandle,
    RemoteJobStatus, SAMPLE_COUNT_COMMAND, TransportError,
};
use bifrost_types::{
    CanonicalRequest, Circuit, PlatformType, RequestOptions, keys, make_job, read_meta,
    retrieve_results,
};

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("bifrost_bridge=debug")
        .try_init();
}

/// Scripted remote job.
struct MockJob {
    result: Value,
    failed: bool,
    stop_message: String,
    progress: f64,
    /// When set, `execute_and_await` blocks until notified.
    gate: Option<Arc<Notify>>,
}

impl MockJob {
    fn succeeding(result: Value) -> Arc<Self> {
        Arc::new(Self {
            result,
            failed: false,
            stop_message: String::new(),
            progress: 1.0,
            gate: None,
        })
    }

    fn failing(stop_message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Value::Null,
            failed: true,
            stop_message: stop_message.to_string(),
            progress: 1.0,
            gate: None,
        })
    }

    fn gated(result: Value, progress: f64, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            result,
            failed: false,
            stop_message: String::new(),
            progress,
            gate: Some(gate),
        })
    }
}

#[async_trait]
impl RemoteJobHandle for MockJob {
    async fn execute_and_await(&self) -> Result<Value, TransportError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.result.clone())
    }

    async fn status(&self) -> Result<RemoteJobStatus, TransportError> {
        Ok(RemoteJobStatus {
            progress: self.progress,
            failed: self.failed,
            stop_message: self.stop_message.clone(),
        })
    }
}

/// Scripted remote handler recording every dispatch.
struct MockRemote {
    details: Mutex<PlatformDetails>,
    fail_details: AtomicBool,
    fail_dispatch: AtomicBool,
    job: Mutex<Arc<MockJob>>,
    dispatched: AtomicUsize,
    last_request: Mutex<Option<CanonicalRequest>>,
}

impl MockRemote {
    fn available(job: Arc<MockJob>) -> Arc<Self> {
        Arc::new(Self {
            details: Mutex::new(PlatformDetails {
                status: "available".into(),
                performance: None,
                waiting_jobs: None,
            }),
            fail_details: AtomicBool::new(false),
            fail_dispatch: AtomicBool::new(false),
            job: Mutex::new(job),
            dispatched: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn with_status(self: Arc<Self>, status: &str) -> Arc<Self> {
        self.details.lock().unwrap().status = status.to_string();
        self
    }

    fn with_performance(self: Arc<Self>, performance: serde_json::Map<String, Value>) -> Arc<Self> {
        self.details.lock().unwrap().performance = Some(performance);
        self
    }

    fn with_waiting_jobs(self: Arc<Self>, waiting: u32) -> Arc<Self> {
        self.details.lock().unwrap().waiting_jobs = Some(waiting);
        self
    }

    fn failing_details(self: Arc<Self>) -> Arc<Self> {
        self.fail_details.store(true, Ordering::SeqCst);
        self
    }

    fn failing_dispatch(self: Arc<Self>) -> Arc<Self> {
        self.fail_dispatch.store(true, Ordering::SeqCst);
        self
    }

    fn dispatch_count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<CanonicalRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteHandler for MockRemote {
    async fn platform_details(&self) -> Result<PlatformDetails, TransportError> {
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                status: 502,
                message: "gateway down".into(),
            });
        }
        Ok(self.details.lock().unwrap().clone())
    }

    async fn dispatch(
        &self,
        request: &CanonicalRequest,
        _job_name: &str,
    ) -> Result<Arc<dyn RemoteJobHandle>, TransportError> {
        if self.fail_dispatch.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                status: 500,
                message: "dispatch rejected".into(),
            });
        }
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let handle: Arc<dyn RemoteJobHandle> = self.job.lock().unwrap().clone();
        Ok(handle)
    }
}

fn bridge_over(remote: Arc<MockRemote>) -> Bridge {
    Bridge::new(BridgeConfig::new("qpu-1"), remote)
}

#[tokio::test]
async fn test_blank_platform_filled_and_results_delivered() {
    init_logs();
    let raw = json!({"counts": {"|1,0,1,0>": 61, "|0,1,0,1>": 39}});
    let remote = MockRemote::available(MockJob::succeeding(raw.clone()));
    let bridge = bridge_over(remote.clone());

    let job = make_job(
        "sample_count",
        None,
        None,
        "",
        RequestOptions {
            max_shots: Some(100),
            ..Default::default()
        },
    )
    .unwrap();

    let result = bridge.submit_job(&job).await.unwrap();

    assert_eq!(retrieve_results(&result).unwrap(), raw);
    assert_eq!(remote.dispatch_count(), 1);
    let dispatched = remote.last_request().unwrap();
    assert_eq!(dispatched.platform_name, "qpu-1");
    assert_eq!(dispatched.payload.max_shots, Some(100));
}

#[tokio::test]
async fn test_platform_mismatch_never_dispatches() {
    let remote = MockRemote::available(MockJob::succeeding(Value::Null));
    let bridge = bridge_over(remote.clone());

    let job = make_job("sample_count", None, None, "qpu-2", RequestOptions::default()).unwrap();
    let err = bridge.submit_job(&job).await.unwrap_err();

    assert!(matches!(err, BridgeError::PlatformMismatch { .. }));
    assert_eq!(remote.dispatch_count(), 0);
}

#[tokio::test]
async fn test_unavailable_platform_never_dispatches() {
    let remote =
        MockRemote::available(MockJob::succeeding(Value::Null)).with_status("maintenance");
    let bridge = bridge_over(remote.clone());

    let job = make_job("sample_count", None, None, "", RequestOptions::default()).unwrap();
    let err = bridge.submit_job(&job).await.unwrap_err();

    assert!(matches!(err, BridgeError::PlatformUnavailable(status) if status == "maintenance"));
    assert_eq!(remote.dispatch_count(), 0);
}

#[tokio::test]
async fn test_second_submit_is_busy_then_bridge_recovers() {
    init_logs();
    let gate = Arc::new(Notify::new());
    let remote = MockRemote::available(MockJob::gated(json!({"ok": true}), 0.66, gate.clone()));
    let bridge = Arc::new(bridge_over(remote.clone()));

    let first = {
        let bridge = bridge.clone();
        let job = make_job("sample_count", None, None, "", RequestOptions::default()).unwrap();
        tokio::spawn(async move { bridge.submit_job(&job).await })
    };

    // Let the first submission register its handle and reach the await
    // on the gated job.
    let mut progress = 1.0;
    for _ in 0..200 {
        progress = bridge.snapshot().await.progress;
        if progress == 0.66 {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(progress, 0.66, "first submission never became trackable");

    let job = make_job("sample_count", None, None, "", RequestOptions::default()).unwrap();
    let err = bridge.submit_job(&job).await.unwrap_err();
    assert!(matches!(err, BridgeError::Busy));

    gate.notify_one();
    let result = first.await.unwrap().unwrap();
    assert_eq!(retrieve_results(&result).unwrap(), json!({"ok": true}));

    // Back to idle: a new submission is accepted.
    assert!(!bridge.in_flight());
    assert_eq!(bridge.snapshot().await.progress, 1.0);
    *remote.job.lock().unwrap() = MockJob::succeeding(json!({"ok": 2}));
    let job = make_job("sample_count", None, None, "", RequestOptions::default()).unwrap();
    bridge.submit_job(&job).await.unwrap();
    assert_eq!(remote.dispatch_count(), 2);
}

#[tokio::test]
async fn test_remote_failure_translated_into_error_result() {
    let remote = MockRemote::available(MockJob::failing("photon source drift"));
    let bridge = bridge_over(remote.clone());

    let job = make_job(
        "sample_count",
        None,
        None,
        "",
        RequestOptions {
            job_context: Some(json!({"sweep": 3})),
            ..Default::default()
        },
    )
    .unwrap();

    // Submit itself returns without error.
    let result = bridge.submit_job(&job).await.unwrap();

    let decoded: Value = read_meta(&result, keys::RESULTS).unwrap().unwrap();
    assert_eq!(decoded, json!({"error": "photon source drift"}));
    // Context is only attached on success.
    assert!(result.job_context.is_none());
    assert!(!bridge.in_flight());
}

#[tokio::test]
async fn test_job_context_attached_on_success() {
    let remote = MockRemote::available(MockJob::succeeding(json!([1, 2, 3])));
    let bridge = bridge_over(remote);

    let job = make_job(
        "sample_count",
        None,
        None,
        "",
        RequestOptions {
            job_context: Some(json!({"sweep": 3})),
            ..Default::default()
        },
    )
    .unwrap();

    let result = bridge.submit_job(&job).await.unwrap();
    assert_eq!(result.job_context, Some(json!({"sweep": 3})));
}

#[tokio::test]
async fn test_circuit_takes_precedence_over_embedded_payload() {
    let remote = MockRemote::available(MockJob::succeeding(Value::Null));
    let bridge = bridge_over(remote.clone());

    let mut job = make_job("probs", None, None, "", RequestOptions::default()).unwrap();
    job.circuit = Some(Circuit::bell());
    job.shots = Some(500);

    bridge.submit_job(&job).await.unwrap();

    let dispatched = remote.last_request().unwrap();
    assert_eq!(dispatched.payload.command, SAMPLE_COUNT_COMMAND);
    assert_eq!(dispatched.payload.max_samples, Some(500));
}

#[tokio::test]
async fn test_dispatch_fault_propagates_and_resets_state() {
    let remote = MockRemote::available(MockJob::succeeding(Value::Null)).failing_dispatch();
    let bridge = bridge_over(remote.clone());

    let job = make_job("sample_count", None, None, "", RequestOptions::default()).unwrap();
    let err = bridge.submit_job(&job).await.unwrap_err();

    assert!(matches!(err, BridgeError::Transport(_)));
    assert!(!bridge.in_flight());

    // A later submission is accepted once the fault clears.
    remote.fail_dispatch.store(false, Ordering::SeqCst);
    bridge.submit_job(&job).await.unwrap();
    assert_eq!(remote.dispatch_count(), 1);
}

#[tokio::test]
async fn test_snapshot_degrades_to_unreachable() {
    let remote = MockRemote::available(MockJob::succeeding(Value::Null)).failing_details();
    let bridge = bridge_over(remote).with_platform_type(PlatformType::Simulated);

    let snapshot = bridge.snapshot().await;

    assert_eq!(snapshot.status, "unreachable");
    assert!(snapshot.performance.is_none());
    assert!(snapshot.waiting_jobs.is_none());
    assert_eq!(snapshot.progress, 1.0);
}

#[tokio::test]
async fn test_snapshot_merges_live_performance_for_physical() {
    let local = json!({"transmittance": 0.05, "g2": 0.01})
        .as_object()
        .unwrap()
        .clone();
    let live = json!({"g2": 0.02, "hom_visibility": 0.93})
        .as_object()
        .unwrap()
        .clone();

    let remote = MockRemote::available(MockJob::succeeding(Value::Null))
        .with_performance(live)
        .with_waiting_jobs(4);
    let bridge = bridge_over(remote)
        .with_platform_type(PlatformType::Physical)
        .with_specs(json!({"modes": 12}))
        .with_performance(local);

    let snapshot = bridge.snapshot().await;

    let perf = snapshot.performance.unwrap();
    // Live fields override the cached record; untouched fields survive.
    assert_eq!(perf["transmittance"], json!(0.05));
    assert_eq!(perf["g2"], json!(0.02));
    assert_eq!(perf["hom_visibility"], json!(0.93));
    assert_eq!(snapshot.waiting_jobs, Some(4));
    assert_eq!(snapshot.specs, json!({"modes": 12}));
    assert_eq!(snapshot.platform_type, PlatformType::Physical);
}

#[tokio::test]
async fn test_snapshot_roundtrips_through_specs_sheet() {
    let remote = MockRemote::available(MockJob::succeeding(Value::Null)).with_waiting_jobs(2);
    let bridge = bridge_over(remote).with_specs(json!({"modes": 8}));

    let sheet = bridge.get_specs().await.unwrap();
    let snapshot = bifrost_types::HardwareSnapshot::retrieve(&sheet).unwrap();

    assert_eq!(snapshot.specs, json!({"modes": 8}));
    assert_eq!(snapshot.status, "available");
    assert_eq!(snapshot.waiting_jobs, Some(2));
    assert_eq!(snapshot.progress, 1.0);
}
