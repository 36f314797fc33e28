//! Hardware snapshot — a point-in-time aggregation of platform specs,
//! status, performance, and progress.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carrier::HardwareSpecs;
use crate::error::MetaResult;
use crate::meta::{keys, read_meta, require_meta, write_meta};

/// Kind of processing platform behind a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformType {
    /// Real hardware. Carries a performance record.
    Physical,
    /// A hosted simulator. No performance record.
    Simulated,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Physical => write!(f, "PHYSICAL"),
            PlatformType::Simulated => write!(f, "SIMULATED"),
        }
    }
}

/// Composite specs/status/performance/progress snapshot.
///
/// **Invariants:**
/// - `performance` is populated only when `platform_type` is
///   [`PlatformType::Physical`].
/// - `progress` is `1.0` whenever no job is in flight; otherwise it is
///   the live progress of the tracked job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSnapshot {
    /// Platform specs, static for the lifetime of the bridge.
    pub specs: Value,
    /// Physical hardware or hosted simulator.
    pub platform_type: PlatformType,
    /// Performance record (physical platforms only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<serde_json::Map<String, Value>>,
    /// Live platform status ("available", "maintenance", "unreachable", …).
    pub status: String,
    /// Progress of the tracked job in `[0, 1]`; `1.0` when idle.
    pub progress: f64,
    /// Queue depth, when the remote service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_jobs: Option<u32>,
}

impl HardwareSnapshot {
    /// Encode the snapshot into an envelope-carrying specs sheet.
    ///
    /// Optional fields are written only when present, so their absence
    /// survives the round trip.
    pub fn encode(&self) -> MetaResult<HardwareSpecs> {
        let mut sheet = HardwareSpecs::new();
        write_meta(&mut sheet, keys::SPECS, &self.specs)?;
        write_meta(&mut sheet, keys::PLATFORM_TYPE, &self.platform_type)?;
        write_meta(&mut sheet, keys::STATUS, &self.status)?;
        write_meta(&mut sheet, keys::PROGRESS, &self.progress)?;
        if let Some(perf) = &self.performance {
            write_meta(&mut sheet, keys::PERFORMANCE, perf)?;
        }
        if let Some(waiting) = self.waiting_jobs {
            write_meta(&mut sheet, keys::WAITING_JOBS, &waiting)?;
        }
        Ok(sheet)
    }

    /// Decode a snapshot from a specs sheet.
    ///
    /// Fails with a provenance error when the sheet did not come from a
    /// bridge specs query.
    pub fn retrieve(sheet: &HardwareSpecs) -> MetaResult<Self> {
        let specs = require_meta(sheet, keys::SPECS, "hardware specs")?;
        let platform_type = require_meta(sheet, keys::PLATFORM_TYPE, "hardware specs")?;
        let status = read_meta(sheet, keys::STATUS)?.unwrap_or_else(|| "unknown".to_string());
        let progress = read_meta(sheet, keys::PROGRESS)?.unwrap_or(1.0);
        let performance = read_meta(sheet, keys::PERFORMANCE)?;
        let waiting_jobs = read_meta(sheet, keys::WAITING_JOBS)?;

        Ok(Self {
            specs,
            platform_type,
            performance,
            status,
            progress,
            waiting_jobs,
        })
    }
}
