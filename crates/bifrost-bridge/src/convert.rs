//! Circuit-to-experiment conversion seam.

use serde_json::json;

use bifrost_types::{Circuit, ExperimentRef};

use crate::error::BridgeResult;

/// Translates a gate-level circuit into the platform's native
/// experiment representation.
pub trait CircuitConverter: Send + Sync {
    /// Convert `circuit`, optionally enabling postselection on the
    /// encoded output modes.
    fn convert(&self, circuit: &Circuit, use_postselection: bool) -> BridgeResult<ExperimentRef>;
}

/// Dual-rail photonic encoding: each qubit maps to a pair of adjacent
/// modes, gates to linear-optics components on those modes.
///
/// Deterministic — identical circuits always produce identical
/// experiments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualRailConverter;

impl CircuitConverter for DualRailConverter {
    fn convert(&self, circuit: &Circuit, use_postselection: bool) -> BridgeResult<ExperimentRef> {
        let components: Vec<_> = circuit
            .gates
            .iter()
            .map(|gate| {
                // Qubit q occupies modes 2q and 2q+1.
                let modes: Vec<u32> = gate
                    .qubits
                    .iter()
                    .flat_map(|&q| [2 * q, 2 * q + 1])
                    .collect();
                json!({
                    "kind": gate.name,
                    "modes": modes,
                    "phase": gate.param,
                })
            })
            .collect();

        Ok(ExperimentRef(json!({
            "name": circuit.name,
            "encoding": "dual_rail",
            "modes": 2 * circuit.num_qubits,
            "components": components,
            "postselection": use_postselection,
        })))
    }
}
