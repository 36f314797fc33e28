//! Minimal gate-level circuit description.
//!
//! The bridge does not compile circuits — it only hands them to a
//! [`CircuitConverter`](https://docs.rs/bifrost-bridge) for translation
//! into the platform's native experiment representation. This type is
//! the seam, not an IR.

use serde::{Deserialize, Serialize};

/// A single gate application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Gate name (e.g. "h", "cx", "rz").
    pub name: String,
    /// Qubits the gate acts on.
    pub qubits: Vec<u32>,
    /// Rotation angle for parametric gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<f64>,
}

impl Gate {
    /// Create a non-parametric gate.
    pub fn new(name: impl Into<String>, qubits: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            qubits,
            param: None,
        }
    }

    /// Create a parametric gate.
    pub fn with_param(name: impl Into<String>, qubits: Vec<u32>, param: f64) -> Self {
        Self {
            name: name.into(),
            qubits,
            param: Some(param),
        }
    }
}

/// A gate-level circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Gates in application order.
    pub gates: Vec<Gate>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Append a gate, builder-style.
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    /// Append a gate in place.
    pub fn push(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    /// A 2-qubit Bell-pair circuit, handy in tests and examples.
    pub fn bell() -> Self {
        Self::new("bell", 2)
            .with_gate(Gate::new("h", vec![0]))
            .with_gate(Gate::new("cx", vec![0, 1]))
    }
}
