// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Target description and resolved target types.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::quantum::ops::num_qubits_for_dim;
use crate::quantum::{Circuit, ComplexMatrix, StandardGate};

/// Target description as supplied by the user (YAML/JSON).
///
/// Exactly one of `gate`, `circuit` or `density_matrix` selects the target
/// kind; `circuit` and `density_matrix` may be combined for a state target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Physical qubit indices; defaults to `0..n`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<Vec<usize>>,
    /// Gate to calibrate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateSpec>,
    /// State preparation circuit (no free parameters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Circuit>,
    /// Target density matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_matrix: Option<ComplexMatrix>,
    /// Input states for gate targets; defaults to the Pauli preparation basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_states: Option<Vec<InputStateSpec>>,
}

impl TargetSpec {
    /// Qubit count the description implies, read without resolving it.
    ///
    /// `None` when the description does not name a width this cheaply.
    pub fn num_qubits(&self) -> Option<usize> {
        if let Some(register) = &self.register {
            return Some(register.len());
        }
        if let Some(gate) = &self.gate {
            return match &gate.matrix {
                Some(matrix) => num_qubits_for_dim(matrix.0.nrows()),
                None => gate
                    .name
                    .parse::<StandardGate>()
                    .ok()
                    .map(|g| g.num_qubits()),
            };
        }
        if let Some(rho) = &self.density_matrix {
            return num_qubits_for_dim(rho.0.nrows());
        }
        self.circuit.as_ref().map(Circuit::num_qubits)
    }
}

/// Gate of a gate target: a standard gate by name or an explicit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    /// Standard gate name, or a label when `matrix` is given
    pub name: String,
    /// Gate angles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Explicit unitary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<ComplexMatrix>,
}

impl GateSpec {
    /// Standard gate without angles.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            matrix: None,
        }
    }
}

/// One explicit input state of a gate target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputStateSpec {
    /// Preparation circuit from |0…0⟩
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Circuit>,
    /// Prepared density matrix; must match the circuit width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_matrix: Option<ComplexMatrix>,
}

/// Kind of calibration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    State,
    Gate,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::State => write!(f, "state"),
            TargetType::Gate => write!(f, "gate"),
        }
    }
}

/// Resolved state target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTarget {
    pub register: Vec<usize>,
    pub density_matrix: Array2<Complex64>,
    /// `chi[k] = Re Tr(ρ P_k)` over the Pauli basis.
    pub chi: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Circuit>,
}

impl StateTarget {
    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.register.len()
    }
}

/// Input state of a gate target together with the ideal gate output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub circuit: Circuit,
    pub density_matrix: Array2<Complex64>,
    pub target_state: StateTarget,
}

/// Resolved gate target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateTarget {
    pub register: Vec<usize>,
    pub gate: GateSpec,
    pub unitary: Array2<Complex64>,
    pub input_states: Vec<InputState>,
}

impl GateTarget {
    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.register.len()
    }
}

/// Resolved calibration target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "lowercase")]
pub enum Target {
    State(StateTarget),
    Gate(GateTarget),
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self {
            Target::State(_) => TargetType::State,
            Target::Gate(_) => TargetType::Gate,
        }
    }

    pub fn register(&self) -> &[usize] {
        match self {
            Target::State(t) => &t.register,
            Target::Gate(t) => &t.register,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.register().len()
    }

    /// Hilbert-space dimension `2^n`.
    pub fn dimension(&self) -> usize {
        1 << self.n_qubits()
    }

    /// Number of candidate input states (1 for a state target).
    pub fn num_input_states(&self) -> usize {
        match self {
            Target::State(_) => 1,
            Target::Gate(t) => t.input_states.len(),
        }
    }
}
