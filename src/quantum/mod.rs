// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum primitives: gates, circuits, Pauli operators and fidelities.

pub mod circuit;
pub mod gates;
pub mod measures;
pub mod ops;
pub mod pauli;

pub use circuit::{pauli_preparation_circuit, Circuit, Instruction, Operation, ParamExpr};
pub use gates::StandardGate;
pub use measures::{average_gate_fidelity, process_fidelity, state_fidelity};
pub use ops::ComplexMatrix;
pub use pauli::{pauli_basis, PauliString, SparsePauliOp};
