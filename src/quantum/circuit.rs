// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parametrized quantum circuits and a dense statevector simulator.
//!
//! Circuit parameters are positions in the action vector: an instruction
//! angle is either a fixed value or `scale * action[index] + offset`.
//! Binding an action vector produces a circuit with only fixed angles.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::gates::StandardGate;
use super::ops::{
    c64, is_unitary, num_qubits_for_dim, zero_state, ComplexMatrix, DEFAULT_TOLERANCE,
};
use crate::error::{Error, Result};

fn default_scale() -> f64 {
    1.0
}

/// Angle of a parametrized instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamExpr {
    /// Fixed angle
    Value(f64),
    /// Affine function of one action component
    Parameter {
        index: usize,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        offset: f64,
    },
}

impl ParamExpr {
    /// Plain reference to action component `index`.
    pub fn parameter(index: usize) -> Self {
        ParamExpr::Parameter {
            index,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Evaluate against an action vector.
    pub fn evaluate(&self, values: &[f64]) -> Result<f64> {
        match self {
            ParamExpr::Value(v) => Ok(*v),
            ParamExpr::Parameter {
                index,
                scale,
                offset,
            } => values
                .get(*index)
                .map(|v| scale * v + offset)
                .ok_or_else(|| {
                    Error::dimension(
                        index + 1,
                        values.len(),
                        format!("parameter {} is not bound", index),
                    )
                }),
        }
    }

    fn max_index(&self) -> Option<usize> {
        match self {
            ParamExpr::Value(_) => None,
            ParamExpr::Parameter { index, .. } => Some(*index),
        }
    }
}

impl From<f64> for ParamExpr {
    fn from(v: f64) -> Self {
        ParamExpr::Value(v)
    }
}

/// Gate applied by an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    /// Named gate from the standard library
    Standard(StandardGate),
    /// Explicit unitary
    Unitary { label: String, matrix: ComplexMatrix },
}

impl Operation {
    fn num_qubits(&self) -> Option<usize> {
        match self {
            Operation::Standard(g) => Some(g.num_qubits()),
            Operation::Unitary { matrix, .. } => num_qubits_for_dim(matrix.0.nrows()),
        }
    }

    fn num_params(&self) -> usize {
        match self {
            Operation::Standard(g) => g.num_params(),
            Operation::Unitary { .. } => 0,
        }
    }
}

/// One gate application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Gate
    pub gate: Operation,
    /// Qubit arguments, first argument least significant
    pub qubits: Vec<usize>,
    /// Angles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamExpr>,
}

impl Instruction {
    fn matrix(&self, values: &[f64]) -> Result<Array2<Complex64>> {
        match &self.gate {
            Operation::Standard(g) => {
                let angles = self
                    .params
                    .iter()
                    .map(|p| p.evaluate(values))
                    .collect::<Result<Vec<f64>>>()?;
                Ok(g.matrix(&angles))
            }
            Operation::Unitary { matrix, .. } => Ok(matrix.0.clone()),
        }
    }
}

/// Quantum circuit on `num_qubits` virtual qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            instructions: Vec::new(),
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of action components referenced (highest index + 1).
    pub fn num_parameters(&self) -> usize {
        self.instructions
            .iter()
            .flat_map(|inst| inst.params.iter())
            .filter_map(ParamExpr::max_index)
            .map(|i| i + 1)
            .max()
            .unwrap_or(0)
    }

    /// Check qubit arguments, arity and angle count of every instruction.
    pub fn validate(&self) -> Result<()> {
        for inst in &self.instructions {
            self.check_instruction(inst)?;
        }
        Ok(())
    }

    fn check_instruction(&self, inst: &Instruction) -> Result<()> {
        let arity = inst.gate.num_qubits().ok_or_else(|| {
            Error::InvalidType("unitary gate dimension is not a power of two".into())
        })?;
        if arity != inst.qubits.len() {
            return Err(Error::dimension(
                arity,
                inst.qubits.len(),
                "gate arity vs qubit arguments",
            ));
        }
        if let Some(&q) = inst.qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(Error::dimension(
                self.num_qubits,
                q + 1,
                "qubit argument outside circuit",
            ));
        }
        for (i, q) in inst.qubits.iter().enumerate() {
            if inst.qubits[..i].contains(q) {
                return Err(Error::Config(format!("duplicate qubit argument {}", q)));
            }
        }
        if inst.gate.num_params() != inst.params.len() {
            return Err(Error::dimension(
                inst.gate.num_params(),
                inst.params.len(),
                "gate angle count",
            ));
        }
        if let Operation::Unitary { label, matrix } = &inst.gate {
            if !is_unitary(&matrix.0, DEFAULT_TOLERANCE) {
                return Err(Error::InvalidType(format!("gate '{}' is not unitary", label)));
            }
        }
        Ok(())
    }

    /// Append a validated instruction.
    pub fn append(&mut self, inst: Instruction) -> Result<&mut Self> {
        self.check_instruction(&inst)?;
        self.instructions.push(inst);
        Ok(self)
    }

    /// Append a standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: &[usize],
        params: Vec<ParamExpr>,
    ) -> Result<&mut Self> {
        self.append(Instruction {
            gate: Operation::Standard(gate),
            qubits: qubits.to_vec(),
            params,
        })
    }

    /// Append an explicit unitary.
    pub fn unitary(
        &mut self,
        label: &str,
        matrix: Array2<Complex64>,
        qubits: &[usize],
    ) -> Result<&mut Self> {
        self.append(Instruction {
            gate: Operation::Unitary {
                label: label.to_string(),
                matrix: ComplexMatrix(matrix),
            },
            qubits: qubits.to_vec(),
            params: Vec::new(),
        })
    }

    /// `self` followed by `other` on the same qubits.
    pub fn compose(&self, other: &Circuit) -> Result<Circuit> {
        if other.num_qubits != self.num_qubits {
            return Err(Error::dimension(
                self.num_qubits,
                other.num_qubits,
                "composed circuit width",
            ));
        }
        let mut out = self.clone();
        out.instructions.extend(other.instructions.iter().cloned());
        Ok(out)
    }

    /// Replace every parameter reference by its value.
    pub fn bind(&self, values: &[f64]) -> Result<Circuit> {
        let instructions = self
            .instructions
            .iter()
            .map(|inst| {
                let params = inst
                    .params
                    .iter()
                    .map(|p| p.evaluate(values).map(ParamExpr::Value))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Instruction {
                    gate: inst.gate.clone(),
                    qubits: inst.qubits.clone(),
                    params,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Circuit {
            num_qubits: self.num_qubits,
            instructions,
        })
    }

    /// Final state after running the circuit on `initial`.
    pub fn evolve(
        &self,
        initial: &Array1<Complex64>,
        values: &[f64],
    ) -> Result<Array1<Complex64>> {
        let dim = 1usize << self.num_qubits;
        if initial.len() != dim {
            return Err(Error::dimension(dim, initial.len(), "statevector length"));
        }
        let mut psi = initial.clone();
        for inst in &self.instructions {
            let m = inst.matrix(values)?;
            apply_matrix(&mut psi, &m, &inst.qubits);
        }
        Ok(psi)
    }

    /// Final state after running the circuit on |0…0⟩.
    pub fn statevector(&self, values: &[f64]) -> Result<Array1<Complex64>> {
        self.evolve(&zero_state(self.num_qubits), values)
    }

    /// Unitary implemented by the circuit.
    pub fn to_unitary(&self, values: &[f64]) -> Result<Array2<Complex64>> {
        let dim = 1usize << self.num_qubits;
        let mut u = Array2::zeros((dim, dim));
        for col in 0..dim {
            let mut basis = Array1::zeros(dim);
            basis[col] = c64(1.0, 0.0);
            let out = self.evolve(&basis, values)?;
            u.column_mut(col).assign(&out);
        }
        Ok(u)
    }
}

/// Apply a `2^k × 2^k` matrix to qubits `qubits` of a statevector in place.
fn apply_matrix(psi: &mut Array1<Complex64>, m: &Array2<Complex64>, qubits: &[usize]) {
    let k = qubits.len();
    let sub_dim = 1usize << k;
    let mask: usize = qubits.iter().map(|q| 1usize << q).sum();
    let mut amps = vec![c64(0.0, 0.0); sub_dim];
    let mut idx = vec![0usize; sub_dim];

    for base in 0..psi.len() {
        if base & mask != 0 {
            continue;
        }
        for (s, slot) in idx.iter_mut().enumerate() {
            let mut i = base;
            for (j, q) in qubits.iter().enumerate() {
                if (s >> j) & 1 == 1 {
                    i |= 1 << q;
                }
            }
            *slot = i;
        }
        for s in 0..sub_dim {
            amps[s] = psi[idx[s]];
        }
        for r in 0..sub_dim {
            psi[idx[r]] = (0..sub_dim).map(|c| m[[r, c]] * amps[c]).sum();
        }
    }
}

/// Preparation circuit for one element of the Pauli preparation basis.
///
/// `indices[q]` selects the state of qubit `q`: 0 → |0⟩, 1 → |1⟩,
/// 2 → |+⟩, 3 → |+i⟩.
pub fn pauli_preparation_circuit(indices: &[usize]) -> Circuit {
    let mut circuit = Circuit::new(indices.len());
    for (q, &s) in indices.iter().enumerate() {
        let gates: &[StandardGate] = match s {
            0 => &[],
            1 => &[StandardGate::X],
            2 => &[StandardGate::H],
            _ => &[StandardGate::H, StandardGate::S],
        };
        for &g in gates {
            circuit.instructions.push(Instruction {
                gate: Operation::Standard(g),
                qubits: vec![q],
                params: Vec::new(),
            });
        }
    }
    circuit
}
