// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Standard gate library.
//!
//! Matrices use the little-endian convention: for a gate acting on qubits
//! `[q0, q1]`, `q0` is the least significant bit of the matrix index.

use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;

use ndarray::{array, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::ops::c64;

/// Named gates understood by the circuit model and the target resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    RX,
    RY,
    RZ,
    CX,
    CZ,
    ECR,
    Swap,
}

impl StandardGate {
    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::ECR | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// Number of angle parameters.
    pub fn num_params(&self) -> usize {
        match self {
            StandardGate::RX | StandardGate::RY | StandardGate::RZ => 1,
            _ => 0,
        }
    }

    /// Gate name as used in target descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "i",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::RX => "rx",
            StandardGate::RY => "ry",
            StandardGate::RZ => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::ECR => "ecr",
            StandardGate::Swap => "swap",
        }
    }

    /// Unitary matrix of the gate.
    ///
    /// `params` must hold exactly [`num_params`](Self::num_params) angles; the
    /// caller is responsible for that check.
    pub fn matrix(&self, params: &[f64]) -> Array2<Complex64> {
        let zero = c64(0.0, 0.0);
        let one = c64(1.0, 0.0);
        let i = c64(0.0, 1.0);
        match self {
            StandardGate::I => array![[one, zero], [zero, one]],
            StandardGate::X => array![[zero, one], [one, zero]],
            StandardGate::Y => array![[zero, -i], [i, zero]],
            StandardGate::Z => array![[one, zero], [zero, -one]],
            StandardGate::H => {
                let h = c64(FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            StandardGate::S => array![[one, zero], [zero, i]],
            StandardGate::Sdg => array![[one, zero], [zero, -i]],
            StandardGate::T => array![[one, zero], [zero, c64(FRAC_1_SQRT_2, FRAC_1_SQRT_2)]],
            StandardGate::Tdg => array![[one, zero], [zero, c64(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)]],
            StandardGate::SX => {
                let p = c64(0.5, 0.5);
                let m = c64(0.5, -0.5);
                array![[p, m], [m, p]]
            }
            StandardGate::RX => {
                let half = params[0] / 2.0;
                let cos = c64(half.cos(), 0.0);
                let isin = c64(0.0, -half.sin());
                array![[cos, isin], [isin, cos]]
            }
            StandardGate::RY => {
                let half = params[0] / 2.0;
                let cos = c64(half.cos(), 0.0);
                let sin = c64(half.sin(), 0.0);
                array![[cos, -sin], [sin, cos]]
            }
            StandardGate::RZ => {
                let ilam2 = c64(0.0, 0.5 * params[0]);
                array![[(-ilam2).exp(), zero], [zero, ilam2.exp()]]
            }
            // Control on the first qubit argument (least significant bit).
            StandardGate::CX => array![
                [one, zero, zero, zero],
                [zero, zero, zero, one],
                [zero, zero, one, zero],
                [zero, one, zero, zero]
            ],
            StandardGate::CZ => array![
                [one, zero, zero, zero],
                [zero, one, zero, zero],
                [zero, zero, one, zero],
                [zero, zero, zero, -one]
            ],
            StandardGate::ECR => {
                let r = c64(FRAC_1_SQRT_2, 0.0);
                let ri = c64(0.0, FRAC_1_SQRT_2);
                array![
                    [zero, r, zero, ri],
                    [r, zero, -ri, zero],
                    [zero, ri, zero, r],
                    [-ri, zero, r, zero]
                ]
            }
            StandardGate::Swap => array![
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one]
            ],
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StandardGate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gate = match s.to_lowercase().as_str() {
            "i" | "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "sx" => StandardGate::SX,
            "rx" => StandardGate::RX,
            "ry" => StandardGate::RY,
            "rz" => StandardGate::RZ,
            "cx" | "cnot" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            "ecr" => StandardGate::ECR,
            "swap" => StandardGate::Swap,
            other => return Err(format!("unknown gate '{}'", other)),
        };
        Ok(gate)
    }
}
