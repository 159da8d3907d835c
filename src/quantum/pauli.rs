// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pauli strings, the n-qubit Pauli basis, and weighted Pauli sums.
//!
//! Basis index `k` enumerates labels in base 4 with `I=0, X=1, Y=2, Z=3`;
//! the leftmost label character belongs to the highest qubit, so for two
//! qubits the order is `II, IX, IY, IZ, XI, ...`.
//!
//! Expectation values are computed without building dense matrices: a Pauli
//! string maps `|i⟩` to `phase(i) |i ⊕ x_mask⟩`.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::ops::{c64, kron};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    fn from_digit(digit: usize) -> Self {
        match digit & 3 {
            0 => Pauli::I,
            1 => Pauli::X,
            2 => Pauli::Y,
            _ => Pauli::Z,
        }
    }

    fn symbol(&self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// 2×2 matrix.
    pub fn matrix(&self) -> Array2<Complex64> {
        let zero = c64(0.0, 0.0);
        let one = c64(1.0, 0.0);
        let i = c64(0.0, 1.0);
        match self {
            Pauli::I => ndarray::array![[one, zero], [zero, one]],
            Pauli::X => ndarray::array![[zero, one], [one, zero]],
            Pauli::Y => ndarray::array![[zero, -i], [i, zero]],
            Pauli::Z => ndarray::array![[one, zero], [zero, -one]],
        }
    }
}

/// Tensor product of single-qubit Paulis, stored by qubit index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PauliString {
    /// `paulis[q]` acts on qubit `q`.
    paulis: Vec<Pauli>,
}

impl PauliString {
    /// Pauli string at position `index` of the `num_qubits`-qubit basis.
    pub fn from_index(index: usize, num_qubits: usize) -> Self {
        let paulis = (0..num_qubits)
            .map(|q| Pauli::from_digit(index >> (2 * q)))
            .collect();
        Self { paulis }
    }

    /// Position of this string in the Pauli basis.
    pub fn index(&self) -> usize {
        self.paulis
            .iter()
            .enumerate()
            .map(|(q, p)| {
                let digit = match p {
                    Pauli::I => 0,
                    Pauli::X => 1,
                    Pauli::Y => 2,
                    Pauli::Z => 3,
                };
                digit << (2 * q)
            })
            .sum()
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Label such as `"XZ"` (highest qubit first).
    pub fn label(&self) -> String {
        self.paulis.iter().rev().map(Pauli::symbol).collect()
    }

    /// Bit masks `(x_mask, z_mask)` and the number of `Y` factors.
    fn masks(&self) -> (usize, usize, usize) {
        let mut x_mask = 0;
        let mut z_mask = 0;
        let mut num_y = 0;
        for (q, p) in self.paulis.iter().enumerate() {
            match p {
                Pauli::I => {}
                Pauli::X => x_mask |= 1 << q,
                Pauli::Z => z_mask |= 1 << q,
                Pauli::Y => {
                    x_mask |= 1 << q;
                    z_mask |= 1 << q;
                    num_y += 1;
                }
            }
        }
        (x_mask, z_mask, num_y)
    }

    /// `⟨i ⊕ x_mask| P |i⟩` for every basis index `i`.
    fn phase_fn(&self) -> impl Fn(usize) -> Complex64 {
        let (_, z_mask, num_y) = self.masks();
        let y_phase = match num_y % 4 {
            0 => c64(1.0, 0.0),
            1 => c64(0.0, 1.0),
            2 => c64(-1.0, 0.0),
            _ => c64(0.0, -1.0),
        };
        move |i: usize| {
            if (i & z_mask).count_ones() & 1 == 1 {
                -y_phase
            } else {
                y_phase
            }
        }
    }

    /// Tr(ρ · P) for a density matrix of matching dimension.
    pub fn trace_with(&self, rho: &Array2<Complex64>) -> Complex64 {
        let (x_mask, _, _) = self.masks();
        let phase = self.phase_fn();
        (0..rho.nrows())
            .map(|i| rho[[i, i ^ x_mask]] * phase(i))
            .sum()
    }

    /// ⟨ψ| P |ψ⟩ for a statevector of matching dimension.
    pub fn expectation(&self, psi: &Array1<Complex64>) -> f64 {
        let (x_mask, _, _) = self.masks();
        let phase = self.phase_fn();
        let value: Complex64 = (0..psi.len())
            .map(|i| psi[i ^ x_mask].conj() * phase(i) * psi[i])
            .sum();
        value.re
    }

    /// Dense 2^n × 2^n matrix.
    pub fn to_matrix(&self) -> Array2<Complex64> {
        let mut m = Array2::from_elem((1, 1), c64(1.0, 0.0));
        for p in self.paulis.iter().rev() {
            m = kron(&m, &p.matrix());
        }
        m
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PauliString {
    type Err = String;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let paulis = label
            .chars()
            .rev()
            .map(|c| match c.to_ascii_uppercase() {
                'I' => Ok(Pauli::I),
                'X' => Ok(Pauli::X),
                'Y' => Ok(Pauli::Y),
                'Z' => Ok(Pauli::Z),
                other => Err(format!("invalid Pauli symbol '{}'", other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { paulis })
    }
}

/// All `4^n` Pauli strings in basis order.
pub fn pauli_basis(num_qubits: usize) -> Vec<PauliString> {
    (0..1usize << (2 * num_qubits))
        .map(|k| PauliString::from_index(k, num_qubits))
        .collect()
}

/// Real-weighted sum of Pauli strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<(PauliString, f64)>,
}

impl SparsePauliOp {
    /// Build from `(basis index, coefficient)` pairs.
    pub fn from_indices(num_qubits: usize, terms: &[(usize, f64)]) -> Self {
        Self {
            num_qubits,
            terms: terms
                .iter()
                .map(|&(k, w)| (PauliString::from_index(k, num_qubits), w))
                .collect(),
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[(PauliString, f64)] {
        &self.terms
    }

    /// `(label, coefficient)` pairs.
    pub fn to_list(&self) -> Vec<(String, f64)> {
        self.terms.iter().map(|(p, w)| (p.label(), *w)).collect()
    }

    /// ⟨ψ| Σ w_k P_k |ψ⟩
    pub fn expectation(&self, psi: &Array1<Complex64>) -> f64 {
        self.terms
            .iter()
            .map(|(p, w)| w * p.expectation(psi))
            .sum()
    }

    /// Dense matrix of the full sum.
    pub fn to_matrix(&self) -> Array2<Complex64> {
        let d = 1 << self.num_qubits;
        let mut m = Array2::zeros((d, d));
        for (p, w) in &self.terms {
            m = m + p.to_matrix() * c64(*w, 0.0);
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::ops::{max_abs_diff, outer, trace};
    use approx::assert_relative_eq;

    #[test]
    fn test_basis_order_two_qubits() {
        let labels: Vec<String> = pauli_basis(2).iter().map(|p| p.label()).collect();
        assert_eq!(&labels[..6], &["II", "IX", "IY", "IZ", "XI", "XX"]);
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[15], "ZZ");
    }

    #[test]
    fn test_index_label_round_trip() {
        for k in 0..64 {
            let p = PauliString::from_index(k, 3);
            assert_eq!(p.index(), k);
            let parsed: PauliString = p.label().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn test_trace_with_matches_dense_product() {
        // Arbitrary Hermitian 2-qubit matrix.
        let mut rho = Array2::zeros((4, 4));
        for i in 0..4 {
            for j in 0..4 {
                let v = c64((i + 2 * j) as f64 * 0.1, (i as f64 - j as f64) * 0.07);
                rho[[i, j]] = v;
            }
        }
        let rho = &rho + &crate::quantum::ops::dagger(&rho);
        for p in pauli_basis(2) {
            let dense = trace(&rho.dot(&p.to_matrix()));
            let fast = p.trace_with(&rho);
            assert!((dense - fast).norm() < 1e-12, "mismatch for {}", p);
        }
    }

    #[test]
    fn test_expectation_matches_dense() {
        let psi = Array1::from(vec![
            c64(0.5, 0.0),
            c64(0.0, 0.5),
            c64(-0.5, 0.0),
            c64(0.0, -0.5),
        ]);
        let rho = outer(&psi);
        for p in pauli_basis(2) {
            let dense = trace(&rho.dot(&p.to_matrix())).re;
            assert_relative_eq!(p.expectation(&psi), dense, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sparse_op_to_matrix() {
        let op = SparsePauliOp::from_indices(1, &[(0, 0.5), (3, 0.5)]);
        // (I + Z) / 2 = |0⟩⟨0|
        let expected = outer(&Array1::from(vec![c64(1.0, 0.0), c64(0.0, 0.0)]));
        assert!(max_abs_diff(&op.to_matrix(), &expected) < 1e-12);
        assert_eq!(
            op.to_list(),
            vec![("I".to_string(), 0.5), ("Z".to_string(), 0.5)]
        );
    }
}
