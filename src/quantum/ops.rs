// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense complex-matrix helpers shared by the circuit simulator, target
//! resolution and the fidelity measures.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Default tolerance for Hermiticity, unitarity and trace checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Shorthand for a complex literal.
#[inline]
pub fn c64(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// d × d identity.
pub fn identity(d: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(d, c64(1.0, 0.0))
}

/// Conjugate transpose.
pub fn dagger(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|x| x.conj())
}

/// Matrix trace.
pub fn trace(m: &Array2<Complex64>) -> Complex64 {
    (0..m.nrows().min(m.ncols())).map(|i| m[[i, i]]).sum()
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Array2::zeros((ar * br, ac * bc));
    for i in 0..ar {
        for j in 0..ac {
            let aij = a[[i, j]];
            for k in 0..br {
                for l in 0..bc {
                    out[[i * br + k, j * bc + l]] = aij * b[[k, l]];
                }
            }
        }
    }
    out
}

/// Number of qubits for a Hilbert-space dimension, if it is a power of two.
pub fn num_qubits_for_dim(dim: usize) -> Option<usize> {
    if dim == 0 || !dim.is_power_of_two() {
        return None;
    }
    Some(dim.trailing_zeros() as usize)
}

/// Largest absolute entry of `a - b`.
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Whether `m` is square and equal to its conjugate transpose.
pub fn is_hermitian(m: &Array2<Complex64>, tol: f64) -> bool {
    m.is_square() && max_abs_diff(m, &dagger(m)) <= tol
}

/// Whether `m` is square and satisfies U†U = I.
pub fn is_unitary(m: &Array2<Complex64>, tol: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let product = dagger(m).dot(m);
    max_abs_diff(&product, &identity(m.nrows())) <= tol
}

/// |ψ⟩⟨ψ|
pub fn outer(psi: &Array1<Complex64>) -> Array2<Complex64> {
    let d = psi.len();
    Array2::from_shape_fn((d, d), |(i, j)| psi[i] * psi[j].conj())
}

/// U ρ U†
pub fn conjugate_by(u: &Array2<Complex64>, rho: &Array2<Complex64>) -> Array2<Complex64> {
    u.dot(rho).dot(&dagger(u))
}

/// |0…0⟩ on `num_qubits` qubits.
pub fn zero_state(num_qubits: usize) -> Array1<Complex64> {
    let mut psi = Array1::zeros(1 << num_qubits);
    psi[0] = c64(1.0, 0.0);
    psi
}

/// Eigen-decomposition of a Hermitian matrix.
///
/// Returns eigenvalues (ascending order is not guaranteed) and the matrix of
/// eigenvectors stored column-wise.
pub fn hermitian_eigh(m: &Array2<Complex64>) -> (Vec<f64>, Array2<Complex64>) {
    let n = m.nrows();
    let dm = DMatrix::<Complex64>::from_fn(n, n, |i, j| m[[i, j]]);
    let eig = dm.symmetric_eigen();
    let values = eig.eigenvalues.iter().copied().collect();
    let vectors = Array2::from_shape_fn((n, n), |(i, j)| eig.eigenvectors[(i, j)]);
    (values, vectors)
}

/// Principal square root of a positive-semidefinite Hermitian matrix.
///
/// Slightly negative eigenvalues from round-off are clamped to zero.
pub fn psd_sqrt(m: &Array2<Complex64>) -> Array2<Complex64> {
    let (values, vectors) = hermitian_eigh(m);
    let n = m.nrows();
    let mut scaled = vectors.clone();
    for j in 0..n {
        let s = values[j].max(0.0).sqrt();
        for i in 0..n {
            scaled[[i, j]] *= s;
        }
    }
    scaled.dot(&dagger(&vectors))
}

/// Purity Tr(ρ²).
pub fn purity(rho: &Array2<Complex64>) -> f64 {
    trace(&rho.dot(rho)).re
}

/// Row-major complex matrix as it appears in YAML/JSON target descriptions:
/// a list of rows, each entry a `[re, im]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<[f64; 2]>>", into = "Vec<Vec<[f64; 2]>>")]
pub struct ComplexMatrix(pub Array2<Complex64>);

impl ComplexMatrix {
    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<Complex64> {
        &self.0
    }
}

impl From<Array2<Complex64>> for ComplexMatrix {
    fn from(m: Array2<Complex64>) -> Self {
        ComplexMatrix(m)
    }
}

impl TryFrom<Vec<Vec<[f64; 2]>>> for ComplexMatrix {
    type Error = String;

    fn try_from(rows: Vec<Vec<[f64; 2]>>) -> Result<Self, Self::Error> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err("matrix rows must all have the same length".into());
        }
        let data: Vec<Complex64> = rows
            .into_iter()
            .flatten()
            .map(|[re, im]| c64(re, im))
            .collect();
        Array2::from_shape_vec((nrows, ncols), data)
            .map(ComplexMatrix)
            .map_err(|e| e.to_string())
    }
}

impl From<ComplexMatrix> for Vec<Vec<[f64; 2]>> {
    fn from(m: ComplexMatrix) -> Self {
        m.0.rows()
            .into_iter()
            .map(|row| row.iter().map(|z| [z.re, z.im]).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pauli_x() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = c64(1.0, 0.0);
        m[[1, 0]] = c64(1.0, 0.0);
        m
    }

    #[test]
    fn test_kron_dimensions_and_values() {
        let k = kron(&pauli_x(), &identity(2));
        assert_eq!(k.dim(), (4, 4));
        assert_eq!(k[[0, 2]], c64(1.0, 0.0));
        assert_eq!(k[[1, 3]], c64(1.0, 0.0));
        assert_eq!(k[[0, 1]], c64(0.0, 0.0));
    }

    #[test]
    fn test_num_qubits_for_dim() {
        assert_eq!(num_qubits_for_dim(1), Some(0));
        assert_eq!(num_qubits_for_dim(8), Some(3));
        assert_eq!(num_qubits_for_dim(6), None);
        assert_eq!(num_qubits_for_dim(0), None);
    }

    #[test]
    fn test_hermitian_and_unitary_checks() {
        let x = pauli_x();
        assert!(is_hermitian(&x, DEFAULT_TOLERANCE));
        assert!(is_unitary(&x, DEFAULT_TOLERANCE));

        let mut not_herm = x.clone();
        not_herm[[0, 1]] = c64(0.0, 1.0);
        assert!(!is_hermitian(&not_herm, DEFAULT_TOLERANCE));
        assert!(!is_unitary(&Array2::zeros((2, 2)), DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_psd_sqrt_squares_back() {
        let mut rho = Array2::zeros((2, 2));
        rho[[0, 0]] = c64(0.75, 0.0);
        rho[[0, 1]] = c64(0.25, 0.0);
        rho[[1, 0]] = c64(0.25, 0.0);
        rho[[1, 1]] = c64(0.25, 0.0);
        let root = psd_sqrt(&rho);
        assert!(max_abs_diff(&root.dot(&root), &rho) < 1e-10);
    }

    #[test]
    fn test_purity_of_pure_and_mixed_states() {
        assert_relative_eq!(purity(&outer(&zero_state(2))), 1.0, epsilon = 1e-12);
        let mixed = identity(2).mapv(|z| z * 0.5);
        assert_relative_eq!(purity(&mixed), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_matrix_serde_round_trip() {
        let m = ComplexMatrix(pauli_x());
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[[0.0,0.0],[1.0,0.0]],[[1.0,0.0],[0.0,0.0]]]");
        let back: ComplexMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_complex_matrix_rejects_ragged_rows() {
        let result = serde_json::from_str::<ComplexMatrix>("[[[1.0,0.0]],[[0.0,0.0],[1.0,0.0]]]");
        assert!(result.is_err());
    }
}
