// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fidelity measures used for benchmarking.

use ndarray::Array2;
use num_complex::Complex64;

use super::ops::{dagger, psd_sqrt, purity, trace, DEFAULT_TOLERANCE};

/// Uhlmann state fidelity `(Tr √(√ρ σ √ρ))²`, clamped to `[0, 1]`.
///
/// When either state is pure this reduces to `Tr(ρ σ)`, which avoids the
/// matrix square roots.
pub fn state_fidelity(rho: &Array2<Complex64>, sigma: &Array2<Complex64>) -> f64 {
    let f = if (purity(rho) - 1.0).abs() < DEFAULT_TOLERANCE
        || (purity(sigma) - 1.0).abs() < DEFAULT_TOLERANCE
    {
        trace(&rho.dot(sigma)).re
    } else {
        let sqrt_rho = psd_sqrt(rho);
        let inner = sqrt_rho.dot(sigma).dot(&sqrt_rho);
        let t = trace(&psd_sqrt(&inner)).re;
        t * t
    };
    f.clamp(0.0, 1.0)
}

/// Process fidelity `|Tr(V† U)|² / d²` between two unitaries.
pub fn process_fidelity(unitary: &Array2<Complex64>, target: &Array2<Complex64>) -> f64 {
    let d = unitary.nrows() as f64;
    let overlap = trace(&dagger(target).dot(unitary)).norm_sqr();
    (overlap / (d * d)).clamp(0.0, 1.0)
}

/// Average gate fidelity `(|Tr(V† U)|² + d) / (d² + d)`.
pub fn average_gate_fidelity(unitary: &Array2<Complex64>, target: &Array2<Complex64>) -> f64 {
    let d = unitary.nrows() as f64;
    let overlap = trace(&dagger(target).dot(unitary)).norm_sqr();
    ((overlap + d) / (d * d + d)).clamp(0.0, 1.0)
}
