// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Direct Fidelity Estimation (DFE) Pauli sampling.
//!
//! Pauli indices are drawn with probability `p(k) ∝ chi[k]²`. Each distinct
//! draw gets a weight `c · chi[k] / (d · p(k))`, so a single weighted draw
//! has expectation `c · F` for a pure target. The observable sums the
//! distinct draws.
//!
//! # Example
//!
//! ```
//! use qubit_os_rlenv::dfe::DfeSampler;
//! use rand::SeedableRng;
//!
//! let sampler = DfeSampler::new(10, 0.5).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! // |0⟩⟨0| = (I + Z) / 2
//! let sample = sampler.sample(&[1.0, 0.0, 0.0, 1.0], &mut rng).unwrap();
//! assert!(sample.weights.iter().all(|&w| (w - 0.5).abs() < 1e-12));
//! ```

use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::quantum::SparsePauliOp;

/// Default number of decimal digits kept in the reward weights.
pub const DEFAULT_WEIGHT_PRECISION: u32 = 5;

/// Largest supported rounding precision.
pub const MAX_WEIGHT_PRECISION: u32 = 15;

/// Pauli sampler for one target.
#[derive(Debug, Clone)]
pub struct DfeSampler {
    sampling_budget: usize,
    reward_scale: f64,
    precision: u32,
}

/// Outcome of one sampling round.
#[derive(Debug, Clone)]
pub struct DfeSample {
    /// Distinct Pauli indices, ascending
    pub indices: Vec<usize>,
    /// Number of draws per index
    pub counts: Vec<usize>,
    /// Rounded reward weight per index
    pub weights: Vec<f64>,
    /// `Σ w_k P_k`
    pub observable: SparsePauliOp,
}

impl DfeSample {
    /// Number of distinct Pauli operators drawn.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no Pauli operator was drawn.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl DfeSampler {
    /// Create a sampler drawing `sampling_budget` indices per round.
    pub fn new(sampling_budget: usize, reward_scale: f64) -> Result<Self> {
        if sampling_budget == 0 {
            return Err(Error::Config("sampling_budget must be >= 1".into()));
        }
        if !reward_scale.is_finite() || reward_scale <= 0.0 {
            return Err(Error::Config(format!(
                "reward_scale must be finite and > 0, got {}",
                reward_scale
            )));
        }
        Ok(Self {
            sampling_budget,
            reward_scale,
            precision: DEFAULT_WEIGHT_PRECISION,
        })
    }

    /// Set the number of decimal digits kept in the weights.
    pub fn with_precision(mut self, precision: u32) -> Result<Self> {
        if precision > MAX_WEIGHT_PRECISION {
            return Err(Error::Config(format!(
                "weight precision must be <= {}, got {}",
                MAX_WEIGHT_PRECISION, precision
            )));
        }
        self.precision = precision;
        Ok(self)
    }

    pub fn sampling_budget(&self) -> usize {
        self.sampling_budget
    }

    pub fn reward_scale(&self) -> f64 {
        self.reward_scale
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Draw Pauli indices for `chi` and build the weighted observable.
    pub fn sample<R: Rng + ?Sized>(&self, chi: &[f64], rng: &mut R) -> Result<DfeSample> {
        let num_qubits = num_qubits_for_chi(chi.len())?;
        let dim = (1usize << num_qubits) as f64;
        let probabilities = sampling_distribution(chi)?;

        let dist = WeightedIndex::new(&probabilities)
            .map_err(|e| Error::Estimation(format!("invalid sampling distribution: {}", e)))?;
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..self.sampling_budget {
            *counts.entry(dist.sample(rng)).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return Err(Error::Estimation("no Pauli index was drawn".into()));
        }

        let mut indices = Vec::with_capacity(counts.len());
        let mut draw_counts = Vec::with_capacity(counts.len());
        let mut weights = Vec::with_capacity(counts.len());
        for (&k, &count) in &counts {
            indices.push(k);
            draw_counts.push(count);
            weights.push(reward_weight(
                chi[k],
                probabilities[k],
                dim,
                self.reward_scale,
                self.precision,
            ));
        }

        let terms: Vec<(usize, f64)> = indices
            .iter()
            .copied()
            .zip(weights.iter().copied())
            .collect();
        let observable = SparsePauliOp::from_indices(num_qubits, &terms);
        debug!(
            draws = self.sampling_budget,
            distinct = indices.len(),
            "Sampled Pauli observables"
        );

        Ok(DfeSample {
            indices,
            counts: draw_counts,
            weights,
            observable,
        })
    }
}

/// Sampling distribution `p(k) = chi[k]² / Σ chi²`.
///
/// For a pure state `Σ chi² = d`, giving the textbook `chi[k]² / d`.
pub fn sampling_distribution(chi: &[f64]) -> Result<Vec<f64>> {
    if chi.iter().any(|c| !c.is_finite()) {
        return Err(Error::Estimation("chi contains non-finite entries".into()));
    }
    let mass: f64 = chi.iter().map(|c| c * c).sum();
    if mass <= 0.0 || !mass.is_finite() {
        return Err(Error::Estimation(format!(
            "chi has no sampling mass (Σ chi² = {})",
            mass
        )));
    }
    Ok(chi.iter().map(|c| c * c / mass).collect())
}

/// `round(scale · chi / (d · p), precision)`
pub fn reward_weight(chi: f64, probability: f64, dim: f64, scale: f64, precision: u32) -> f64 {
    round_to(scale * chi / (dim * probability), precision)
}

/// Round half away from zero to `precision` decimal digits.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn num_qubits_for_chi(len: usize) -> Result<usize> {
    // 4^n has a single set bit at an even position.
    if len == 0 || !len.is_power_of_two() || len.trailing_zeros() % 2 != 0 {
        let mut expected = 1;
        while expected < len {
            expected *= 4;
        }
        return Err(Error::dimension(
            expected,
            len,
            "chi length must be a power of 4",
        ));
    }
    Ok(len.trailing_zeros() as usize / 2)
}
