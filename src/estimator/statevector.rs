// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Exact statevector estimator.
//!
//! Simulates every batch element from |0…0⟩ and returns the exact
//! expectation value. Shots are accepted but not sampled.

use tracing::debug;

use super::r#trait::{Estimator, EstimatorJob, EstimatorRequest};
use crate::error::BackendError;

/// Local noiseless estimator.
#[derive(Debug, Clone)]
pub struct StatevectorEstimator {
    name: String,
}

impl StatevectorEstimator {
    pub fn new() -> Self {
        Self {
            name: "statevector".to_string(),
        }
    }
}

impl Default for StatevectorEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for StatevectorEstimator {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError> {
        request.check_shape()?;
        debug!(
            batch = request.batch_size(),
            tag = ?request.tag,
            "Running statevector estimator"
        );

        let values = request
            .circuits
            .iter()
            .zip(&request.observables)
            .zip(request.parameter_values.rows())
            .map(|((circuit, observable), row)| {
                let params = row.to_vec();
                circuit
                    .statevector(&params)
                    .map(|psi| observable.expectation(&psi))
                    .map_err(|e| BackendError::InvalidRequest(e.to_string()))
            })
            .collect::<Result<Vec<f64>, BackendError>>()?;

        Ok(EstimatorJob::completed(request.tag.clone(), values))
    }
}
