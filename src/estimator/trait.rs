// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Estimator trait definition.

use ndarray::Array2;

use crate::error::BackendError;
use crate::quantum::{Circuit, SparsePauliOp};

/// Batched expectation-value request.
///
/// Element `i` asks for `⟨observables[i]⟩` on `circuits[i]` bound to row `i`
/// of `parameter_values`.
#[derive(Debug, Clone)]
pub struct EstimatorRequest {
    /// Parametrized circuits, one per batch element
    pub circuits: Vec<Circuit>,
    /// Observables, one per batch element
    pub observables: Vec<SparsePauliOp>,
    /// Parameter bindings, one row per batch element
    pub parameter_values: Array2<f64>,
    /// Total shots per batch element
    pub shots: u64,
    /// Job tag
    pub tag: Option<String>,
}

impl EstimatorRequest {
    /// Replicate one circuit and one observable across every row of
    /// `parameter_values`.
    pub fn broadcast(
        circuit: &Circuit,
        observable: &SparsePauliOp,
        parameter_values: Array2<f64>,
        shots: u64,
    ) -> Self {
        let batch = parameter_values.nrows();
        Self {
            circuits: vec![circuit.clone(); batch],
            observables: vec![observable.clone(); batch],
            parameter_values,
            shots,
            tag: None,
        }
    }

    /// Attach a job tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Number of batch elements.
    pub fn batch_size(&self) -> usize {
        self.parameter_values.nrows()
    }

    /// Check that circuits, observables and bindings line up.
    pub fn check_shape(&self) -> Result<(), BackendError> {
        let batch = self.batch_size();
        if self.circuits.len() != batch || self.observables.len() != batch {
            return Err(BackendError::InvalidRequest(format!(
                "{} circuits and {} observables for {} parameter rows",
                self.circuits.len(),
                self.observables.len(),
                batch
            )));
        }
        for (i, (c, o)) in self.circuits.iter().zip(&self.observables).enumerate() {
            if c.num_qubits() != o.num_qubits() {
                return Err(BackendError::InvalidRequest(format!(
                    "element {}: circuit has {} qubits, observable {}",
                    i,
                    c.num_qubits(),
                    o.num_qubits()
                )));
            }
        }
        Ok(())
    }
}

/// Handle on a submitted estimator job.
#[derive(Debug)]
pub struct EstimatorJob {
    tag: Option<String>,
    outcome: Result<Vec<f64>, BackendError>,
}

impl EstimatorJob {
    /// Job that finished with `values`.
    pub fn completed(tag: Option<String>, values: Vec<f64>) -> Self {
        Self {
            tag,
            outcome: Ok(values),
        }
    }

    /// Job that failed after submission.
    pub fn failed(tag: Option<String>, error: BackendError) -> Self {
        Self {
            tag,
            outcome: Err(error),
        }
    }

    /// Tag the job was submitted with.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// One expectation value per batch element.
    pub fn result(self) -> Result<Vec<f64>, BackendError> {
        self.outcome
    }
}

/// Expectation-value estimator.
///
/// Timeout and retry policy belong to the implementation; a call either
/// yields a job or fails as a whole.
pub trait Estimator: Send + Sync {
    /// Estimator name.
    fn name(&self) -> &str;

    /// Submit a batched request.
    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError>;

    /// Release any session held by the estimator.
    fn close(&self) {}
}
