// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for environment tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ndarray::Array2;
use num_complex::Complex64;

use crate::environment::PulseSimulator;
use crate::error::BackendError;
use crate::estimator::{Estimator, EstimatorJob, EstimatorRequest};
use crate::quantum::Circuit;

/// Mock estimator returning the same value for every batch element.
pub struct ConstantEstimator {
    pub value: f64,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<EstimatorRequest>>,
}

impl ConstantEstimator {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn shared(value: f64) -> Arc<Self> {
        Arc::new(Self::new(value))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<EstimatorRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Estimator for ConstantEstimator {
    fn name(&self) -> &str {
        "constant"
    }

    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(EstimatorJob::completed(
            request.tag.clone(),
            vec![self.value; request.batch_size()],
        ))
    }
}

/// Mock estimator that returns one value too few.
pub struct WrongLengthEstimator;

impl Estimator for WrongLengthEstimator {
    fn name(&self) -> &str {
        "wrong_length"
    }

    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError> {
        let n = request.batch_size().saturating_sub(1);
        Ok(EstimatorJob::completed(request.tag.clone(), vec![0.0; n]))
    }
}

/// Mock estimator whose jobs always fail.
pub struct FailingEstimator;

impl Estimator for FailingEstimator {
    fn name(&self) -> &str {
        "failing"
    }

    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError> {
        Ok(EstimatorJob::failed(
            request.tag.clone(),
            BackendError::ExecutionFailed("mock failure".into()),
        ))
    }
}

/// Mock pulse simulator returning a fixed unitary.
pub struct MockPulseSimulator {
    pub unitary: Array2<Complex64>,
    pub fail_first: usize,
}

impl MockPulseSimulator {
    pub fn new(unitary: Array2<Complex64>) -> Self {
        Self {
            unitary,
            fail_first: 0,
        }
    }

    /// Fail the first `n` batch elements.
    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }
}

impl PulseSimulator for MockPulseSimulator {
    fn name(&self) -> &str {
        "mock_pulse"
    }

    fn simulate(
        &self,
        _circuit: &Circuit,
        parameter_values: &Array2<f64>,
    ) -> Vec<Result<Array2<Complex64>, BackendError>> {
        (0..parameter_values.nrows())
            .map(|i| {
                if i < self.fail_first {
                    Err(BackendError::ExecutionFailed("mock solver diverged".into()))
                } else {
                    Ok(self.unitary.clone())
                }
            })
            .collect()
    }
}
