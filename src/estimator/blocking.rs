// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Synchronous adapter for asynchronous (remote) estimators.
//!
//! Remote estimator services submit jobs over the network and are naturally
//! `async`. [`BlockingEstimator`] owns a current-thread tokio runtime and
//! drives one such estimator to completion per call, enforcing an optional
//! timeout. It must not be used from inside another tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use super::r#trait::{Estimator, EstimatorJob, EstimatorRequest};
use crate::error::BackendError;

/// Asynchronous estimator, typically a remote job service.
#[async_trait]
pub trait AsyncEstimator: Send + Sync {
    /// Estimator name.
    fn name(&self) -> &str;

    /// Submit a request and wait for its values.
    async fn submit(&self, request: EstimatorRequest) -> Result<Vec<f64>, BackendError>;

    /// Close the remote session.
    async fn close(&self) {}
}

/// Blocking wrapper around an [`AsyncEstimator`].
pub struct BlockingEstimator<E: AsyncEstimator> {
    inner: Arc<E>,
    runtime: Runtime,
    timeout: Option<Duration>,
}

impl<E: AsyncEstimator> BlockingEstimator<E> {
    /// Wrap `inner` with no timeout.
    pub fn new(inner: E) -> Result<Self, BackendError> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| BackendError::Unavailable(format!("failed to start runtime: {}", e)))?;
        Ok(Self {
            inner: Arc::new(inner),
            runtime,
            timeout: None,
        })
    }

    /// Fail a call that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wrapped estimator.
    pub fn inner(&self) -> &Arc<E> {
        &self.inner
    }
}

impl<E: AsyncEstimator> Estimator for BlockingEstimator<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn run(&self, request: &EstimatorRequest) -> Result<EstimatorJob, BackendError> {
        request.check_shape()?;
        let tag = request.tag.clone();
        let submission = self.inner.submit(request.clone());
        debug!(
            estimator = self.inner.name(),
            batch = request.batch_size(),
            tag = ?tag,
            "Submitting estimator job"
        );

        let outcome = match self.timeout {
            Some(limit) => self
                .runtime
                .block_on(async { tokio::time::timeout(limit, submission).await })
                .unwrap_or_else(|_| {
                    warn!(estimator = self.inner.name(), ?limit, "Estimator job timed out");
                    Err(BackendError::Timeout(format!(
                        "estimator '{}' exceeded {:?}",
                        self.inner.name(),
                        limit
                    )))
                }),
            None => self.runtime.block_on(submission),
        };

        Ok(match outcome {
            Ok(values) => EstimatorJob::completed(tag, values),
            Err(e) => EstimatorJob::failed(tag, e),
        })
    }

    fn close(&self) {
        self.runtime.block_on(self.inner.close());
    }
}
