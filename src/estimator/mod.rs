// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Expectation-value estimators.
//!
//! The environment talks to circuit execution through the synchronous
//! [`Estimator`] trait:
//!
//! - [`StatevectorEstimator`]: local exact simulation
//! - [`BlockingEstimator`]: adapter for asynchronous remote estimators

pub mod blocking;
pub mod statevector;
pub mod r#trait;

pub use blocking::{AsyncEstimator, BlockingEstimator};
pub use r#trait::{Estimator, EstimatorJob, EstimatorRequest};
pub use statevector::StatevectorEstimator;
