// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS RL calibration environment
//!
//! This crate turns "calibrate a quantum gate" or "prepare a quantum state"
//! into a batched reinforcement-learning loop. An agent submits a batch of
//! control parameters; the environment binds them into a parametrized
//! circuit and scores each with a Direct Fidelity Estimation (DFE) reward.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           QuantumEnvironment             │
//! ├──────────────────┬──────────────────────┤
//! │  Target resolver │   DFE Pauli sampler  │
//! ├──────────────────┴──────────────────────┤
//! │     Estimator trait  │  Benchmark tracker│
//! ├──────────────────────┼──────────────────┤
//! │ Statevector / remote │ Pulse simulator  │
//! └──────────────────────┴──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`target`]: Target descriptions and resolution
//! - [`dfe`]: Pauli sampling and reward weights
//! - [`environment`]: Reward loop, history and snapshots
//! - [`estimator`]: Expectation-value estimator trait and implementations
//! - [`quantum`]: Gates, circuits, Pauli operators and fidelities
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod config;
pub mod dfe;
pub mod environment;
pub mod error;
pub mod estimator;
pub mod quantum;
pub mod target;
pub mod validation;

pub use config::Config;
pub use environment::QuantumEnvironment;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
