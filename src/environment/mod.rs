// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! The calibration environment and its reward loop.
//!
//! Each [`QuantumEnvironment::step`] binds a batch of actions into the
//! parametrized circuit, estimates one DFE reward per action through the
//! [`Estimator`], and appends the step to the history. A step either
//! completes and is recorded in full, or fails and records nothing.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ndarray::array;
//! use qubit_os_rlenv::config::EnvironmentConfig;
//! use qubit_os_rlenv::environment::QuantumEnvironment;
//! use qubit_os_rlenv::estimator::StatevectorEstimator;
//! use qubit_os_rlenv::quantum::{Circuit, ParamExpr, StandardGate};
//! use qubit_os_rlenv::target::{GateSpec, TargetSpec};
//!
//! let spec = TargetSpec { gate: Some(GateSpec::named("x")), ..Default::default() };
//! let mut qc = Circuit::new(1);
//! qc.gate(StandardGate::RX, &[0], vec![ParamExpr::parameter(0)]).unwrap();
//!
//! let config = EnvironmentConfig { seed: Some(1), ..Default::default() };
//! let mut env =
//!     QuantumEnvironment::new(&spec, qc, Arc::new(StatevectorEstimator::new()), &config).unwrap();
//! let rewards = env.step(&array![[std::f64::consts::PI], [0.0]], true).unwrap();
//! assert_eq!(rewards.len(), 2);
//! assert_eq!(env.step_tracker(), 1);
//! ```

pub mod benchmark;
pub mod history;
pub mod snapshot;

pub use benchmark::{BenchmarkRecord, BenchmarkTracker, PulseSimulator};
pub use history::{FidelityHistory, HistoryState};
pub use snapshot::EnvironmentSnapshot;

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{EnvironmentConfig, ValidationConfig};
use crate::dfe::DfeSampler;
use crate::error::{Error, Result};
use crate::estimator::{Estimator, EstimatorRequest};
use crate::quantum::Circuit;
use crate::target::{resolve, Target, TargetSpec, TargetType};
use crate::validation::{
    validate_action_batch, validate_num_qubits, validate_shots, validate_target_spec,
};

/// Reinforcement-learning environment for gate or state calibration.
pub struct QuantumEnvironment {
    config: EnvironmentConfig,
    validation: ValidationConfig,
    target: Target,
    parametrized_circuit: Circuit,
    estimator: Arc<dyn Estimator>,
    sampler: DfeSampler,
    benchmark: BenchmarkTracker,
    rng: StdRng,
    history: HistoryState,
    step_tracker: usize,
}

impl QuantumEnvironment {
    /// Resolve `spec` and build an environment around `circuit`.
    pub fn new(
        spec: &TargetSpec,
        circuit: Circuit,
        estimator: Arc<dyn Estimator>,
        config: &EnvironmentConfig,
    ) -> Result<Self> {
        config.validate()?;
        let target = resolve(spec)?;
        Self::from_target(target, circuit, estimator, config)
    }

    /// Like [`new`](Self::new) with validation settings applied.
    ///
    /// In strict mode the qubit limit is checked before the target is
    /// resolved, so an oversized gate never builds its `4^n` input states.
    pub fn with_config(
        spec: &TargetSpec,
        circuit: Circuit,
        estimator: Arc<dyn Estimator>,
        config: &EnvironmentConfig,
        validation: ValidationConfig,
    ) -> Result<Self> {
        if validation.strict {
            validate_target_spec(spec, &validation.limits)?;
        }
        Self::new(spec, circuit, estimator, config)?.with_validation(validation)
    }

    /// Build an environment around an already resolved target.
    pub fn from_target(
        target: Target,
        circuit: Circuit,
        estimator: Arc<dyn Estimator>,
        config: &EnvironmentConfig,
    ) -> Result<Self> {
        config.validate()?;
        circuit.validate()?;
        if circuit.num_qubits() != target.n_qubits() {
            return Err(Error::dimension(
                target.n_qubits(),
                circuit.num_qubits(),
                "parametrized circuit qubits vs target register",
            ));
        }

        let sampler = DfeSampler::new(config.sampling_budget, config.reward_scale)?
            .with_precision(config.weight_precision)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            n_qubits = target.n_qubits(),
            target_type = %target.target_type(),
            num_parameters = circuit.num_parameters(),
            estimator = estimator.name(),
            abstraction_level = %config.abstraction_level,
            "Created quantum environment"
        );

        Ok(Self {
            history: HistoryState::new(target.target_type()),
            benchmark: BenchmarkTracker::new(config.abstraction_level),
            config: config.clone(),
            validation: ValidationConfig::default(),
            target,
            parametrized_circuit: circuit,
            estimator,
            sampler,
            rng,
            step_tracker: 0,
        })
    }

    /// Replace the validation settings.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Result<Self> {
        if validation.strict {
            validate_num_qubits(self.target.n_qubits(), &validation.limits)?;
        }
        self.validation = validation;
        Ok(self)
    }

    /// Attach the simulator used for pulse-level benchmarks.
    pub fn with_pulse_simulator(mut self, simulator: Arc<dyn PulseSimulator>) -> Self {
        self.benchmark = self.benchmark.with_pulse_simulator(simulator);
        self
    }

    /// Run one batch of actions and return one reward per action.
    ///
    /// With `run_benchmark` the true fidelity of the batch is computed and
    /// stored alongside the rewards.
    pub fn step(&mut self, actions: &Array2<f64>, run_benchmark: bool) -> Result<Vec<f64>> {
        let batch_size = actions.nrows();
        let num_parameters = self.parametrized_circuit.num_parameters();
        if actions.ncols() != num_parameters {
            return Err(Error::dimension(
                num_parameters,
                actions.ncols(),
                "action width vs circuit parameters",
            ));
        }
        let total_shots = self.config.total_shots();
        if self.validation.strict {
            validate_action_batch(actions, num_parameters, &self.validation.limits)?;
            validate_shots(total_shots, &self.validation.limits)?;
        }
        if run_benchmark {
            self.benchmark.ensure_ready()?;
        }

        let (run_circuit, chi, input_index) = match &self.target {
            Target::State(state) => (self.parametrized_circuit.clone(), &state.chi, None),
            Target::Gate(gate) => {
                if gate.input_states.is_empty() {
                    return Err(Error::Estimation("gate target has no input states".into()));
                }
                let index = self.rng.gen_range(0..gate.input_states.len());
                let input = &gate.input_states[index];
                (
                    input.circuit.compose(&self.parametrized_circuit)?,
                    &input.target_state.chi,
                    Some(index),
                )
            }
        };
        let sample = self.sampler.sample(chi, &mut self.rng)?;

        let request = EstimatorRequest::broadcast(
            &run_circuit,
            &sample.observable,
            actions.clone(),
            total_shots,
        )
        .with_tag(format!("rl_qoc_step{}", self.step_tracker));
        debug!(
            step = self.step_tracker,
            batch_size,
            input_state = ?input_index,
            paulis = sample.len(),
            shots = total_shots,
            "Submitting step"
        );

        let rewards = self.estimator.run(&request)?.result()?;
        if rewards.len() != batch_size {
            return Err(Error::ContractViolation(format!(
                "estimator '{}' returned {} values for a batch of {}",
                self.estimator.name(),
                rewards.len(),
                batch_size
            )));
        }

        let bound = actions
            .rows()
            .into_iter()
            .map(|row| self.parametrized_circuit.bind(&row.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        let record = if run_benchmark {
            self.benchmark
                .evaluate(&self.target, &self.parametrized_circuit, actions)?
        } else {
            None
        };

        self.history
            .record_step(actions.clone(), rewards.clone(), bound, record)?;
        self.step_tracker += 1;

        let mean = rewards.iter().sum::<f64>() / batch_size.max(1) as f64;
        debug!(step = self.step_tracker, mean_reward = mean, "Step complete");
        Ok(rewards)
    }

    /// Empty every history buffer.
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("Cleared environment history");
    }

    /// Clear the history and restart the step counter.
    pub fn reset(&mut self) {
        self.clear_history();
        self.step_tracker = 0;
    }

    /// Number of completed steps.
    pub fn step_tracker(&self) -> usize {
        self.step_tracker
    }

    pub fn set_step_tracker(&mut self, step: usize) {
        self.step_tracker = step;
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn target_type(&self) -> TargetType {
        self.target.target_type()
    }

    pub fn n_qubits(&self) -> usize {
        self.target.n_qubits()
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn parametrized_circuit(&self) -> &Circuit {
        &self.parametrized_circuit
    }

    pub fn estimator(&self) -> &Arc<dyn Estimator> {
        &self.estimator
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Swap the estimator; history and step counter are kept.
    pub fn set_estimator(&mut self, estimator: Arc<dyn Estimator>) {
        info!(
            from = self.estimator.name(),
            to = estimator.name(),
            "Replaced estimator"
        );
        self.estimator = estimator;
    }

    /// Release the estimator session.
    pub fn close(&self) {
        self.estimator.close();
        info!(estimator = self.estimator.name(), "Closed environment");
    }

    /// Capture configuration, target and history.
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            n_qubits: self.n_qubits(),
            abstraction_level: self.config.abstraction_level,
            sampling_budget: self.config.sampling_budget,
            shots: self.config.shots,
            reward_scale: self.config.reward_scale,
            weight_precision: self.config.weight_precision,
            seed: self.config.seed,
            validation: self.validation.clone(),
            target_type: self.target_type(),
            target: self.target.clone(),
            parametrized_circuit: self.parametrized_circuit.clone(),
            step_tracker: self.step_tracker,
            action_history: self.history.action_history.clone(),
            reward_history: self.history.reward_history.clone(),
            fidelity_history: self.history.fidelity_history().to_vec(),
            history: self.history.clone(),
        }
    }

    /// Rebuild an environment from a snapshot.
    pub fn from_snapshot(
        snapshot: EnvironmentSnapshot,
        estimator: Arc<dyn Estimator>,
    ) -> Result<Self> {
        if snapshot.target.target_type() != snapshot.target_type
            || snapshot.history.target_type() != snapshot.target_type
        {
            return Err(Error::Config(format!(
                "snapshot target type '{}' does not match its target or history",
                snapshot.target_type
            )));
        }
        if snapshot.n_qubits != snapshot.target.n_qubits() {
            return Err(Error::dimension(
                snapshot.target.n_qubits(),
                snapshot.n_qubits,
                "snapshot qubit count vs target register",
            ));
        }

        snapshot.check_history()?;

        let config = snapshot.environment_config();
        let mut env = Self::from_target(
            snapshot.target,
            snapshot.parametrized_circuit,
            estimator,
            &config,
        )?
        .with_validation(snapshot.validation)?;
        env.history = snapshot.history;
        env.step_tracker = snapshot.step_tracker;
        Ok(env)
    }
}

impl fmt::Display for QuantumEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantumEnvironment(n_qubits={}, target_type={}, register={:?}, \
             abstraction_level={}, sampling_budget={}, shots={}, reward_scale={}, \
             estimator={}, steps={})",
            self.n_qubits(),
            self.target_type(),
            self.target.register(),
            self.config.abstraction_level,
            self.config.sampling_budget,
            self.config.shots,
            self.config.reward_scale,
            self.estimator.name(),
            self.step_tracker
        )
    }
}
