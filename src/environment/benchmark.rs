// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Out-of-band fidelity benchmarking.
//!
//! Benchmarks never feed the reward. They compute the true fidelity of the
//! actions of one step, either by simulating the bound circuits directly
//! (circuit level) or from unitaries produced by a [`PulseSimulator`]
//! (pulse level). Elements whose simulation fails are left out of the
//! average.

use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::config::AbstractionLevel;
use crate::error::{BackendError, Error, Result};
use crate::quantum::ops::{is_unitary, outer, zero_state};
use crate::quantum::{average_gate_fidelity, process_fidelity, state_fidelity, Circuit};
use crate::target::{Target, TargetType};

/// Tolerance on unitaries returned by a pulse simulator.
const PULSE_UNITARY_TOLERANCE: f64 = 1e-6;

/// Fidelity record of one benchmarked step.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchmarkRecord {
    Gate {
        avg_fidelity: f64,
        process_fidelity: f64,
        unitaries: Vec<Array2<Complex64>>,
    },
    State {
        fidelity: f64,
        density_matrix: Array2<Complex64>,
    },
}

impl BenchmarkRecord {
    pub fn target_type(&self) -> TargetType {
        match self {
            BenchmarkRecord::Gate { .. } => TargetType::Gate,
            BenchmarkRecord::State { .. } => TargetType::State,
        }
    }

    /// Headline fidelity of the record.
    pub fn fidelity(&self) -> f64 {
        match self {
            BenchmarkRecord::Gate { avg_fidelity, .. } => *avg_fidelity,
            BenchmarkRecord::State { fidelity, .. } => *fidelity,
        }
    }
}

/// Pulse-level simulator producing one unitary per batch element.
pub trait PulseSimulator: Send + Sync {
    /// Simulator name.
    fn name(&self) -> &str;

    /// Simulate `circuit` under each row of `parameter_values`.
    fn simulate(
        &self,
        circuit: &Circuit,
        parameter_values: &Array2<f64>,
    ) -> Vec<std::result::Result<Array2<Complex64>, BackendError>>;
}

/// Computes benchmark records at the configured abstraction level.
#[derive(Clone)]
pub struct BenchmarkTracker {
    level: AbstractionLevel,
    pulse_simulator: Option<Arc<dyn PulseSimulator>>,
}

impl BenchmarkTracker {
    pub fn new(level: AbstractionLevel) -> Self {
        Self {
            level,
            pulse_simulator: None,
        }
    }

    /// Attach the simulator used at pulse level.
    pub fn with_pulse_simulator(mut self, simulator: Arc<dyn PulseSimulator>) -> Self {
        self.pulse_simulator = Some(simulator);
        self
    }

    pub fn level(&self) -> AbstractionLevel {
        self.level
    }

    pub fn pulse_simulator(&self) -> Option<&Arc<dyn PulseSimulator>> {
        self.pulse_simulator.as_ref()
    }

    /// Check that a benchmark can run at the configured level.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.level == AbstractionLevel::Pulse && self.pulse_simulator.is_none() {
            return Err(Error::Config(
                "pulse-level benchmarking requires a pulse simulator".into(),
            ));
        }
        Ok(())
    }

    /// Benchmark `circuit` under every row of `actions`.
    ///
    /// Returns `Ok(None)` when no element could be simulated.
    pub fn evaluate(
        &self,
        target: &Target,
        circuit: &Circuit,
        actions: &Array2<f64>,
    ) -> Result<Option<BenchmarkRecord>> {
        let record = match (self.level, target) {
            (AbstractionLevel::Circuit, Target::State(state)) => {
                let states: Vec<Array1<Complex64>> = actions
                    .rows()
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, row)| match circuit.statevector(&row.to_vec()) {
                        Ok(psi) => Some(psi),
                        Err(e) => {
                            warn!(element = i, error = %e, "Excluding element from state benchmark");
                            None
                        }
                    })
                    .collect();
                average_state(&states).map(|rho| BenchmarkRecord::State {
                    fidelity: state_fidelity(&state.density_matrix, &rho),
                    density_matrix: rho,
                })
            }
            (AbstractionLevel::Circuit, Target::Gate(gate)) => {
                let unitaries = actions
                    .rows()
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, row)| match circuit.to_unitary(&row.to_vec()) {
                        Ok(u) => Some(u),
                        Err(e) => {
                            warn!(element = i, error = %e, "Excluding element from gate benchmark");
                            None
                        }
                    })
                    .collect();
                gate_record(&gate.unitary, unitaries)
            }
            (AbstractionLevel::Pulse, _) => {
                let unitaries = self.pulse_unitaries(target.dimension(), circuit, actions)?;
                match target {
                    Target::Gate(gate) => gate_record(&gate.unitary, unitaries),
                    Target::State(state) => {
                        let psi0 = zero_state(target.n_qubits());
                        let states: Vec<Array1<Complex64>> =
                            unitaries.iter().map(|u| u.dot(&psi0)).collect();
                        average_state(&states).map(|rho| BenchmarkRecord::State {
                            fidelity: state_fidelity(&state.density_matrix, &rho),
                            density_matrix: rho,
                        })
                    }
                }
            }
        };

        match &record {
            Some(r) => debug!(level = %self.level, fidelity = r.fidelity(), "Benchmark recorded"),
            None => warn!(level = %self.level, "No batch element could be benchmarked"),
        }
        Ok(record)
    }

    fn pulse_unitaries(
        &self,
        dim: usize,
        circuit: &Circuit,
        actions: &Array2<f64>,
    ) -> Result<Vec<Array2<Complex64>>> {
        let simulator = self.pulse_simulator.as_ref().ok_or_else(|| {
            Error::Config("pulse-level benchmarking requires a pulse simulator".into())
        })?;
        let results = simulator.simulate(circuit, actions);
        if results.len() != actions.nrows() {
            return Err(Error::ContractViolation(format!(
                "pulse simulator '{}' returned {} results for a batch of {}",
                simulator.name(),
                results.len(),
                actions.nrows()
            )));
        }

        Ok(results
            .into_iter()
            .enumerate()
            .filter_map(|(i, result)| match result {
                Ok(u) if u.dim() != (dim, dim) => {
                    warn!(element = i, shape = ?u.dim(), dim, "Pulse unitary has wrong dimension");
                    None
                }
                Ok(u) if !is_unitary(&u, PULSE_UNITARY_TOLERANCE) => {
                    warn!(element = i, "Pulse simulation result is not unitary");
                    None
                }
                Ok(u) => Some(u),
                Err(e) => {
                    warn!(element = i, error = %e, "Pulse simulation failed");
                    None
                }
            })
            .collect())
    }
}

impl std::fmt::Debug for BenchmarkTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkTracker")
            .field("level", &self.level)
            .field(
                "pulse_simulator",
                &self.pulse_simulator.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}

fn gate_record(
    target: &Array2<Complex64>,
    unitaries: Vec<Array2<Complex64>>,
) -> Option<BenchmarkRecord> {
    if unitaries.is_empty() {
        return None;
    }
    let n = unitaries.len() as f64;
    let avg_fidelity = unitaries
        .iter()
        .map(|u| average_gate_fidelity(u, target))
        .sum::<f64>()
        / n;
    let process = unitaries
        .iter()
        .map(|u| process_fidelity(u, target))
        .sum::<f64>()
        / n;
    Some(BenchmarkRecord::Gate {
        avg_fidelity,
        process_fidelity: process,
        unitaries,
    })
}

/// Mean of the pure-state projectors, `None` for an empty batch.
fn average_state(states: &[Array1<Complex64>]) -> Option<Array2<Complex64>> {
    let first = states.first()?;
    let d = first.len();
    let mut rho = Array2::<Complex64>::zeros((d, d));
    for psi in states {
        rho = rho + outer(psi);
    }
    Some(rho.mapv(|z| z / states.len() as f64))
}
