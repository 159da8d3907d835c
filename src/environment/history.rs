// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-step history buffers.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::benchmark::BenchmarkRecord;
use crate::error::{Error, Result};
use crate::quantum::Circuit;
use crate::target::TargetType;

/// Benchmark history, shaped by the target type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "lowercase")]
pub enum FidelityHistory {
    Gate {
        avg_fidelity_history: Vec<f64>,
        process_fidelity_history: Vec<f64>,
        built_unitaries: Vec<Vec<Array2<Complex64>>>,
    },
    State {
        state_fidelity_history: Vec<f64>,
        density_matrix_history: Vec<Array2<Complex64>>,
    },
}

impl FidelityHistory {
    fn empty(target_type: TargetType) -> Self {
        match target_type {
            TargetType::Gate => FidelityHistory::Gate {
                avg_fidelity_history: Vec::new(),
                process_fidelity_history: Vec::new(),
                built_unitaries: Vec::new(),
            },
            TargetType::State => FidelityHistory::State {
                state_fidelity_history: Vec::new(),
                density_matrix_history: Vec::new(),
            },
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            FidelityHistory::Gate { .. } => TargetType::Gate,
            FidelityHistory::State { .. } => TargetType::State,
        }
    }
}

/// Everything the environment remembers across steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    pub action_history: Vec<Array2<f64>>,
    pub reward_history: Vec<Vec<f64>>,
    pub circuit_history: Vec<Vec<Circuit>>,
    pub fidelity: FidelityHistory,
}

impl HistoryState {
    /// Empty history for a target type.
    pub fn new(target_type: TargetType) -> Self {
        Self {
            action_history: Vec::new(),
            reward_history: Vec::new(),
            circuit_history: Vec::new(),
            fidelity: FidelityHistory::empty(target_type),
        }
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.reward_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reward_history.is_empty()
    }

    pub fn target_type(&self) -> TargetType {
        self.fidelity.target_type()
    }

    /// Headline fidelity per benchmarked step: average gate fidelity for
    /// gate targets, state fidelity for state targets.
    pub fn fidelity_history(&self) -> &[f64] {
        match &self.fidelity {
            FidelityHistory::Gate {
                avg_fidelity_history,
                ..
            } => avg_fidelity_history,
            FidelityHistory::State {
                state_fidelity_history,
                ..
            } => state_fidelity_history,
        }
    }

    /// Append one step. Nothing is written if the benchmark record does not
    /// match the target type.
    pub fn record_step(
        &mut self,
        actions: Array2<f64>,
        rewards: Vec<f64>,
        circuits: Vec<Circuit>,
        benchmark: Option<BenchmarkRecord>,
    ) -> Result<()> {
        if let Some(record) = &benchmark {
            if record.target_type() != self.target_type() {
                return Err(Error::ContractViolation(format!(
                    "{} benchmark record for a {} target",
                    record.target_type(),
                    self.target_type()
                )));
            }
        }

        self.action_history.push(actions);
        self.reward_history.push(rewards);
        self.circuit_history.push(circuits);

        match (&mut self.fidelity, benchmark) {
            (
                FidelityHistory::Gate {
                    avg_fidelity_history,
                    process_fidelity_history,
                    built_unitaries,
                },
                Some(BenchmarkRecord::Gate {
                    avg_fidelity,
                    process_fidelity,
                    unitaries,
                }),
            ) => {
                avg_fidelity_history.push(avg_fidelity);
                process_fidelity_history.push(process_fidelity);
                built_unitaries.push(unitaries);
            }
            (
                FidelityHistory::State {
                    state_fidelity_history,
                    density_matrix_history,
                },
                Some(BenchmarkRecord::State {
                    fidelity,
                    density_matrix,
                }),
            ) => {
                state_fidelity_history.push(fidelity);
                density_matrix_history.push(density_matrix);
            }
            _ => {}
        }
        Ok(())
    }

    /// Empty every buffer, keeping the target type.
    pub fn clear(&mut self) {
        self.action_history.clear();
        self.reward_history.clear();
        self.circuit_history.clear();
        self.fidelity = FidelityHistory::empty(self.target_type());
    }
}
