// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Serializable environment state.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::history::HistoryState;
use crate::config::{AbstractionLevel, EnvironmentConfig, ValidationConfig};
use crate::error::{Error, Result};
use crate::quantum::Circuit;
use crate::target::{Target, TargetType};

/// Everything needed to rebuild an environment, minus its estimator.
///
/// Histories are stored verbatim; restoring never recomputes them. The
/// top-level `action_history`, `reward_history` and `fidelity_history` keys
/// mirror `history` for readers that do not know its layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub n_qubits: usize,
    pub abstraction_level: AbstractionLevel,
    pub sampling_budget: usize,
    pub shots: u64,
    pub reward_scale: f64,
    pub weight_precision: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub validation: ValidationConfig,
    pub target_type: TargetType,
    pub target: Target,
    pub parametrized_circuit: Circuit,
    pub step_tracker: usize,
    pub action_history: Vec<Array2<f64>>,
    pub reward_history: Vec<Vec<f64>>,
    pub fidelity_history: Vec<f64>,
    pub history: HistoryState,
}

impl EnvironmentSnapshot {
    /// Reward loop configuration stored in the snapshot.
    pub fn environment_config(&self) -> EnvironmentConfig {
        EnvironmentConfig {
            sampling_budget: self.sampling_budget,
            shots: self.shots,
            reward_scale: self.reward_scale,
            abstraction_level: self.abstraction_level,
            weight_precision: self.weight_precision,
            seed: self.seed,
        }
    }

    /// Check that the top-level history keys agree with `history`.
    pub fn check_history(&self) -> Result<()> {
        if self.action_history != self.history.action_history
            || self.reward_history != self.history.reward_history
            || self.fidelity_history.as_slice() != self.history.fidelity_history()
        {
            return Err(Error::Config(
                "snapshot history keys disagree with the stored history".into(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a snapshot written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
