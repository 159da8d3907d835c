// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for environment steps.

use ndarray::Array2;

use crate::config::ResourceLimits;
use crate::error::{Result, ValidationError};
use crate::target::TargetSpec;

/// Validate an action batch against the circuit's parameter count.
pub fn validate_action_batch(
    actions: &Array2<f64>,
    num_parameters: usize,
    limits: &ResourceLimits,
) -> Result<()> {
    let (batch_size, width) = actions.dim();
    validate_batch_size(batch_size, limits)?;

    if width != num_parameters {
        return Err(ValidationError::Field {
            field: "actions".into(),
            message: format!(
                "{} columns do not match {} circuit parameters",
                width, num_parameters
            ),
        }
        .into());
    }

    for ((row, col), val) in actions.indexed_iter() {
        if val.is_nan() {
            return Err(ValidationError::Field {
                field: "actions".into(),
                message: format!("contains NaN at ({}, {})", row, col),
            }
            .into());
        }
        if val.is_infinite() {
            return Err(ValidationError::Field {
                field: "actions".into(),
                message: format!("contains Inf at ({}, {})", row, col),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate batch size.
pub fn validate_batch_size(batch_size: usize, limits: &ResourceLimits) -> Result<()> {
    if batch_size == 0 {
        return Err(ValidationError::Field {
            field: "batch_size".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if batch_size > limits.max_batch_size as usize {
        return Err(ValidationError::ResourceLimit {
            resource: "batch_size".into(),
            limit: limits.max_batch_size as u64,
            requested: batch_size as u64,
        }
        .into());
    }

    Ok(())
}

/// Validate the total shot count of one estimator call.
pub fn validate_shots(total_shots: u64, limits: &ResourceLimits) -> Result<()> {
    if total_shots == 0 {
        return Err(ValidationError::Field {
            field: "shots".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if total_shots > limits.max_shots {
        return Err(ValidationError::ResourceLimit {
            resource: "shots".into(),
            limit: limits.max_shots,
            requested: total_shots,
        }
        .into());
    }

    Ok(())
}

/// Validate the qubit count of a target.
pub fn validate_num_qubits(num_qubits: usize, limits: &ResourceLimits) -> Result<()> {
    if num_qubits > limits.max_qubits as usize {
        return Err(ValidationError::ResourceLimit {
            resource: "num_qubits".into(),
            limit: limits.max_qubits as u64,
            requested: num_qubits as u64,
        }
        .into());
    }
    Ok(())
}

/// Validate the width a target description implies, before it is resolved.
///
/// Descriptions whose width cannot be read directly pass; resolving them
/// reports their problems.
pub fn validate_target_spec(spec: &TargetSpec, limits: &ResourceLimits) -> Result<()> {
    match spec.num_qubits() {
        Some(n) => validate_num_qubits(n, limits),
        None => Ok(()),
    }
}
