// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Target resolution.
//!
//! Turns a [`TargetSpec`] into a canonical [`Target`] with every Pauli
//! characteristic vector (`chi`) computed up front. All checks run eagerly;
//! a description that resolves is safe to hand to the reward loop.

pub mod types;

pub use types::{
    GateSpec, GateTarget, InputState, InputStateSpec, StateTarget, Target, TargetSpec, TargetType,
};

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::quantum::ops::{
    conjugate_by, hermitian_eigh, is_hermitian, is_unitary, max_abs_diff, num_qubits_for_dim,
    outer, trace, DEFAULT_TOLERANCE,
};
use crate::quantum::{pauli_basis, pauli_preparation_circuit, Circuit, StandardGate};

/// Tolerance on trace and positivity of user-supplied density matrices.
pub const DENSITY_MATRIX_TOLERANCE: f64 = 1e-6;

/// Pauli characteristic vector `chi[k] = Re Tr(ρ P_k)` of length `4^n`.
pub fn compute_chi(rho: &Array2<Complex64>, num_qubits: usize) -> Vec<f64> {
    pauli_basis(num_qubits)
        .iter()
        .map(|p| p.trace_with(rho).re)
        .collect()
}

/// Resolve a target description.
pub fn resolve(spec: &TargetSpec) -> Result<Target> {
    let target = match (&spec.gate, &spec.circuit, &spec.density_matrix) {
        (None, None, None) => {
            return Err(Error::Config(
                "target needs one of 'gate', 'circuit' or 'density_matrix'".into(),
            ))
        }
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(Error::Config(
                "'gate' cannot be combined with 'circuit' or 'density_matrix'".into(),
            ))
        }
        (Some(gate), None, None) => Target::Gate(resolve_gate(
            gate,
            spec.register.as_deref(),
            spec.input_states.as_deref(),
        )?),
        (None, circuit, dm) => {
            if spec.input_states.is_some() {
                return Err(Error::Config(
                    "'input_states' is only valid for gate targets".into(),
                ));
            }
            let rho = dm.as_ref().map(|m| m.0.clone());
            Target::State(resolve_state(
                circuit.as_ref(),
                rho,
                spec.register.as_deref(),
            )?)
        }
    };

    info!(
        target_type = %target.target_type(),
        n_qubits = target.n_qubits(),
        register = ?target.register(),
        input_states = target.num_input_states(),
        "Resolved target"
    );
    Ok(target)
}

/// Resolve a state target from a preparation circuit and/or density matrix.
pub fn resolve_state(
    circuit: Option<&Circuit>,
    density_matrix: Option<Array2<Complex64>>,
    register: Option<&[usize]>,
) -> Result<StateTarget> {
    let rho = match (circuit, density_matrix) {
        (_, Some(rho)) => {
            let n = validate_density_matrix(&rho)?;
            if let Some(c) = circuit {
                if c.num_qubits() != n {
                    return Err(Error::dimension(
                        n,
                        c.num_qubits(),
                        "state circuit vs density matrix qubits",
                    ));
                }
            }
            rho
        }
        (Some(c), None) => circuit_density_matrix(c)?,
        (None, None) => {
            return Err(Error::Config(
                "state target needs 'circuit' or 'density_matrix'".into(),
            ))
        }
    };

    let n = num_qubits_for_dim(rho.nrows()).unwrap_or(0);
    let register = resolve_register(register, n)?;
    let chi = compute_chi(&rho, n);
    Ok(StateTarget {
        register,
        density_matrix: rho,
        chi,
        circuit: circuit.cloned(),
    })
}

/// Resolve a gate target and its input states.
pub fn resolve_gate(
    gate: &GateSpec,
    register: Option<&[usize]>,
    input_states: Option<&[InputStateSpec]>,
) -> Result<GateTarget> {
    let unitary = gate_unitary(gate)?;
    let n = num_qubits_for_dim(unitary.nrows()).ok_or_else(|| {
        Error::InvalidType(format!(
            "gate '{}' has dimension {}, not a power of two",
            gate.name,
            unitary.nrows()
        ))
    })?;
    let register = resolve_register(register, n)?;

    let preparations: Vec<(Circuit, Option<Array2<Complex64>>)> = match input_states {
        Some([]) => {
            return Err(Error::Config(
                "'input_states' must list at least one state".into(),
            ))
        }
        Some(specs) => specs
            .iter()
            .map(|s| {
                let circuit = s.circuit.clone().ok_or_else(|| {
                    Error::Config("input state needs a preparation 'circuit'".into())
                })?;
                Ok((circuit, s.density_matrix.as_ref().map(|m| m.0.clone())))
            })
            .collect::<Result<Vec<_>>>()?,
        None => default_input_circuits(n)
            .into_iter()
            .map(|c| (c, None))
            .collect(),
    };

    let gate_qubits: Vec<usize> = (0..n).collect();
    let mut resolved = Vec::with_capacity(preparations.len());
    for (circuit, dm) in preparations {
        circuit.validate()?;
        if circuit.num_qubits() != n {
            return Err(Error::dimension(
                n,
                circuit.num_qubits(),
                "input state qubits vs gate qubits",
            ));
        }
        let prepared = circuit_density_matrix(&circuit)?;
        let input_rho = match dm {
            Some(rho) => {
                let m = validate_density_matrix(&rho)?;
                if m != n {
                    return Err(Error::dimension(n, m, "input density matrix qubits"));
                }
                // Must be the state the circuit actually prepares.
                let deviation = max_abs_diff(&rho, &prepared);
                if deviation > DENSITY_MATRIX_TOLERANCE {
                    return Err(Error::InvalidType(format!(
                        "input density matrix differs from the state its circuit prepares \
                         (max deviation {:.3e})",
                        deviation
                    )));
                }
                rho
            }
            None => prepared,
        };

        let output_rho = conjugate_by(&unitary, &input_rho);
        let mut output_circuit = circuit.clone();
        output_circuit.unitary(&gate.name, unitary.clone(), &gate_qubits)?;
        let chi = compute_chi(&output_rho, n);
        resolved.push(InputState {
            circuit,
            density_matrix: input_rho,
            target_state: StateTarget {
                register: register.clone(),
                density_matrix: output_rho,
                chi,
                circuit: Some(output_circuit),
            },
        });
    }
    debug!(gate = %gate.name, input_states = resolved.len(), "Resolved gate input states");

    Ok(GateTarget {
        register,
        gate: gate.clone(),
        unitary,
        input_states: resolved,
    })
}

/// Preparation circuits for the Pauli preparation basis on `n` qubits.
///
/// Ordered as the Cartesian product of `{|0⟩, |1⟩, |+⟩, |+i⟩}` with qubit 0
/// varying slowest.
pub fn default_input_circuits(n: usize) -> Vec<Circuit> {
    let total = 1usize << (2 * n);
    (0..total)
        .map(|k| {
            let indices: Vec<usize> = (0..n).map(|q| (k >> (2 * (n - 1 - q))) & 3).collect();
            pauli_preparation_circuit(&indices)
        })
        .collect()
}

fn gate_unitary(gate: &GateSpec) -> Result<Array2<Complex64>> {
    if let Some(matrix) = &gate.matrix {
        if !is_unitary(&matrix.0, DEFAULT_TOLERANCE) {
            return Err(Error::InvalidType(format!(
                "gate '{}' matrix is not unitary",
                gate.name
            )));
        }
        return Ok(matrix.0.clone());
    }
    let standard: StandardGate = gate.name.parse().map_err(Error::Config)?;
    if standard.num_params() != gate.params.len() {
        return Err(Error::Config(format!(
            "gate '{}' takes {} parameter(s), got {}",
            gate.name,
            standard.num_params(),
            gate.params.len()
        )));
    }
    Ok(standard.matrix(&gate.params))
}

fn circuit_density_matrix(circuit: &Circuit) -> Result<Array2<Complex64>> {
    circuit.validate()?;
    if circuit.num_parameters() > 0 {
        return Err(Error::InvalidType(format!(
            "state circuit has {} unbound parameter(s)",
            circuit.num_parameters()
        )));
    }
    Ok(outer(&circuit.statevector(&[])?))
}

fn resolve_register(register: Option<&[usize]>, n: usize) -> Result<Vec<usize>> {
    match register {
        None => Ok((0..n).collect()),
        Some(r) => {
            if r.len() != n {
                return Err(Error::dimension(n, r.len(), "register length vs target qubits"));
            }
            for (i, q) in r.iter().enumerate() {
                if r[..i].contains(q) {
                    return Err(Error::Config(format!("register repeats qubit {}", q)));
                }
            }
            Ok(r.to_vec())
        }
    }
}

/// Check that `rho` is a valid density matrix; returns its qubit count.
pub fn validate_density_matrix(rho: &Array2<Complex64>) -> Result<usize> {
    if !rho.is_square() {
        return Err(Error::InvalidType(format!(
            "density matrix must be square, got {}x{}",
            rho.nrows(),
            rho.ncols()
        )));
    }
    let n = num_qubits_for_dim(rho.nrows()).ok_or_else(|| {
        Error::InvalidType(format!(
            "density matrix dimension {} is not a power of two",
            rho.nrows()
        ))
    })?;
    if !is_hermitian(rho, DENSITY_MATRIX_TOLERANCE) {
        return Err(Error::InvalidType("density matrix is not Hermitian".into()));
    }
    let tr = trace(rho);
    if (tr.re - 1.0).abs() > DENSITY_MATRIX_TOLERANCE || tr.im.abs() > DENSITY_MATRIX_TOLERANCE {
        return Err(Error::InvalidType(format!(
            "density matrix trace is {}, expected 1",
            tr
        )));
    }
    let (eigenvalues, _) = hermitian_eigh(rho);
    if let Some(min) = eigenvalues.iter().copied().reduce(f64::min) {
        if min < -DENSITY_MATRIX_TOLERANCE {
            return Err(Error::InvalidType(format!(
                "density matrix has negative eigenvalue {}",
                min
            )));
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::ops::{c64, identity, purity, zero_state};
    use crate::quantum::{ComplexMatrix, ParamExpr};
    use approx::assert_relative_eq;

    fn zero_dm() -> ComplexMatrix {
        ComplexMatrix(outer(&zero_state(1)))
    }

    fn gate_spec(name: &str) -> TargetSpec {
        TargetSpec {
            gate: Some(GateSpec::named(name)),
            ..Default::default()
        }
    }

    // =========================================================================
    // Mutual exclusion and required fields
    // =========================================================================

    #[test]
    fn test_empty_spec_is_config_error() {
        let err = resolve(&TargetSpec::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_gate_with_density_matrix_is_config_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            density_matrix: Some(zero_dm()),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_gate_with_circuit_is_config_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            circuit: Some(Circuit::new(1)),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_input_states_on_state_target_is_config_error() {
        let spec = TargetSpec {
            density_matrix: Some(zero_dm()),
            input_states: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_gate_is_config_error() {
        assert!(matches!(resolve(&gate_spec("toffoli")), Err(Error::Config(_))));
    }

    // =========================================================================
    // State targets
    // =========================================================================

    #[test]
    fn test_state_from_density_matrix() {
        let spec = TargetSpec {
            density_matrix: Some(zero_dm()),
            ..Default::default()
        };
        let target = resolve(&spec).unwrap();
        assert_eq!(target.target_type(), TargetType::State);
        assert_eq!(target.register(), &[0]);
        let Target::State(state) = target else {
            panic!("expected state target");
        };
        // |0⟩: chi = [1, 0, 0, 1] over I, X, Y, Z
        assert_eq!(state.chi.len(), 4);
        assert_relative_eq!(state.chi[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.chi[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(state.chi[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(state.chi[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_state_from_circuit_bell() {
        let mut qc = Circuit::new(2);
        qc.gate(StandardGate::H, &[0], vec![]).unwrap();
        qc.gate(StandardGate::CX, &[0, 1], vec![]).unwrap();
        let spec = TargetSpec {
            circuit: Some(qc),
            register: Some(vec![3, 5]),
            ..Default::default()
        };
        let Target::State(state) = resolve(&spec).unwrap() else {
            panic!("expected state target");
        };
        assert_eq!(state.register, vec![3, 5]);
        assert_eq!(state.chi.len(), 16);
        // Bell state stabilizers: II, XX, -YY, ZZ
        let label_value = |label: &str| {
            let idx = label.parse::<crate::quantum::PauliString>().unwrap().index();
            state.chi[idx]
        };
        assert_relative_eq!(label_value("XX"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(label_value("YY"), -1.0, epsilon = 1e-12);
        assert_relative_eq!(label_value("ZZ"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(label_value("XZ"), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parseval_for_pure_states() {
        let mut qc = Circuit::new(2);
        qc.gate(StandardGate::RY, &[0], vec![ParamExpr::Value(0.3)]).unwrap();
        qc.gate(StandardGate::RX, &[1], vec![ParamExpr::Value(1.1)]).unwrap();
        qc.gate(StandardGate::CZ, &[0, 1], vec![]).unwrap();
        qc.gate(StandardGate::T, &[1], vec![]).unwrap();
        let Target::State(state) = resolve(&TargetSpec {
            circuit: Some(qc),
            ..Default::default()
        })
        .unwrap() else {
            panic!("expected state target");
        };
        let norm: f64 = state.chi.iter().map(|c| c * c).sum();
        assert_relative_eq!(norm, 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mixed_state_chi_norm_matches_purity() {
        let mut rho = identity(2).mapv(|z| z * 0.5);
        rho[[0, 0]] = c64(0.8, 0.0);
        rho[[1, 1]] = c64(0.2, 0.0);
        let Target::State(state) = resolve(&TargetSpec {
            density_matrix: Some(ComplexMatrix(rho.clone())),
            ..Default::default()
        })
        .unwrap() else {
            panic!("expected state target");
        };
        let norm: f64 = state.chi.iter().map(|c| c * c).sum();
        assert_relative_eq!(norm, 2.0 * purity(&rho), epsilon = 1e-10);
    }

    #[test]
    fn test_parametrized_state_circuit_is_invalid_type() {
        let mut qc = Circuit::new(1);
        qc.gate(
            StandardGate::RX,
            &[0],
            vec![ParamExpr::parameter(0)],
        )
        .unwrap();
        let spec = TargetSpec {
            circuit: Some(qc),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::InvalidType(_))));
    }

    #[test]
    fn test_invalid_density_matrices() {
        let not_hermitian = ndarray::array![
            [c64(1.0, 0.0), c64(0.5, 0.0)],
            [c64(0.0, 0.0), c64(0.0, 0.0)]
        ];
        let bad_trace = identity(2);
        let negative = ndarray::array![
            [c64(1.5, 0.0), c64(0.0, 0.0)],
            [c64(0.0, 0.0), c64(-0.5, 0.0)]
        ];
        let not_power_of_two = identity(3).mapv(|z| z / 3.0);
        for rho in [not_hermitian, bad_trace, negative, not_power_of_two] {
            let spec = TargetSpec {
                density_matrix: Some(ComplexMatrix(rho)),
                ..Default::default()
            };
            assert!(matches!(resolve(&spec), Err(Error::InvalidType(_))));
        }
    }

    #[test]
    fn test_state_register_length_mismatch() {
        let spec = TargetSpec {
            density_matrix: Some(zero_dm()),
            register: Some(vec![0, 1]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Dimension { .. })));
    }

    #[test]
    fn test_state_circuit_and_density_matrix_width_mismatch() {
        let spec = TargetSpec {
            density_matrix: Some(zero_dm()),
            circuit: Some(Circuit::new(2)),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Dimension { .. })));
    }

    // =========================================================================
    // Gate targets
    // =========================================================================

    #[test]
    fn test_default_input_states_count() {
        for (name, n) in [("x", 1usize), ("cx", 2)] {
            let Target::Gate(gate) = resolve(&gate_spec(name)).unwrap() else {
                panic!("expected gate target");
            };
            assert_eq!(gate.input_states.len(), 1 << (2 * n));
            for input in &gate.input_states {
                assert_eq!(input.target_state.chi.len(), 1 << (2 * n));
                let norm: f64 = input.target_state.chi.iter().map(|c| c * c).sum();
                assert_relative_eq!(norm, (1 << n) as f64, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_default_input_ordering() {
        let circuits = default_input_circuits(2);
        assert_eq!(circuits.len(), 16);
        // k = 1 → qubit 0 in |0⟩, qubit 1 in |1⟩
        let psi = circuits[1].statevector(&[]).unwrap();
        assert_relative_eq!(psi[2].re, 1.0, epsilon = 1e-12);
        // k = 4 → qubit 0 in |1⟩, qubit 1 in |0⟩
        let psi = circuits[4].statevector(&[]).unwrap();
        assert_relative_eq!(psi[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gate_output_state_is_gate_applied_to_input() {
        let Target::Gate(gate) = resolve(&gate_spec("x")).unwrap() else {
            panic!("expected gate target");
        };
        // Input 0 is |0⟩, X maps it to |1⟩: chi = [1, 0, 0, -1].
        let out = &gate.input_states[0].target_state;
        assert_relative_eq!(out.chi[3], -1.0, epsilon = 1e-12);
        let expected = outer(&ndarray::array![c64(0.0, 0.0), c64(1.0, 0.0)]);
        assert!(max_abs_diff(&out.density_matrix, &expected) < 1e-12);
    }

    #[test]
    fn test_gate_register_mismatch_is_dimension_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("cx")),
            register: Some(vec![0]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Dimension { .. })));
    }

    #[test]
    fn test_register_with_duplicates_is_config_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("cx")),
            register: Some(vec![1, 1]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_non_unitary_gate_is_invalid_type() {
        let spec = TargetSpec {
            gate: Some(GateSpec {
                name: "bad".into(),
                params: vec![],
                matrix: Some(ComplexMatrix(identity(2).mapv(|z| z * 2.0))),
            }),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::InvalidType(_))));
    }

    #[test]
    fn test_gate_parameter_count_checked() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("rx")),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_input_states() {
        let mut plus = Circuit::new(1);
        plus.gate(StandardGate::H, &[0], vec![]).unwrap();
        let spec = TargetSpec {
            gate: Some(GateSpec::named("z")),
            input_states: Some(vec![InputStateSpec {
                circuit: Some(plus),
                density_matrix: None,
            }]),
            ..Default::default()
        };
        let Target::Gate(gate) = resolve(&spec).unwrap() else {
            panic!("expected gate target");
        };
        assert_eq!(gate.input_states.len(), 1);
        // Z|+⟩ = |−⟩: ⟨X⟩ = −1
        assert_relative_eq!(gate.input_states[0].target_state.chi[1], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_input_state_width_mismatch() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("cx")),
            input_states: Some(vec![InputStateSpec {
                circuit: Some(Circuit::new(1)),
                density_matrix: None,
            }]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Dimension { .. })));
    }

    #[test]
    fn test_input_density_matrix_must_match_its_circuit() {
        // Empty circuit prepares |0⟩, the density matrix claims |1⟩.
        let one = outer(&ndarray::array![c64(0.0, 0.0), c64(1.0, 0.0)]);
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            input_states: Some(vec![InputStateSpec {
                circuit: Some(Circuit::new(1)),
                density_matrix: Some(ComplexMatrix(one)),
            }]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::InvalidType(_))));
    }

    #[test]
    fn test_input_density_matrix_agreeing_with_circuit() {
        let mut flip = Circuit::new(1);
        flip.gate(StandardGate::X, &[0], vec![]).unwrap();
        let one = outer(&ndarray::array![c64(0.0, 0.0), c64(1.0, 0.0)]);
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            input_states: Some(vec![InputStateSpec {
                circuit: Some(flip),
                density_matrix: Some(ComplexMatrix(one)),
            }]),
            ..Default::default()
        };
        let Target::Gate(gate) = resolve(&spec).unwrap() else {
            panic!("expected gate target");
        };
        // X|1⟩ = |0⟩: ⟨Z⟩ = +1
        assert_relative_eq!(gate.input_states[0].target_state.chi[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_input_state_without_circuit_is_config_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            input_states: Some(vec![InputStateSpec {
                circuit: None,
                density_matrix: Some(zero_dm()),
            }]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_input_state_list_is_config_error() {
        let spec = TargetSpec {
            gate: Some(GateSpec::named("x")),
            input_states: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec), Err(Error::Config(_))));
    }

    #[test]
    fn test_target_spec_from_yaml() {
        let yaml = r#"
register: [2]
gate:
  name: sx
"#;
        let spec: TargetSpec = serde_yaml::from_str(yaml).unwrap();
        let target = resolve(&spec).unwrap();
        assert_eq!(target.target_type(), TargetType::Gate);
        assert_eq!(target.register(), &[2]);
        assert_eq!(target.num_input_states(), 4);
    }

    #[test]
    fn test_target_spec_num_qubits_without_resolving() {
        assert_eq!(gate_spec("cx").num_qubits(), Some(2));
        assert_eq!(gate_spec("toffoli").num_qubits(), None);

        let registered = TargetSpec {
            register: Some(vec![4, 5, 6]),
            ..gate_spec("x")
        };
        assert_eq!(registered.num_qubits(), Some(3));

        let custom = TargetSpec {
            gate: Some(GateSpec {
                name: "iswap".into(),
                params: vec![],
                matrix: Some(ComplexMatrix(identity(4))),
            }),
            ..Default::default()
        };
        assert_eq!(custom.num_qubits(), Some(2));

        let state = TargetSpec {
            density_matrix: Some(zero_dm()),
            ..Default::default()
        };
        assert_eq!(state.num_qubits(), Some(1));
        assert_eq!(
            TargetSpec {
                circuit: Some(Circuit::new(3)),
                ..Default::default()
            }
            .num_qubits(),
            Some(3)
        );
        assert_eq!(TargetSpec::default().num_qubits(), None);
    }
}
