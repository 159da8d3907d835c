// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS RL environment CLI
//!
//! Resolves calibration targets and drives the reward loop against the
//! local statevector estimator.
//!
//! # Usage
//!
//! ```bash
//! # Inspect a target description
//! qubit-os-rlenv resolve --target cx.yaml
//!
//! # Run 20 steps of 16 random actions and keep a snapshot
//! qubit-os-rlenv run --target cx.yaml --circuit ansatz.yaml --steps 20 --batch 16 \
//!     --snapshot env.json
//!
//! # Show effective configuration
//! qubit-os-rlenv config
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_rlenv::{
    config::Config,
    estimator::StatevectorEstimator,
    quantum::Circuit,
    target::{resolve, Target, TargetSpec},
    validation::validate_target_spec,
    Error, QuantumEnvironment, Result, VERSION,
};

/// QubitOS reinforcement-learning calibration environment
#[derive(Parser)]
#[command(name = "qubit-os-rlenv")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "RL environment for quantum gate and state calibration")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a target description and print a summary
    Resolve {
        /// Target description (YAML); defaults to the config's target
        #[arg(short, long)]
        target: Option<PathBuf>,
    },

    /// Run the reward loop with random actions
    Run {
        /// Target description (YAML); defaults to the config's target
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Parametrized circuit (YAML)
        #[arg(long)]
        circuit: PathBuf,

        /// Number of steps
        #[arg(long, default_value_t = 10)]
        steps: usize,

        /// Actions per step
        #[arg(long, default_value_t = 8)]
        batch: usize,

        /// Benchmark every step
        #[arg(long)]
        benchmark: bool,

        /// Write a JSON snapshot after the last step
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, &config.logging.format);

    match cli.command {
        Commands::Resolve { target } => {
            let spec = target_spec(target.as_deref(), &config)?;
            if config.validation.strict {
                validate_target_spec(&spec, &config.validation.limits)?;
            }
            let resolved = resolve(&spec)?;
            print_target(&resolved);
        }

        Commands::Run {
            target,
            circuit,
            steps,
            batch,
            benchmark,
            snapshot,
        } => {
            config.validate()?;
            let spec = target_spec(target.as_deref(), &config)?;
            let circuit: Circuit = serde_yaml::from_str(&std::fs::read_to_string(&circuit)?)?;

            let mut env = QuantumEnvironment::with_config(
                &spec,
                circuit,
                Arc::new(StatevectorEstimator::new()),
                &config.environment,
                config.validation.clone(),
            )?;
            info!(version = VERSION, steps, batch, "Starting reward loop");
            println!("{}", env);

            let mut rng = match config.environment.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
                None => StdRng::from_entropy(),
            };
            let width = env.parametrized_circuit().num_parameters();
            for step in 0..steps {
                let actions = Array2::from_shape_fn((batch, width), |_| {
                    rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI)
                });
                let rewards = env.step(&actions, benchmark)?;
                let mean = rewards.iter().sum::<f64>() / rewards.len().max(1) as f64;
                match env.history().fidelity_history().last() {
                    Some(f) if benchmark => {
                        println!("step {:>4}  mean reward {:>9.5}  fidelity {:.5}", step, mean, f)
                    }
                    _ => println!("step {:>4}  mean reward {:>9.5}", step, mean),
                }
            }

            if let Some(path) = snapshot {
                env.snapshot().save(&path)?;
                println!("Snapshot written to {}", path.display());
            }
            env.close();
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            let result = config.validate().and_then(|_| match &config.target {
                Some(spec) => {
                    if config.validation.strict {
                        validate_target_spec(spec, &config.validation.limits)?;
                    }
                    resolve(spec).map(|_| ())
                }
                None => Ok(()),
            });
            match result {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Target from `path`, falling back to the configuration.
fn target_spec(path: Option<&Path>, config: &Config) -> Result<TargetSpec> {
    match path {
        Some(p) => Ok(serde_yaml::from_str(&std::fs::read_to_string(p)?)?),
        None => config.target.clone().ok_or_else(|| {
            Error::Config("no target given (use --target or a 'target' config section)".into())
        }),
    }
}

fn print_target(target: &Target) {
    println!("Target type:  {}", target.target_type());
    println!("Qubits:       {}", target.n_qubits());
    println!("Register:     {:?}", target.register());
    match target {
        Target::State(state) => {
            let norm: f64 = state.chi.iter().map(|c| c * c).sum();
            println!("Chi norm²:    {:.6}", norm);
        }
        Target::Gate(gate) => {
            println!("Gate:         {}", gate.gate.name);
            println!("Input states: {}", gate.input_states.len());
            for (i, input) in gate.input_states.iter().enumerate() {
                let norm: f64 = input.target_state.chi.iter().map(|c| c * c).sum();
                println!("  [{:>3}] chi norm² {:.6}", i, norm);
            }
        }
    }
}
