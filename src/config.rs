// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the RL environment.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. rlenv.yaml file
//! 3. Environment variables (QUBITOS_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::dfe::{DEFAULT_WEIGHT_PRECISION, MAX_WEIGHT_PRECISION};
use crate::error::{Error, Result};
use crate::target::TargetSpec;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reward loop settings
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Calibration target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSpec>,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["rlenv.yaml", "rlenv.yml", "/etc/qubitos/rlenv.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QUBITOS_RL_SAMPLING_BUDGET") {
            if let Ok(budget) = val.parse() {
                self.environment.sampling_budget = budget;
            }
        }
        if let Ok(val) = env::var("QUBITOS_RL_SHOTS") {
            if let Ok(shots) = val.parse() {
                self.environment.shots = shots;
            }
        }
        if let Ok(val) = env::var("QUBITOS_RL_REWARD_SCALE") {
            if let Ok(scale) = val.parse() {
                self.environment.reward_scale = scale;
            }
        }
        if let Ok(val) = env::var("QUBITOS_RL_ABSTRACTION_LEVEL") {
            if let Ok(level) = val.parse() {
                self.environment.abstraction_level = level;
            }
        }
        if let Ok(val) = env::var("QUBITOS_RL_SEED") {
            if let Ok(seed) = val.parse() {
                self.environment.seed = Some(seed);
            }
        }
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUBITOS_STRICT_VALIDATION") {
            self.validation.strict = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.environment.validate()?;
        if self.validation.limits.max_shots == 0 {
            return Err(Error::Config("max_shots limit cannot be 0".into()));
        }
        if self.validation.limits.max_batch_size == 0 {
            return Err(Error::Config("max_batch_size limit cannot be 0".into()));
        }
        if !self.validation.strict {
            tracing::warn!(
                "Strict validation is disabled. Action batches and shot counts \
                 are passed to the estimator unchecked."
            );
        }
        Ok(())
    }
}

/// Level at which circuits are simulated for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractionLevel {
    /// Gate-level statevector simulation
    Circuit,
    /// Pulse-level simulation through a pulse simulator
    Pulse,
}

impl fmt::Display for AbstractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractionLevel::Circuit => write!(f, "circuit"),
            AbstractionLevel::Pulse => write!(f, "pulse"),
        }
    }
}

impl FromStr for AbstractionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "circuit" => Ok(AbstractionLevel::Circuit),
            "pulse" => Ok(AbstractionLevel::Pulse),
            other => Err(Error::Config(format!(
                "unknown abstraction level '{}' (expected circuit or pulse)",
                other
            ))),
        }
    }
}

/// Reward loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Pauli draws per step
    #[serde(default = "default_sampling_budget")]
    pub sampling_budget: usize,

    /// Shots per sampled Pauli operator
    #[serde(default = "default_shots")]
    pub shots: u64,

    /// Reward scaling factor `c`
    #[serde(default = "default_reward_scale")]
    pub reward_scale: f64,

    /// Benchmark simulation level
    #[serde(default = "default_abstraction_level")]
    pub abstraction_level: AbstractionLevel,

    /// Decimal digits kept in the Pauli weights
    #[serde(default = "default_weight_precision")]
    pub weight_precision: u32,

    /// RNG seed (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            sampling_budget: default_sampling_budget(),
            shots: default_shots(),
            reward_scale: default_reward_scale(),
            abstraction_level: default_abstraction_level(),
            weight_precision: default_weight_precision(),
            seed: None,
        }
    }
}

impl EnvironmentConfig {
    /// Total shots per batch element: `sampling_budget × shots`, saturating
    /// at `u64::MAX`.
    pub fn total_shots(&self) -> u64 {
        (self.sampling_budget as u64).saturating_mul(self.shots)
    }

    /// Validate reward loop parameters.
    pub fn validate(&self) -> Result<()> {
        if self.sampling_budget == 0 {
            return Err(Error::Config("sampling_budget must be >= 1".into()));
        }
        if self.shots == 0 {
            return Err(Error::Config("shots must be >= 1".into()));
        }
        if (self.sampling_budget as u64).checked_mul(self.shots).is_none() {
            return Err(Error::Config(format!(
                "sampling_budget ({}) x shots ({}) overflows the shot counter",
                self.sampling_budget, self.shots
            )));
        }
        if !self.reward_scale.is_finite() || self.reward_scale <= 0.0 {
            return Err(Error::Config(format!(
                "reward_scale must be finite and > 0, got {}",
                self.reward_scale
            )));
        }
        if self.weight_precision > MAX_WEIGHT_PRECISION {
            return Err(Error::Config(format!(
                "weight_precision must be <= {}",
                MAX_WEIGHT_PRECISION
            )));
        }
        Ok(())
    }
}

fn default_sampling_budget() -> usize {
    10
}

fn default_shots() -> u64 {
    1
}

fn default_reward_scale() -> f64 {
    0.5
}

fn default_abstraction_level() -> AbstractionLevel {
    AbstractionLevel::Circuit
}

fn default_weight_precision() -> u32 {
    DEFAULT_WEIGHT_PRECISION
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Strict validation mode
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Resource limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: true,
            limits: ResourceLimits::default(),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum qubits in a target
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Maximum total shots per batch element
    #[serde(default = "default_max_shots")]
    pub max_shots: u64,

    /// Maximum action batch size
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
            max_shots: default_max_shots(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_max_qubits() -> u32 {
    6
}

fn default_max_shots() -> u64 {
    100_000
}

fn default_max_batch_size() -> u32 {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.environment.sampling_budget, 10);
        assert_eq!(config.environment.shots, 1);
        assert_eq!(config.environment.reward_scale, 0.5);
        assert_eq!(config.environment.abstraction_level, AbstractionLevel::Circuit);
        assert_eq!(config.environment.weight_precision, 5);
        assert!(config.environment.seed.is_none());
        assert!(config.validation.strict);
        assert!(config.target.is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut bad_config = Config::default();
        bad_config.environment.sampling_budget = 0;
        assert!(bad_config.validate().is_err());
    }

    #[test]
    fn test_validate_shots_zero() {
        let mut config = Config::default();
        config.environment.shots = 0;
        let msg = format!("{}", config.validate().unwrap_err());
        assert!(msg.contains("shots"));
    }

    #[test]
    fn test_validate_reward_scale() {
        let mut config = Config::default();
        config.environment.reward_scale = -1.0;
        assert!(config.validate().is_err());
        config.environment.reward_scale = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_precision_limit() {
        let mut config = Config::default();
        config.environment.weight_precision = 16;
        let msg = format!("{}", config.validate().unwrap_err());
        assert!(msg.contains("weight_precision"));
    }

    #[test]
    fn test_total_shots() {
        let env = EnvironmentConfig {
            sampling_budget: 20,
            shots: 50,
            ..Default::default()
        };
        assert_eq!(env.total_shots(), 1000);
    }

    #[test]
    fn test_total_shots_overflow_rejected() {
        let env = EnvironmentConfig {
            sampling_budget: 10,
            shots: u64::MAX / 2,
            ..Default::default()
        };
        let msg = format!("{}", env.validate().unwrap_err());
        assert!(msg.contains("overflows"));
        assert_eq!(env.total_shots(), u64::MAX);
    }

    #[test]
    fn test_abstraction_level_parse() {
        assert_eq!("Pulse".parse::<AbstractionLevel>().unwrap(), AbstractionLevel::Pulse);
        assert_eq!(AbstractionLevel::Circuit.to_string(), "circuit");
        assert!("analog".parse::<AbstractionLevel>().is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
environment:
  weight_precision: 4
logging:
  format: json
validation:
  limits:
    max_batch_size: 64
target:
  gate:
    name: cx
"#
        )
        .unwrap();

        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.environment.weight_precision, 4);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.validation.limits.max_batch_size, 64);
        assert_eq!(config.validation.limits.max_qubits, 6);
        let target = config.target.unwrap();
        assert_eq!(target.gate.unwrap().name, "cx");
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let path = std::path::Path::new("/tmp/does_not_exist_qubitos_rlenv_test.yaml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.environment.weight_precision, 5);
    }

    #[test]
    fn test_config_load_invalid_yaml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{{{not: valid: yaml::::").unwrap();

        let result = Config::load(Some(f.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override_sampling_budget() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_RL_SAMPLING_BUDGET", "32");
        config.apply_env_overrides();
        assert_eq!(config.environment.sampling_budget, 32);
        std::env::remove_var("QUBITOS_RL_SAMPLING_BUDGET");
    }

    #[test]
    fn test_env_override_shots_ignores_garbage() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_RL_SHOTS", "many");
        config.apply_env_overrides();
        assert_eq!(config.environment.shots, 1);
        std::env::remove_var("QUBITOS_RL_SHOTS");
    }

    #[test]
    fn test_env_override_reward_scale() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_RL_REWARD_SCALE", "0.25");
        config.apply_env_overrides();
        assert_eq!(config.environment.reward_scale, 0.25);
        std::env::remove_var("QUBITOS_RL_REWARD_SCALE");
    }

    #[test]
    fn test_env_override_abstraction_level() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_RL_ABSTRACTION_LEVEL", "pulse");
        config.apply_env_overrides();
        assert_eq!(config.environment.abstraction_level, AbstractionLevel::Pulse);
        std::env::remove_var("QUBITOS_RL_ABSTRACTION_LEVEL");
    }

    #[test]
    fn test_env_override_seed() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_RL_SEED", "1234");
        config.apply_env_overrides();
        assert_eq!(config.environment.seed, Some(1234));
        std::env::remove_var("QUBITOS_RL_SEED");
    }

    #[test]
    fn test_env_override_log_level() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        assert_eq!(config.logging.level, "debug");
        std::env::remove_var("QUBITOS_LOG_LEVEL");
    }

    #[test]
    fn test_env_override_strict_validation() {
        let mut config = Config::default();
        std::env::set_var("QUBITOS_STRICT_VALIDATION", "false");
        config.apply_env_overrides();
        assert!(!config.validation.strict);
        std::env::remove_var("QUBITOS_STRICT_VALIDATION");

        std::env::set_var("QUBITOS_STRICT_VALIDATION", "1");
        config.apply_env_overrides();
        assert!(config.validation.strict);
        std::env::remove_var("QUBITOS_STRICT_VALIDATION");
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.environment, config.environment);
    }
}
