//! Configuration for network creation and logging.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::error::{Error, Result};
use crate::neural::{validate_topology, MutationRates, NeuralNet, NeuroRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Neurons per layer, input layer first
    pub layer_sizes: Vec<usize>,
    /// Seed for the random source; the clock is used when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Mutation probabilities
    #[serde(default)]
    pub mutation_rates: MutationRates,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![2, 4, 1],
            rng_seed: None,
            mutation_rates: MutationRates::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl NetworkConfig {
    pub fn with_layers(layer_sizes: Vec<usize>) -> Self {
        Self {
            layer_sizes,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_topology(&self.layer_sizes)?;

        let rates = &self.mutation_rates;
        let probabilities = [
            ("layer_growth", rates.layer_growth),
            ("weight_mutation", rates.weight_mutation),
            ("bias_mutation", rates.bias_mutation),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be between 0 and 1, got {}",
                    name, p
                )));
            }
        }

        let strengths = [
            ("weight_strength", rates.weight_strength),
            ("bias_strength", rates.bias_strength),
        ];
        for (name, strength) in strengths {
            if !strength.is_finite() || strength < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, strength
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        let level = self.logging.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unknown log level '{}'",
                self.logging.log_level
            )));
        }
        Ok(())
    }
}

impl NeuralNet {
    /// Build a network and its random source from configuration
    pub fn from_config(config: &NetworkConfig) -> Result<(Self, NeuroRng)> {
        config.validate()?;
        let mut rng = NeuroRng::from_seed_option(config.rng_seed);
        let net = Self::new(&config.layer_sizes, &mut rng)?;
        log::info!(
            "Network created: layers = {:?}, seed = {}",
            config.layer_sizes,
            rng.seed()
        );
        Ok((net, rng))
    }
}
