//! Fixed policy parameters governing evolution.
//!
//! The defaults are the registry's canonical constants. A hosting
//! environment may supply an [`EvolutionPolicy`] from a YAML file; absent
//! keys fall back to the defaults, so an empty file is a valid policy.

use std::path::Path;

use serde::Deserialize;

/// Fitness value at which a gene achieves Omega-Prime.
pub const OMEGA_PRIME_THRESHOLD: u64 = 1_000_000;

/// Percent chance, per offspring byte, of a mutation during recombination.
pub const MUTATION_RATE: u8 = 5;

/// Percent of the offspring sequence retained from the first parent.
pub const CROSSOVER_RATE: u8 = 70;

/// Maximum number of gene references in one population.
pub const MAX_POPULATION_SIZE: usize = 1000;

/// Errors that can occur when loading a policy file.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Failed to read the policy file from disk.
    #[error("failed to read policy file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse policy YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for PolicyError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Policy parameters for the evolution engine.
///
/// All fields default to the exported constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvolutionPolicy {
    /// Fitness value at which a gene achieves Omega-Prime.
    #[serde(default = "default_omega_prime_threshold")]
    pub omega_prime_threshold: u64,

    /// Percent chance, per offspring byte, of a mutation.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: u8,

    /// Percent of the offspring sequence retained from the first parent.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: u8,

    /// Maximum number of gene references in one population.
    #[serde(default = "default_max_population_size")]
    pub max_population_size: usize,
}

impl EvolutionPolicy {
    /// Load a policy from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] if the file cannot be read, or
    /// [`PolicyError::Yaml`] if it is not valid YAML for this structure.
    pub fn from_yaml_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&raw)?)
    }
}

impl Default for EvolutionPolicy {
    fn default() -> Self {
        Self {
            omega_prime_threshold: OMEGA_PRIME_THRESHOLD,
            mutation_rate: MUTATION_RATE,
            crossover_rate: CROSSOVER_RATE,
            max_population_size: MAX_POPULATION_SIZE,
        }
    }
}

const fn default_omega_prime_threshold() -> u64 {
    OMEGA_PRIME_THRESHOLD
}

const fn default_mutation_rate() -> u8 {
    MUTATION_RATE
}

const fn default_crossover_rate() -> u8 {
    CROSSOVER_RATE
}

const fn default_max_population_size() -> usize {
    MAX_POPULATION_SIZE
}
