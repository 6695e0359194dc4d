//! Configuration for dataset generation.

use menagerie::config::{env_value, parse_var};
use menagerie::errors::ConfigError;
use serde::{Deserialize, Serialize};

use crate::generators::GenerateError;

pub const RECORDS_VAR: &str = "MENAGERIE_RECORDS";
pub const SEED_VAR: &str = "MENAGERIE_SEED";

/// Shape of a generated dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Number of persons.
    pub record_count: usize,
    /// Inclusive range of pets per person.
    pub pets_per_person: (usize, usize),
    /// Inclusive range of occupations per person.
    pub occupations_per_person: (usize, usize),
    /// Random seed for reproducible datasets. Entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            record_count: 10,
            pets_per_person: (1, 3),
            occupations_per_person: (1, 2),
            seed: None,
        }
    }
}

impl GenerateConfig {
    pub fn with_count(record_count: usize) -> Self {
        Self {
            record_count,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Defaults overridden by `MENAGERIE_RECORDS` and `MENAGERIE_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_value)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            record_count: parse_var(&lookup, RECORDS_VAR)?.unwrap_or(defaults.record_count),
            seed: parse_var(&lookup, SEED_VAR)?,
            ..defaults
        })
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        check_range("pets_per_person", self.pets_per_person)?;
        check_range("occupations_per_person", self.occupations_per_person)
    }
}

fn check_range(name: &'static str, (min, max): (usize, usize)) -> Result<(), GenerateError> {
    if min > max {
        return Err(GenerateError::InvalidRange { name, min, max });
    }
    Ok(())
}
