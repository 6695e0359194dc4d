//! Environment configuration shared by the binaries.
//!
//! Every reader takes a lookup function so the parsing can run against a plain
//! map; `*_from_env` wrappers pass [`env_value`].

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::formats::Format;

pub const OUT_DIR_VAR: &str = "MENAGERIE_OUT_DIR";
pub const FORMAT_VAR: &str = "MENAGERIE_FORMAT";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads `name`, treating unset and blank values alike.
pub fn env_value(name: &str) -> Option<String> {
    non_blank(env::var(name).ok())
}

/// Parses `name` through `lookup` if set. A value that does not parse is an
/// error, never a silent default.
pub fn parse_var<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match non_blank(lookup(name)) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(None),
    }
}

/// [`parse_var`] against the process environment.
pub fn env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    parse_var(env_value, name)
}

fn out_dir_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    non_blank(lookup(OUT_DIR_VAR))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory artifacts and charts are written to, `.` unless `MENAGERIE_OUT_DIR` is set.
pub fn out_dir_from_env() -> PathBuf {
    out_dir_with(env_value)
}

/// Settings of the visualize pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub out_dir: PathBuf,
    pub format: Format,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            format: Format::Csv,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_value)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            out_dir: out_dir_with(&lookup),
            format: parse_var(&lookup, FORMAT_VAR)?.unwrap_or(Format::Csv),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_var_unset_and_blank() {
        let lookup = lookup_in(&[("MENAGERIE_RECORDS", "   ")]);
        assert_eq!(parse_var::<u64>(&lookup, "MENAGERIE_RECORDS").unwrap(), None);
        assert_eq!(parse_var::<u64>(&lookup, "MENAGERIE_SEED").unwrap(), None);
    }

    #[test]
    fn test_parse_var_values() {
        let lookup = lookup_in(&[("MENAGERIE_RECORDS", " 42 "), ("MENAGERIE_SEED", "forty-two")]);
        assert_eq!(parse_var::<u64>(&lookup, "MENAGERIE_RECORDS").unwrap(), Some(42));

        let err = parse_var::<u64>(&lookup, "MENAGERIE_SEED").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "MENAGERIE_SEED",
                ..
            }
        ));
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_pipeline_from_lookup() {
        let lookup = lookup_in(&[(OUT_DIR_VAR, "/tmp/menagerie"), (FORMAT_VAR, "JSON")]);
        let config = PipelineConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("/tmp/menagerie"));
        assert_eq!(config.format, Format::Json);

        let err = PipelineConfig::from_lookup(lookup_in(&[(FORMAT_VAR, "parquet")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: FORMAT_VAR,
                ..
            }
        ));
    }
}
