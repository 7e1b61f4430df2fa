use std::env;
use std::fs;

use serde::Deserialize;

pub(crate) const CONFIG_ENV_VAR: &str = "ISLET_CONFIG";
pub(crate) const SEED_ENV_VAR: &str = "ISLET_SEED";
pub(crate) const TICKS_ENV_VAR: &str = "ISLET_TICKS";

const DEFAULT_TICKS: u64 = 1800;
const DEFAULT_METRICS_INTERVAL_MS: u64 = 1000;

/// Headless run parameters: an optional JSON file named by `ISLET_CONFIG`,
/// with `ISLET_SEED`/`ISLET_TICKS` overriding individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    pub(crate) seed: u64,
    pub(crate) ticks: u64,
    pub(crate) metrics_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            ticks: DEFAULT_TICKS,
            metrics_interval_ms: DEFAULT_METRICS_INTERVAL_MS,
        }
    }
}

pub(crate) fn resolve_run_config() -> Result<RunConfig, String> {
    let mut config = match env::var(CONFIG_ENV_VAR) {
        Ok(path) => load_config_file(&path)?,
        Err(env::VarError::NotPresent) => RunConfig::default(),
        Err(error) => {
            return Err(format!(
                "failed to read environment variable {CONFIG_ENV_VAR}: {error}"
            ))
        }
    };

    if let Some(seed) = env_override(SEED_ENV_VAR)? {
        config.seed = seed;
    }
    if let Some(ticks) = env_override(TICKS_ENV_VAR)? {
        config.ticks = ticks;
    }

    Ok(config)
}

fn env_override(var: &str) -> Result<Option<u64>, String> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|error| format!("{var} must be an unsigned integer, got '{raw}': {error}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(format!("failed to read environment variable {var}: {error}")),
    }
}

fn load_config_file(path: &str) -> Result<RunConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read run config {path}: {error}"))?;
    parse_run_config(&raw).map_err(|message| format!("invalid run config {path}: {message}"))
}

fn parse_run_config(raw: &str) -> Result<RunConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse_run_config("{}").expect("parses");
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            parse_run_config(r#"{"seed": 7, "ticks": 90, "metrics_interval_ms": 250}"#)
                .expect("parses");
        assert_eq!(config.seed, 7);
        assert_eq!(config.ticks, 90);
        assert_eq!(config.metrics_interval_ms, 250);
    }

    #[test]
    fn unknown_fields_are_rejected_with_a_path() {
        let error = parse_run_config(r#"{"sede": 7}"#).expect_err("must fail");
        assert!(error.contains("sede"), "error should name the field: {error}");
    }

    #[test]
    fn type_errors_name_the_offending_field() {
        let error = parse_run_config(r#"{"ticks": "ninety"}"#).expect_err("must fail");
        assert!(error.contains("ticks"), "error should name the field: {error}");
    }
}
