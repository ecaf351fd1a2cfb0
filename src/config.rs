//! Engine configuration aggregation.
//!
//! One file configures a whole deployment: session, retries, verification
//! pacing, worker pacing and the ledger location. Parsed as JSON with YAML
//! fallback, like every other config surface in the engine.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use apply_gate::VerifyConfig;
use applypilot_orchestrator::WorkerConfig;
use browser_adapter::SessionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tool_interact::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize engine config: {0}")]
    Deserialize(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub verify: VerifyConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Ledger database path; `None` keeps the ledger in memory (dry runs).
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
}

pub fn load_config_from_reader<R: Read>(mut reader: R) -> Result<EngineConfig, ConfigError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_config_str(&buf)
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let file = File::open(path.as_ref())?;
    load_config_from_reader(file)
}

pub fn parse_config_str(raw: &str) -> Result<EngineConfig, ConfigError> {
    match serde_json::from_str(raw) {
        Ok(config) => Ok(config),
        Err(json_err) => serde_yaml::from_str(raw).map_err(|yaml_err| {
            ConfigError::Deserialize(format!(
                "json error: {}; yaml error: {}",
                json_err, yaml_err
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.verify.timeout_ms, 10_000);
        assert_eq!(config.worker.min_delay_ms, 2000);
        assert!(config.ledger_path.is_none());
    }

    #[test]
    fn test_yaml_overrides() {
        let raw = "worker:\n  min_delay_ms: 100\n  max_delay_ms: 200\nledger_path: /tmp/ledger.db\n";
        let config = parse_config_str(raw).unwrap();
        assert_eq!(config.worker.min_delay_ms, 100);
        assert_eq!(
            config.ledger_path.as_deref(),
            Some(Path::new("/tmp/ledger.db"))
        );
    }
}
