//! Session configuration, supplied by the bootstrap collaborator.
//!
//! The engine consumes this; it never decides headless mode or profile
//! locations itself. Files parse as JSON first, YAML as fallback.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize session config: {0}")]
    Deserialize(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub window: WindowSize,
    /// Persistent profile directory; `None` means a throwaway profile.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
    #[serde(default = "SessionConfig::default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,
    #[serde(default = "SessionConfig::default_visibility_timeout_ms")]
    pub visibility_timeout_ms: u64,
}

impl SessionConfig {
    fn default_headless() -> bool {
        true
    }

    fn default_nav_timeout_ms() -> u64 {
        30_000
    }

    fn default_visibility_timeout_ms() -> u64 {
        10_000
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: Self::default_headless(),
            window: WindowSize::default(),
            profile_dir: None,
            fingerprint: FingerprintConfig::default(),
            nav_timeout_ms: Self::default_nav_timeout_ms(),
            visibility_timeout_ms: Self::default_visibility_timeout_ms(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Anti-automation fingerprint adjustments applied at session start.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Strip `navigator.webdriver` and automation switches.
    #[serde(default)]
    pub suppress_automation_flags: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub accept_language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

pub fn load_config_from_reader<R: Read>(mut reader: R) -> Result<SessionConfig, ConfigError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_config_str(&buf)
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let file = File::open(path.as_ref())?;
    load_config_from_reader(file)
}

pub fn parse_config_str(raw: &str) -> Result<SessionConfig, ConfigError> {
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
