use crate::config::assembler::Configuration;
use crate::config::validator::{ConfigError, ConfigValidator};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Raw sensor-channel descriptor as written in the configuration file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSensor {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// Raw phase entry before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPhase {
    pub id: Option<String>,
    pub input: Option<String>,
    pub calibration: Option<f64>,
    pub voltage: Option<RawSensor>,
    pub frequency: Option<RawSensor>,
    pub phase_angle: Option<RawSensor>,
}

/// Raw CT clamp entry before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCtClamp {
    pub id: Option<String>,
    pub phase_id: Option<String>,
    pub input: Option<String>,
    pub power: Option<RawSensor>,
    pub current: Option<RawSensor>,
}

/// Raw device settings before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDevice {
    pub address: Option<u8>,
    pub update_interval_ms: Option<u64>,
}

/// Raw update hook entry before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawUpdateHook {
    pub id: Option<String>,
}

/// The whole configuration tree before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub device: Option<RawDevice>,
    pub phases: Option<Vec<RawPhase>>,
    pub ct_clamps: Option<Vec<RawCtClamp>>,
    pub on_update: Option<Vec<RawUpdateHook>>,
}

/// Parses TOML configuration text or files into validated configurations
pub struct ConfigParser {
    validator: ConfigValidator,
}

impl ConfigParser {
    pub fn new() -> Result<Self, ConfigParseError> {
        Ok(Self {
            validator: ConfigValidator::new()?,
        })
    }

    /// Parse and validate a configuration from TOML text.
    pub fn parse_str(&self, content: &str) -> Result<Configuration, ConfigParseError> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(self.validator.validate(&raw)?)
    }

    /// Parse and validate a configuration file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Configuration, ConfigParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }
}
