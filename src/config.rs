//! Node configuration
//!
//! Defaults reproduce the stock firmware image: UDP port 3000, a 3 second
//! simulation tick and a 20..=35°C triangle wave starting at 25°C. A JSON file
//! may override any subset of fields.

use crate::protocol::MatchMode;
use crate::subsystems::radio::DEFAULT_PAN_ID;
use crate::subsystems::thermal::{TemperatureLimits, INITIAL_TEMP_C, TEMP_CEIL_C, TEMP_FLOOR_C};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_UDP_PORT: u16 = 3000;
pub const DEFAULT_TICK_PERIOD_MS: u64 = 3000;
pub const DEFAULT_NODE_ID: u8 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Link-layer address byte shown in status replies
    pub node_id: u8,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub tick_period_ms: u64,
    pub temperature: TemperatureLimits,
    pub initial_temp_c: i16,
    pub pan_id: u16,
    pub match_mode: MatchMode,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: DEFAULT_NODE_ID,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_UDP_PORT,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            temperature: TemperatureLimits::default(),
            initial_temp_c: INITIAL_TEMP_C,
            pan_id: DEFAULT_PAN_ID,
            match_mode: MatchMode::Exact,
        }
    }
}

impl NodeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.temperature;
        if t.min_c >= t.max_c {
            return Err(ConfigError::Invalid("temperature.min_c must be below temperature.max_c"));
        }
        if t.min_c < TEMP_FLOOR_C || t.max_c > TEMP_CEIL_C {
            return Err(ConfigError::Invalid("temperature limits must lie within -99..=999"));
        }
        if t.step_c <= 0 {
            return Err(ConfigError::Invalid("temperature.step_c must be positive"));
        }
        if !t.contains(i32::from(self.initial_temp_c)) {
            return Err(ConfigError::Invalid("initial_temp_c must lie within the temperature limits"));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::Invalid("tick_period_ms must be non-zero"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = NodeConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.port, 3000);
        assert_eq!(c.tick_period(), Duration::from_secs(3));
        assert_eq!(c.temperature.min_c, 20);
        assert_eq!(c.temperature.max_c, 35);
        assert_eq!(c.temperature.step_c, 1);
        assert_eq!(c.initial_temp_c, 25);
        assert_eq!(c.match_mode, MatchMode::Exact);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = NodeConfig::from_json(r#"{"node_id": 7, "match_mode": "substring"}"#).unwrap();
        assert_eq!(c.node_id, 7);
        assert_eq!(c.match_mode, MatchMode::Substring);
        assert_eq!(c.port, DEFAULT_UDP_PORT);
        assert_eq!(c.pan_id, DEFAULT_PAN_ID);
    }

    #[test]
    fn serde_roundtrip() {
        let c = NodeConfig {
            node_id: 9,
            port: 4000,
            ..NodeConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(NodeConfig::from_json(&json).unwrap(), c);
    }

    #[test]
    fn inverted_limits_rejected() {
        let json = r#"{"temperature": {"min_c": 35, "max_c": 20, "step_c": 1}}"#;
        assert!(matches!(NodeConfig::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn nested_limits_accept_partial_json() {
        let c = NodeConfig::from_json(r#"{"temperature": {"max_c": 30}}"#).unwrap();
        assert_eq!(c.temperature.min_c, 20);
        assert_eq!(c.temperature.max_c, 30);
        assert_eq!(c.temperature.step_c, 1);
    }

    #[test]
    fn overwide_limits_rejected() {
        let too_low = r#"{"temperature": {"min_c": -9999, "max_c": 35, "step_c": 1}, "initial_temp_c": 25}"#;
        let too_high = r#"{"temperature": {"min_c": 20, "max_c": 1000, "step_c": 1}}"#;
        assert!(matches!(NodeConfig::from_json(too_low), Err(ConfigError::Invalid(_))));
        assert!(matches!(NodeConfig::from_json(too_high), Err(ConfigError::Invalid(_))));

        let widest = r#"{"temperature": {"min_c": -99, "max_c": 999, "step_c": 1}, "initial_temp_c": -99}"#;
        assert!(NodeConfig::from_json(widest).is_ok());
    }

    #[test]
    fn initial_temperature_outside_limits_rejected() {
        assert!(matches!(
            NodeConfig::from_json(r#"{"initial_temp_c": 50}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_step_and_zero_period_rejected() {
        assert!(NodeConfig::from_json(r#"{"temperature": {"min_c": 20, "max_c": 35, "step_c": 0}}"#).is_err());
        assert!(NodeConfig::from_json(r#"{"tick_period_ms": 0}"#).is_err());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(NodeConfig::from_json("{not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NodeConfig::load("/nonexistent/slsnode.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
