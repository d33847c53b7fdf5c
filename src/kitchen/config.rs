use crate::kitchen::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kitchen sizing and simulation speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Number of orders cooked at the same time
    pub workers: usize,

    /// Length of one cooking time unit in milliseconds
    pub time_unit_ms: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            time_unit_ms: 1000,
        }
    }
}

impl KitchenConfig {
    pub const WORKERS_ENV: &'static str = "KITCHEN_WORKERS";
    pub const TIME_UNIT_ENV: &'static str = "KITCHEN_TIME_UNIT_MS";

    /// Builds a config from the defaults, overridden by `KITCHEN_WORKERS` and
    /// `KITCHEN_TIME_UNIT_MS` when they are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(Self::WORKERS_ENV) {
            config.workers = parse(Self::WORKERS_ENV, &value)?;
        }
        if let Some(value) = lookup(Self::TIME_UNIT_ENV) {
            config.time_unit_ms = parse(Self::TIME_UNIT_ENV, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.time_unit_ms == 0 {
            return Err(ConfigError::ZeroTimeUnit);
        }
        Ok(())
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}
