use std::collections::HashMap;
use thiserror::Error;

const MAX_HORIZON_LIMIT: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Longest period, in years, a quote may be requested for.
    pub max_horizon: u32,
    pub premium_mode: PremiumMode,
}

/// How premium-list rows matching a label are turned into a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PremiumMode {
    /// Use one row: the requested currency, else the phase base currency,
    /// else the first match.
    #[default]
    Single,
    /// Add up every matching row, converting each as needed.
    Accumulate,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_horizon: 10,
            premium_mode: PremiumMode::Single,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let max_horizon = env_map
            .get("QUOTE_MAX_HORIZON")
            .map(|s| s.as_str())
            .unwrap_or("10")
            .parse::<u32>()
            .ok()
            .filter(|years| (1..=MAX_HORIZON_LIMIT).contains(years))
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "QUOTE_MAX_HORIZON".to_string(),
                    format!("must be an integer between 1 and {}", MAX_HORIZON_LIMIT),
                )
            })?;

        let premium_mode = match env_map
            .get("PREMIUM_PRICING_MODE")
            .map(|s| s.as_str())
            .unwrap_or("single")
        {
            "single" => PremiumMode::Single,
            "accumulate" => PremiumMode::Accumulate,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PREMIUM_PRICING_MODE".to_string(),
                    format!("must be single or accumulate, got {}", other),
                ))
            }
        };

        Ok(Config {
            max_horizon,
            premium_mode,
        })
    }
}
