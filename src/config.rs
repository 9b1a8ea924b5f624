use std::env;

use crate::food::config::{ConfigError, FoodConfig};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    pub food: FoodConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            food: FoodConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                key: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("LOG_LEVEL")
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            port,
            log_level,
            food: FoodConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(!config.food.has_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            "PORT" => Some("8080".to_string()),
            "LOG_LEVEL" => Some("DEBUG".to_string()),
            "USDA_API_KEY" => Some("k".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert!(config.food.has_api_key());
    }

    #[test]
    fn test_bad_port() {
        let err = AppConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "PORT must be a number, got 'http'");
    }
}
