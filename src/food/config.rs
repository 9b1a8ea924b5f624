use std::fmt;
use thiserror::Error;
use url::Url;

use crate::food::api::traits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

#[derive(Clone)]
pub struct FoodConfig {
    pub usda_api_key: Option<String>,
    pub base_url: String,
    pub page_size: u32,
}

impl fmt::Debug for FoodConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoodConfig")
            .field("usda_api_key", &self.usda_api_key.as_ref().map(|_| "<set>"))
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            usda_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FoodConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. A missing API key is allowed; only
    /// search and lookup need it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let usda_api_key = lookup("USDA_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base_url = match lookup("USDA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_base_url(&value)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let page_size = match lookup("USDA_PAGE_SIZE").filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_page_size(&value)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            usda_api_key,
            base_url,
            page_size,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.usda_api_key = Some(api_key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.usda_api_key.is_some()
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        key: "USDA_BASE_URL",
        value: value.to_string(),
        source,
    })?;
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    let parsed: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key: "USDA_PAGE_SIZE",
        value: value.to_string(),
    })?;
    if !(1..=MAX_PAGE_SIZE as u64).contains(&parsed) {
        return Err(ConfigError::OutOfRange {
            key: "USDA_PAGE_SIZE",
            value: parsed,
            min: 1,
            max: MAX_PAGE_SIZE as u64,
        });
    }
    Ok(parsed as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = FoodConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_reads_and_normalizes_values() {
        let config = FoodConfig::from_lookup(lookup(&[
            ("USDA_API_KEY", " secret "),
            ("USDA_BASE_URL", "http://localhost:8080/fdc/v1/"),
            ("USDA_PAGE_SIZE", "50"),
        ]))
        .unwrap();
        assert_eq!(config.usda_api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:8080/fdc/v1");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            FoodConfig::from_lookup(lookup(&[("USDA_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            FoodConfig::from_lookup(lookup(&[("USDA_PAGE_SIZE", "many")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            FoodConfig::from_lookup(lookup(&[("USDA_PAGE_SIZE", "201")])),
            Err(ConfigError::OutOfRange { value: 201, .. })
        ));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = FoodConfig::default().with_api_key("secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<set>"));
    }
}
