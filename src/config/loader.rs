//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Strategy;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            r#"
            strategy = "feature_flag"

            [feature_flags]
            accommodation_api_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.strategy, Strategy::FeatureFlag);
        assert!(config.feature_flags.accommodation_api_enabled);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("strategy = \"round_robin\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("[retries]\nmax_attempts = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: retries.max_attempts must be at least 1"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join(format!("strangler-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("strangler-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[retries]\nmax_attempts = 5\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.retries.max_attempts, 5);

        fs::remove_file(&path).unwrap();
    }
}
