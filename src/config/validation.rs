//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for an access token.
const MIN_TOKEN_LENGTH: usize = 20;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.canvas.base_url)?;
    validate_token(&config.canvas.access_token)?;
    validate_concurrency("concurrency", config.options.concurrency)?;
    validate_concurrency("segment_concurrency", config.options.segment_concurrency)?;

    Ok(())
}

/// Validate the platform base URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.trim().is_empty() {
        return Err(Error::MissingConfig("base_url".to_string()));
    }

    let normalized = crate::config::loader::normalize_base_url(base_url);
    let parsed = url::Url::parse(&normalized).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("'{}' is not a valid URL: {}", base_url, e),
    })?;

    if parsed.host_str().is_none() {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("'{}' has no host", base_url),
        });
    }

    Ok(())
}

/// Validate the access token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::MissingConfig("access_token".to_string()));
    }

    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    // Check for placeholder values
    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme")
        || token_lower.contains("your_token")
        || token_lower.contains("your-canvas")
    {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Generate one under Account > Settings."
                .to_string(),
        });
    }

    Ok(())
}

fn validate_concurrency(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.canvas.base_url = "canvas.example.edu".into();
        config.canvas.access_token = "1234~abcdefghijklmnopqrstuvwxyz".into();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let mut config = valid_config();
        config.canvas.access_token.clear();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_short_or_placeholder_token() {
        assert!(validate_token("short").is_err());
        assert!(validate_token("replaceme_replaceme_replaceme").is_err());
        assert!(validate_token("your-canvas-access-token").is_err());
    }

    #[test]
    fn test_base_url() {
        assert!(validate_base_url("canvas.example.edu").is_ok());
        assert!(validate_base_url("https://canvas.example.edu/").is_ok());
        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("https://exa mple.edu").is_err());
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = valid_config();
        config.options.concurrency = 0;
        assert!(validate_config(&config).is_err());
    }
}
