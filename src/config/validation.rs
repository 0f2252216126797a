use crate::config::types::{Config, CrawlerConfig, SearchEngineEntry, UserAgentConfig};
use crate::engine::discovery_url;
use crate::ConfigError;
use url::Url;

/// Upper bound on either worker pool
const MAX_WORKERS: u32 = 100;

/// Validates the entire configuration
///
/// An empty search-engine list passes validation; it is reported when a
/// crawl is started instead.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_search_engines(&config.search_engines)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for (name, workers) in [
        ("discovery_workers", config.discovery_workers),
        ("content_workers", config.content_workers),
    ] {
        if !(1..=MAX_WORKERS).contains(&workers) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_WORKERS, workers
            )));
        }
    }

    for (name, millis) in [
        ("discovery_fetch_timeout", config.discovery_fetch_timeout),
        ("content_fetch_timeout", config.content_fetch_timeout),
        ("discovery_drain_timeout", config.discovery_drain_timeout),
        ("content_drain_timeout", config.content_drain_timeout),
    ] {
        if millis == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than 0ms",
                name
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates each engine template by rendering it with a sample query
fn validate_search_engines(engines: &[SearchEngineEntry]) -> Result<(), ConfigError> {
    for entry in engines {
        discovery_url(entry, "test")
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", entry.url, e)))?;
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
