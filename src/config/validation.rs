use crate::config::types::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates input dataset configuration
fn validate_input_config(config: &InputConfig) -> ConfigResult<()> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "input path cannot be empty".to_string(),
        ));
    }

    for (name, column) in [
        ("website-column", &config.website_column),
        ("email-column", &config.email_column),
        ("phone-column", &config.phone_column),
    ] {
        if column.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    for (name, file) in [
        ("data-file", &config.data_file),
        ("log-file", &config.log_file),
        ("checkpoint-file", &config.checkpoint_file),
    ] {
        if file.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    // The three files share a directory, they must not collide
    if config.data_file == config.log_file
        || config.data_file == config.checkpoint_file
        || config.log_file == config.checkpoint_file
    {
        return Err(ConfigError::Validation(
            "data-file, log-file and checkpoint-file must be distinct".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.limit < 1 {
        return Err(ConfigError::Validation(format!(
            "limit must be >= 1, got {}",
            config.limit
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}
