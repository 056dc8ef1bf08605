use crate::config::types::{BrowserConfig, Config, DownloadConfig, OutputConfig, TargetConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_output_config(&config.output)?;
    validate_browser_config(&config.browser)?;
    validate_download_config(&config.download)?;
    Ok(())
}

/// Validates the target page
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.page_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid page-url '{}': {}", config.page_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "page-url '{}' must use HTTP or HTTPS",
            config.page_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "page-url '{}' has no host",
            config.page_url
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.dir_mode > 0o7777 {
        return Err(ConfigError::Validation(format!(
            "dir-mode must be a permission mask no larger than 0o7777, got {:#o}",
            config.dir_mode
        )));
    }

    if let Some(report) = &config.report_path {
        if report.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "report-path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.window_width < 1 || config.window_height < 1 {
        return Err(ConfigError::Validation(format!(
            "window size must be at least 1x1, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.render_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "render-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.settle_delay_secs >= config.render_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "settle-delay-secs ({}) must be shorter than render-timeout-secs ({})",
            config.settle_delay_secs, config.render_timeout_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.accepted_content_types.is_empty() {
        return Err(ConfigError::Validation(
            "accepted-content-types must list at least one type".to_string(),
        ));
    }

    if config
        .accepted_content_types
        .iter()
        .any(|t| t.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "accepted-content-types cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}
