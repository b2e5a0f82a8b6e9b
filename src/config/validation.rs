use crate::config::types::{CategoryEntry, Config, CrawlerConfig, OutputConfig, SelectorConfig, SessionConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_session_config(&config.session)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawl policy
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_products_per_category < 1 {
        return Err(ConfigError::Validation(format!(
            "max_products_per_category must be >= 1, got {}",
            config.max_products_per_category
        )));
    }

    if !config.discount_threshold.is_finite() || config.discount_threshold < 0.0 {
        return Err(ConfigError::Validation(format!(
            "discount_threshold must be a finite, non-negative percentage, got {}",
            config.discount_threshold
        )));
    }

    if config.wait_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "wait_timeout must be >= 100ms, got {}ms",
            config.wait_timeout_ms
        )));
    }

    if config.poll_interval_ms < 1 {
        return Err(ConfigError::Validation(
            "poll_interval must be >= 1ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates session configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("login_url", &config.login_url)?;

    let has_cookies = config
        .cookies_file
        .as_deref()
        .is_some_and(|path| !path.trim().is_empty());
    let has_username = config
        .username
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());

    if !has_cookies && !has_username {
        return Err(ConfigError::Validation(
            "session needs a cookies_file, a username, or both".to_string(),
        ));
    }

    if config.password_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "password_env cannot be empty".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    validate_selector("logged_in_marker", &config.logged_in_marker)?;
    validate_selector("login_form", &config.login_form)?;

    Ok(())
}

/// Validates the extraction selectors
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    validate_selector("listing", &config.listing)?;
    validate_selector("item", &config.item)?;
    validate_selector("name", &config.name)?;
    validate_selector("price", &config.price)?;
    validate_selector("rating", &config.rating)?;
    validate_selector("next_control", &config.next_control)?;

    if config.disabled_class.trim().is_empty() || config.disabled_class.contains(' ') {
        return Err(ConfigError::Validation(format!(
            "disabled_class must be a single class name, got '{}'",
            config.disabled_class
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category list
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] entry is required".to_string(),
        ));
    }

    for entry in categories {
        validate_http_url("category url", &entry.url)?;
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

fn validate_selector(field: &str, value: &str) -> Result<(), ConfigError> {
    Selector::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, value, e)))
}
