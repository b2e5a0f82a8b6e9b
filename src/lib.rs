//! Listing-Harvester: a category crawler for authenticated product listings
//!
//! This crate walks the paginated listing pages of each configured category,
//! extracts product records (name, price, rating), applies a discount filter
//! and a per-category cap, and hands the accepted records to an output sink.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod session;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Listing-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Invalid pagination transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PaginationState,
        to: state::PaginationState,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// Session establishment errors
///
/// Any of these reaching the caller of [`session::establish_session`] is
/// fatal for the run: nothing can be harvested without an authenticated
/// browsing context.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read cookie file {path}: {source}")]
    CookieFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed cookie file: {0}")]
    CookieFormat(#[from] serde_json::Error),

    #[error("HTTP error during session setup: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Browser error during session setup: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("No usable credentials: {0}")]
    MissingCredentials(String),
}

/// Result type alias for Listing-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CategoryCrawler, CrawlSession, HarvestReport};
pub use extract::{HtmlRecordExtractor, NavigationState, RawItemRecord, RecordExtractor};
pub use output::{OutputSink, ProductRecord};
pub use state::{CrawlProgress, PaginationState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_errors_convert_into_harvest_error() {
        let session: HarvestError = SessionError::Authentication("bad password".to_string()).into();
        assert!(matches!(session, HarvestError::Session(SessionError::Authentication(_))));
        assert_eq!(
            session.to_string(),
            "Session error: Authentication failed: bad password"
        );

        let config: HarvestError = ConfigError::Validation("no categories".to_string()).into();
        assert!(matches!(config, HarvestError::Config(_)));

        let browser: HarvestError = browser::BrowserError::NoPage.into();
        assert_eq!(browser.to_string(), "Browser error: No page has been loaded yet");
    }
}
