use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Listing-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

impl Config {
    /// Category URLs in crawl order
    pub fn category_urls(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.url.clone()).collect()
    }

    /// Most records a run can accept, saturating for very large caps
    pub fn max_total_products(&self) -> usize {
        self.crawler
            .max_products_per_category
            .saturating_mul(self.categories.len())
    }
}

/// Crawl policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound on accepted records per category
    #[serde(rename = "max-products-per-category", default = "default_max_products")]
    pub max_products_per_category: usize,

    /// Records are accepted only when their discount is strictly greater
    #[serde(rename = "discount-threshold", default)]
    pub discount_threshold: f64,

    /// Bounded wait for navigation and element lookups (milliseconds)
    #[serde(rename = "wait-timeout-ms", default = "default_wait_timeout")]
    pub wait_timeout_ms: u64,

    /// Delay after opening a category's first page (milliseconds)
    #[serde(rename = "page-settle-ms", default = "default_page_settle")]
    pub page_settle_ms: u64,

    /// Delay after activating the "next" control (milliseconds)
    #[serde(rename = "next-settle-ms", default = "default_next_settle")]
    pub next_settle_ms: u64,

    /// How often a live page is re-checked while waiting for the "next" control
    #[serde(rename = "poll-interval-ms", default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl CrawlerConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn next_settle(&self) -> Duration {
        Duration::from_millis(self.next_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_products_per_category: default_max_products(),
            discount_threshold: 0.0,
            wait_timeout_ms: default_wait_timeout(),
            page_settle_ms: default_page_settle(),
            next_settle_ms: default_next_settle(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Authentication and browsing-context configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Site root, visited when replaying stored cookies
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Sign-in page used when cookie replay fails
    #[serde(rename = "login-url")]
    pub login_url: String,

    /// JSON file of browser-exported cookies
    #[serde(rename = "cookies-file", default)]
    pub cookies_file: Option<String>,

    /// Account name for form login
    #[serde(default)]
    pub username: Option<String>,

    /// Name of the environment variable holding the password
    #[serde(rename = "password-env", default = "default_password_env")]
    pub password_env: String,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Element that is only present once signed in
    #[serde(rename = "logged-in-marker", default = "default_logged_in_marker")]
    pub logged_in_marker: String,

    #[serde(rename = "login-form", default = "default_login_form")]
    pub login_form: String,

    #[serde(rename = "email-field", default = "default_email_field")]
    pub email_field: String,

    #[serde(rename = "password-field", default = "default_password_field")]
    pub password_field: String,
}

/// CSS selectors used by the HTML record extractor
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Container that must exist on every listing page
    #[serde(default = "default_listing")]
    pub listing: String,

    /// One product card, searched inside the listing container
    #[serde(default = "default_item")]
    pub item: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_price")]
    pub price: String,

    #[serde(default = "default_rating")]
    pub rating: String,

    /// The pagination "next" control
    #[serde(rename = "next-control", default = "default_next_control")]
    pub next_control: String,

    /// Class marking the "next" control (or its parent) as disabled
    #[serde(rename = "disabled-class", default = "default_disabled_class")]
    pub disabled_class: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: default_listing(),
            item: default_item(),
            name: default_name(),
            price: default_price(),
            rating: default_rating(),
            next_control: default_next_control(),
            disabled_class: default_disabled_class(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Destination file for the harvested records
    pub path: String,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
}

/// One category listing to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// First listing page of the category
    pub url: String,
}

fn default_max_products() -> usize {
    1500
}

fn default_wait_timeout() -> u64 {
    10_000
}

fn default_page_settle() -> u64 {
    3_000
}

fn default_next_settle() -> u64 {
    5_000
}

fn default_poll_interval() -> u64 {
    500
}

fn default_password_env() -> String {
    "HARVEST_PASSWORD".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        .to_string()
}

fn default_logged_in_marker() -> String {
    "#nav-belt".to_string()
}

fn default_login_form() -> String {
    "form[name='signIn']".to_string()
}

fn default_email_field() -> String {
    "email".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

fn default_listing() -> String {
    "div.p13n-desktop-grid".to_string()
}

fn default_item() -> String {
    ".zg-grid-general-faceout".to_string()
}

fn default_name() -> String {
    "div._cDEzb_p13n-sc-css-line-clamp-3_g3dy1".to_string()
}

fn default_price() -> String {
    "span._cDEzb_p13n-sc-price_3mJ9Z".to_string()
}

fn default_rating() -> String {
    "span.a-icon-alt".to_string()
}

fn default_next_control() -> String {
    "li.a-last a".to_string()
}

fn default_disabled_class() -> String {
    "a-disabled".to_string()
}
