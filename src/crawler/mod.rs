//! Crawler module - the category crawl engine
//!
//! This module contains the core crawling logic, including:
//! - Discount evaluation and the acceptance predicate
//! - Pagination decisions and page advancement
//! - The per-category crawl loop with its cap and failure handling
//! - The crawl session over all configured categories

mod category;
mod coordinator;
mod discount;
mod paginator;

pub use category::{CategoryCrawler, CategoryOutcome, Termination};
pub use coordinator::{CategorySummary, CrawlSession, HarvestReport};
pub use discount::{DiscountEvaluator, SYNTHETIC_MARKUP};
pub use paginator::{PageTurn, Paginator};

use crate::config::Config;
use crate::extract::HtmlRecordExtractor;
use crate::session::{establish_session, HttpSessionProvider};
use crate::HarvestError;
use std::time::Duration;

/// Immutable crawl policy shared by every category of a run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Category listing URLs, in crawl order
    pub category_urls: Vec<String>,

    pub max_products_per_category: usize,

    /// Records need a discount strictly above this percentage
    pub discount_threshold: f64,

    /// Bounded wait for locating the "next" control
    pub wait_timeout: Duration,

    pub poll_interval: Duration,

    /// Delay after opening a category
    pub page_settle: Duration,

    /// Delay after activating the "next" control
    pub next_settle: Duration,
}

impl CrawlConfig {
    /// Creates a policy with the default waits
    pub fn new(category_urls: Vec<String>, max_products_per_category: usize, discount_threshold: f64) -> Self {
        let defaults = crate::config::CrawlerConfig::default();
        Self {
            category_urls,
            max_products_per_category,
            discount_threshold,
            wait_timeout: defaults.wait_timeout(),
            poll_interval: defaults.poll_interval(),
            page_settle: defaults.page_settle(),
            next_settle: defaults.next_settle(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_zero_delays(mut self) -> Self {
        self.wait_timeout = Duration::from_millis(100);
        self.poll_interval = Duration::from_millis(10);
        self.page_settle = Duration::ZERO;
        self.next_settle = Duration::ZERO;
        self
    }
}

impl From<&Config> for CrawlConfig {
    fn from(config: &Config) -> Self {
        Self {
            category_urls: config.category_urls(),
            max_products_per_category: config.crawler.max_products_per_category,
            discount_threshold: config.crawler.discount_threshold,
            wait_timeout: config.crawler.wait_timeout(),
            poll_interval: config.crawler.poll_interval(),
            page_settle: config.crawler.page_settle(),
            next_settle: config.crawler.next_settle(),
        }
    }
}

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Compile the extraction selectors
/// 2. Establish an authenticated session (fatal on failure)
/// 3. Crawl every category in order
///
/// # Returns
///
/// * `Ok(HarvestReport)` - All categories were attempted
/// * `Err(HarvestError)` - The run could not start; no records were produced
pub async fn harvest(config: &Config) -> Result<HarvestReport, HarvestError> {
    let extractor = HtmlRecordExtractor::new(&config.selectors)?;

    let provider = HttpSessionProvider::new(&config.session, config.crawler.wait_timeout())?;
    let mut context = establish_session(&provider, &config.session).await?;

    let session = CrawlSession::new(CrawlConfig::from(config), extractor);
    Ok(session.run(&mut context).await)
}
