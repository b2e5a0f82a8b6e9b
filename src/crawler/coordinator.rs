//! Crawl session - runs the category crawler over every configured category
//!
//! Categories are processed sequentially in configuration order through a
//! single browsing context. A category that fails is logged and skipped;
//! it never prevents later categories from running.

use crate::browser::BrowsingContext;
use crate::crawler::category::{CategoryCrawler, Termination};
use crate::crawler::CrawlConfig;
use crate::extract::RecordExtractor;
use crate::output::ProductRecord;
use crate::url::category_display_name;
use chrono::{DateTime, Utc};

/// Per-category result line of a harvest
#[derive(Debug, Clone)]
pub struct CategorySummary {
    /// Derived display name
    pub name: String,

    pub url: String,

    pub accepted_count: usize,

    pub pages_visited: usize,

    pub termination: Termination,
}

/// Everything a crawl session produced
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Accepted records, in category order then page-then-DOM order
    pub records: Vec<ProductRecord>,

    /// One summary per configured category, in configuration order
    pub categories: Vec<CategorySummary>,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    /// Number of categories whose crawl ended on a page-level defect
    pub fn failed_categories(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| matches!(c.termination, Termination::PageError(_)))
            .count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Crawl session over the configured categories
pub struct CrawlSession<E> {
    config: CrawlConfig,
    extractor: E,
}

impl<E: RecordExtractor> CrawlSession<E> {
    /// Creates a session from an immutable configuration and an extractor
    pub fn new(config: CrawlConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    /// Crawls every category in order and aggregates the accepted records
    ///
    /// # Arguments
    ///
    /// * `context` - An authenticated browsing context, used exclusively by this run
    pub async fn run<B: BrowsingContext>(&self, context: &mut B) -> HarvestReport {
        let started_at = Utc::now();
        let crawler = CategoryCrawler::new(&self.config, &self.extractor);

        let mut records = Vec::new();
        let mut categories = Vec::with_capacity(self.config.category_urls.len());

        for url in &self.config.category_urls {
            let name = category_display_name(url);
            tracing::info!("Scraping category: {}", name);

            let outcome = crawler.crawl(context, url, &name).await;

            categories.push(CategorySummary {
                name,
                url: url.clone(),
                accepted_count: outcome.accepted_count,
                pages_visited: outcome.pages_visited,
                termination: outcome.termination,
            });
            records.extend(outcome.records);
        }

        let report = HarvestReport {
            records,
            categories,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Harvest finished: {} records from {} categories ({} failed)",
            report.records.len(),
            report.categories.len(),
            report.failed_categories()
        );

        report
    }
}
