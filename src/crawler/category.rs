//! Category crawl engine
//!
//! Walks the listing pages of one category: extract the page, evaluate its
//! items against the discount predicate and the cap, then let the paginator
//! decide whether another page follows. Page-level failures end the category
//! early but keep everything accepted so far.

use crate::browser::BrowsingContext;
use crate::crawler::discount::DiscountEvaluator;
use crate::crawler::paginator::{PageTurn, Paginator};
use crate::crawler::CrawlConfig;
use crate::extract::{RawItemRecord, RecordExtractor};
use crate::output::ProductRecord;
use crate::state::{CrawlProgress, ExhaustReason, PaginationState};
use crate::HarvestError;
use std::fmt;
use url::Url;

/// Why a category crawl ended
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// Pagination found no further page
    Exhausted(ExhaustReason),

    /// The per-category cap was reached while more pages were available
    CapReached,

    /// A page-level defect stopped the crawl
    PageError(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted(reason) => write!(f, "exhausted ({})", reason),
            Self::CapReached => write!(f, "cap reached"),
            Self::PageError(message) => write!(f, "page error: {}", message),
        }
    }
}

/// Result of crawling one category
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    /// Accepted records in page-then-DOM order
    pub records: Vec<ProductRecord>,

    pub accepted_count: usize,

    /// Number of listing pages that were extracted or attempted
    pub pages_visited: usize,

    pub termination: Termination,
}

/// Crawls a single category
pub struct CategoryCrawler<'a, E> {
    config: &'a CrawlConfig,
    extractor: &'a E,
    evaluator: DiscountEvaluator,
    paginator: Paginator,
}

impl<'a, E: RecordExtractor> CategoryCrawler<'a, E> {
    pub fn new(config: &'a CrawlConfig, extractor: &'a E) -> Self {
        Self {
            config,
            extractor,
            evaluator: DiscountEvaluator::new(config.discount_threshold),
            paginator: Paginator::new(config.wait_timeout, config.poll_interval, config.next_settle),
        }
    }

    /// Crawls the category at `category_url`
    ///
    /// Never fails: any error is logged and ends the category, and the
    /// records accepted before it are returned.
    pub async fn crawl<B: BrowsingContext>(
        &self,
        context: &mut B,
        category_url: &str,
        category_name: &str,
    ) -> CategoryOutcome {
        let mut progress = CrawlProgress::new(category_name, self.config.max_products_per_category);
        let mut records = Vec::new();

        let termination = match self
            .walk(context, category_url, &mut progress, &mut records)
            .await
        {
            Ok(termination) => termination,
            Err(e) => {
                tracing::error!("Error occurred while scraping {}: {}", category_name, e);
                Termination::PageError(e.to_string())
            }
        };
        progress.exhaust();

        tracing::info!(
            "Scraped {} products from {} over {} page(s): {}",
            progress.accepted_count(),
            category_name,
            progress.page_index(),
            termination
        );

        CategoryOutcome {
            records,
            accepted_count: progress.accepted_count(),
            pages_visited: progress.page_index(),
            termination,
        }
    }

    /// Follows the listing pages until pagination is exhausted or the cap fills
    ///
    /// Only the cap and the site's pagination bound this loop: a "next" link
    /// that keeps leading back to pages whose items all fail the discount
    /// predicate is followed forever.
    async fn walk<B: BrowsingContext>(
        &self,
        context: &mut B,
        category_url: &str,
        progress: &mut CrawlProgress,
        records: &mut Vec<ProductRecord>,
    ) -> Result<Termination, HarvestError> {
        let url = Url::parse(category_url)?;
        context.navigate(&url).await?;
        context.settle(self.config.page_settle).await;

        loop {
            progress.begin_page();

            let page = context.snapshot().await?;
            let extracted = self.extractor.extract(&page)?;
            progress.transition(PaginationState::HasItems)?;

            tracing::debug!(
                "Found {} items on page {} for {} ({} accepted so far)",
                extracted.items.len(),
                progress.page_index(),
                progress.category_name,
                progress.accepted_count()
            );

            self.accept_items(extracted.items, progress, records);

            progress.transition(PaginationState::AdvanceRequested)?;
            let control = match self
                .paginator
                .resolve(context, self.extractor, &extracted.navigation)
                .await
            {
                Ok(control) => control,
                Err(reason) => {
                    tracing::info!(
                        "Stopping pagination for {}: {}",
                        progress.category_name,
                        reason
                    );
                    return Ok(Termination::Exhausted(reason));
                }
            };

            if progress.cap_reached() {
                return Ok(Termination::CapReached);
            }

            match self.paginator.advance(context, &control).await {
                PageTurn::NextPage => {
                    progress.transition(PaginationState::NextPage)?;
                    progress.transition(PaginationState::Loading)?;
                }
                PageTurn::Exhausted(reason) => {
                    tracing::info!(
                        "Stopping pagination for {}: {}",
                        progress.category_name,
                        reason
                    );
                    return Ok(Termination::Exhausted(reason));
                }
            }
        }
    }

    /// Evaluates one page's items in DOM order until the cap is reached
    fn accept_items(
        &self,
        items: Vec<RawItemRecord>,
        progress: &mut CrawlProgress,
        records: &mut Vec<ProductRecord>,
    ) {
        for raw in items {
            if progress.cap_reached() {
                break;
            }

            let Ok(offer) = raw.price_text.parse::<f64>() else {
                tracing::trace!("Skipping '{}': unparseable price '{}'", raw.name, raw.price_text);
                continue;
            };

            let discount = DiscountEvaluator::offer_discount(&raw.price_text, offer);
            if !self.evaluator.accepts(discount) {
                continue;
            }

            // The reference price is synthetic, so no observed discount is recorded.
            records.push(ProductRecord::new(
                progress.category_name.clone(),
                raw.name,
                raw.price_text,
                None,
                raw.rating_text,
            ));
            progress.record_accepted();
        }
    }
}
