//! HTML record extractor
//!
//! Product cards are located with configurable CSS selectors:
//! - a listing container that must be present on every listing page
//! - item cards inside the container, each with a name, price and rating element
//! - a "next" control whose own class, or its parent's, may mark it disabled

use crate::browser::RenderedPage;
use crate::config::SelectorConfig;
use crate::extract::{ExtractError, ExtractedPage, NavigationState, NextControl, RawItemRecord, RecordExtractor};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Extracts records from listing markup with CSS selectors
#[derive(Debug, Clone)]
pub struct HtmlRecordExtractor {
    listing: Selector,
    item: Selector,
    name: Selector,
    price: Selector,
    rating: Selector,
    next_control: Selector,
    disabled_class: String,
}

impl HtmlRecordExtractor {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(HtmlRecordExtractor)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - A selector does not parse
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            listing: compile("listing", &config.listing)?,
            item: compile("item", &config.item)?,
            name: compile("name", &config.name)?,
            price: compile("price", &config.price)?,
            rating: compile("rating", &config.rating)?,
            next_control: compile("next_control", &config.next_control)?,
            disabled_class: config.disabled_class.clone(),
        })
    }

    /// Lazily yields the complete records of the item cards inside a listing container
    ///
    /// Each card is visited once in DOM order, however many listing containers enclose it.
    fn records<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = RawItemRecord> + 'a {
        document
            .select(&self.item)
            .filter(move |item| self.in_listing(*item))
            .filter_map(move |item| self.record_from(item))
    }

    fn in_listing(&self, item: ElementRef<'_>) -> bool {
        item.ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| self.listing.matches(&ancestor))
    }

    /// Builds a record from one item card, or None if name or price is missing
    fn record_from(&self, item: ElementRef<'_>) -> Option<RawItemRecord> {
        let name = first_text(item, &self.name)?;
        let price_text = first_text(item, &self.price)
            .map(|price| clean_price(&price))
            .filter(|price| !price.is_empty())?;
        let rating_text = first_text(item, &self.rating);

        Some(RawItemRecord {
            name,
            price_text,
            rating_text,
        })
    }

    fn navigation_of(&self, document: &Html) -> NavigationState {
        let next = document.select(&self.next_control).next().map(|control| {
            let parent_disabled = control
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| self.is_disabled(parent));

            NextControl {
                target: control.value().attr("href").map(str::to_string),
                disabled: self.is_disabled(control) || parent_disabled,
            }
        });

        NavigationState { next }
    }

    fn is_disabled(&self, element: ElementRef<'_>) -> bool {
        element
            .value()
            .classes()
            .any(|class| class == self.disabled_class)
            || element.value().attr("aria-disabled") == Some("true")
    }
}

impl RecordExtractor for HtmlRecordExtractor {
    fn extract(&self, page: &RenderedPage) -> Result<ExtractedPage, ExtractError> {
        let document = Html::parse_document(&page.html);

        if document.select(&self.listing).next().is_none() {
            return Err(ExtractError::MissingListing {
                url: page.url.to_string(),
            });
        }

        let items: Vec<RawItemRecord> = self.records(&document).collect();
        let navigation = self.navigation_of(&document);

        Ok(ExtractedPage { items, navigation })
    }

    fn navigation(&self, page: &RenderedPage) -> NavigationState {
        let document = Html::parse_document(&page.html);
        self.navigation_of(&document)
    }
}

fn compile(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, selector, e)))
}

/// Returns the trimmed text of the first match, if non-empty
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Strips the rupee sign, thousands separators and surrounding whitespace
fn clean_price(raw: &str) -> String {
    raw.replace('\u{20b9}', "").replace(',', "").trim().to_string()
}
