//! Record extraction from rendered listing pages
//!
//! This module turns one rendered page into:
//! - raw item records, in DOM order, with incomplete items dropped
//! - the navigation state of the page's pagination control
//!
//! The crawl engine only sees these types; markup selectors stay inside the
//! extractor implementation.

mod html;

pub use html::HtmlRecordExtractor;

use crate::browser::RenderedPage;
use thiserror::Error;

/// Page-level extraction failures
///
/// A missing field on one item is never an error; the item is skipped.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Listing container not found on {url}")]
    MissingListing { url: String },
}

/// One product card as found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItemRecord {
    /// Product name, trimmed and non-empty
    pub name: String,

    /// Price with currency sign and thousands separators removed
    pub price_text: String,

    /// Rating text, when the card shows one
    pub rating_text: Option<String>,
}

/// The pagination "next" control of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextControl {
    /// Link the control points at, if any
    pub target: Option<String>,

    /// Whether the control is marked as disabled
    pub disabled: bool,
}

/// Pagination state of one rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub next: Option<NextControl>,
}

impl NavigationState {
    /// A page without a "next" control
    pub fn none() -> Self {
        Self { next: None }
    }

    /// A page whose "next" control links to `target`
    pub fn next(target: impl Into<String>, disabled: bool) -> Self {
        Self {
            next: Some(NextControl {
                target: Some(target.into()),
                disabled,
            }),
        }
    }

    pub fn has_next_control(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_disabled(&self) -> bool {
        self.next.as_ref().is_some_and(|control| control.disabled)
    }
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Complete item records in DOM order
    pub items: Vec<RawItemRecord>,

    pub navigation: NavigationState,
}

/// Turns rendered listing pages into raw records
///
/// Implementations must be pure functions of the page content.
pub trait RecordExtractor {
    /// Extracts all complete item records and the navigation state
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedPage)` - Items in DOM order, incomplete items skipped
    /// * `Err(ExtractError)` - The page is not a listing page at all
    fn extract(&self, page: &RenderedPage) -> Result<ExtractedPage, ExtractError>;

    /// Reads only the pagination control of a page
    fn navigation(&self, page: &RenderedPage) -> NavigationState;
}
