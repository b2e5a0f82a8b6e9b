//! Browsing context abstraction
//!
//! The crawl engine never talks to a browser or HTTP client directly. It
//! drives a [`BrowsingContext`], which owns the authenticated session and
//! the currently rendered page. Ownership of the context is passed down by
//! `&mut` borrow, so only one component touches it at a time.
//!
//! `HttpContext` is the bundled implementation: it fetches listing pages with
//! `reqwest` and follows the pagination control's link.

mod http;

#[cfg(test)]
pub(crate) mod fixture;

pub use http::{build_http_client, HttpContext};

use crate::extract::NextControl;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a browsing context
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Timed out waiting for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("No page has been loaded yet")]
    NoPage,

    #[error("Control cannot be activated: {0}")]
    UnfollowableControl(String),
}

/// A snapshot of the page currently shown in a browsing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final URL of the page, after redirects
    pub url: Url,

    /// Rendered markup
    pub html: String,
}

impl RenderedPage {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }
}

/// A single authenticated browsing context
///
/// Every navigation or activation may block for at most the context's
/// bounded wait before failing with [`BrowserError::Timeout`].
#[allow(async_fn_in_trait)]
pub trait BrowsingContext {
    /// Opens `url` in the context, replacing the current page
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError>;

    /// Returns a snapshot of the currently rendered page
    async fn snapshot(&mut self) -> Result<RenderedPage, BrowserError>;

    /// Scrolls to and activates a pagination control
    async fn activate(&mut self, control: &NextControl) -> Result<(), BrowserError>;

    /// Waits for the page to settle after a navigation
    async fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Returns true if a loaded page never changes until the next navigation
    ///
    /// Waiting for an element to appear is pointless on such contexts.
    fn is_static(&self) -> bool {
        false
    }
}
