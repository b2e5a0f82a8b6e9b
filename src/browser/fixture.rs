//! In-memory browsing context for unit tests
//!
//! Serves fixed HTML per URL and records every page it was asked to open.

use crate::browser::{BrowserError, BrowsingContext, RenderedPage};
use crate::extract::NextControl;
use crate::url::resolve_link;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

#[derive(Debug, Default)]
pub(crate) struct FixtureBrowser {
    pages: HashMap<String, String>,
    current: Option<RenderedPage>,
    pub visited: Vec<String>,
    pub settles: Vec<Duration>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }
}

impl BrowsingContext for FixtureBrowser {
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError> {
        self.visited.push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some(html) => {
                self.current = Some(RenderedPage::new(url.clone(), html.clone()));
                Ok(())
            }
            None => Err(BrowserError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn snapshot(&mut self) -> Result<RenderedPage, BrowserError> {
        self.current.clone().ok_or(BrowserError::NoPage)
    }

    async fn activate(&mut self, control: &NextControl) -> Result<(), BrowserError> {
        let base = self
            .current
            .as_ref()
            .map(|page| page.url.clone())
            .ok_or(BrowserError::NoPage)?;
        let target = control
            .target
            .as_deref()
            .and_then(|href| resolve_link(href, &base))
            .ok_or_else(|| BrowserError::UnfollowableControl("no target".to_string()))?;
        self.navigate(&target).await
    }

    async fn settle(&mut self, delay: Duration) {
        self.settles.push(delay);
    }

    fn is_static(&self) -> bool {
        true
    }
}

/// Builds a listing page in the default selector layout
///
/// Each item is `(name, price, rating)`; `None` leaves that element out.
/// `next` is `None` for no pagination control, `Some((href, disabled))` otherwise.
pub(crate) fn listing_html(
    items: &[(Option<&str>, Option<&str>, Option<&str>)],
    next: Option<(&str, bool)>,
) -> String {
    let mut html = String::from("<html><body><div class=\"p13n-desktop-grid\">");

    for (name, price, rating) in items {
        html.push_str("<div class=\"zg-grid-general-faceout\">");
        if let Some(name) = name {
            html.push_str(&format!(
                "<div class=\"_cDEzb_p13n-sc-css-line-clamp-3_g3dy1\">{}</div>",
                name
            ));
        }
        if let Some(price) = price {
            html.push_str(&format!(
                "<span class=\"_cDEzb_p13n-sc-price_3mJ9Z\">{}</span>",
                price
            ));
        }
        if let Some(rating) = rating {
            html.push_str(&format!("<span class=\"a-icon-alt\">{}</span>", rating));
        }
        html.push_str("</div>");
    }

    html.push_str("</div><ul class=\"a-pagination\">");
    match next {
        Some((href, true)) => html.push_str(&format!(
            "<li class=\"a-disabled a-last\"><a href=\"{}\">Next page</a></li>",
            href
        )),
        Some((href, false)) => html.push_str(&format!(
            "<li class=\"a-last\"><a href=\"{}\">Next page</a></li>",
            href
        )),
        None => {}
    }
    html.push_str("</ul></body></html>");
    html
}
