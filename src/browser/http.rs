//! HTTP-backed browsing context
//!
//! Pages are fetched with a cookie-carrying `reqwest` client. Activating the
//! pagination control follows its link, resolved against the current page.

use crate::browser::{BrowserError, BrowsingContext, RenderedPage};
use crate::extract::NextControl;
use crate::url::resolve_link;
use reqwest::cookie::Jar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client for an authenticated session
///
/// The client shares `jar` with the session provider, so cookies loaded from
/// a file or set during login are sent on every listing request. The request
/// timeout is the bounded wait for a navigation.
///
/// # Arguments
///
/// * `user_agent` - User-Agent header sent with every request
/// * `wait_timeout` - Upper bound for one request, connect included
/// * `jar` - Cookie store shared with the session provider
pub fn build_http_client(
    user_agent: &str,
    wait_timeout: Duration,
    jar: Arc<Jar>,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(wait_timeout)
        .connect_timeout(wait_timeout)
        .cookie_provider(jar)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Browsing context that renders pages by fetching them over HTTP
pub struct HttpContext {
    client: Client,
    current: Option<RenderedPage>,
}

impl HttpContext {
    /// Creates a context with no page loaded
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// The underlying client, for session setup requests
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Stores a page obtained outside `navigate`, e.g. a login response
    pub(crate) fn set_current(&mut self, page: RenderedPage) {
        self.current = Some(page);
    }
}

impl BrowsingContext for HttpContext {
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(BrowserError::Status {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| classify_request_error(&final_url, e))?;

        self.current = Some(RenderedPage::new(final_url, html));
        Ok(())
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

        let href = control.target.as_deref().ok_or_else(|| {
            BrowserError::UnfollowableControl("control has no link target".to_string())
        })?;

        let target = resolve_link(href, &base).ok_or_else(|| {
            BrowserError::UnfollowableControl(format!("cannot follow '{}'", href))
        })?;

        self.navigate(&target).await
    }

    fn is_static(&self) -> bool {
        true
    }
}

fn classify_request_error(url: &Url, error: reqwest::Error) -> BrowserError {
    if error.is_timeout() {
        BrowserError::Timeout {
            url: url.to_string(),
        }
    } else {
        BrowserError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        build_http_client(
            "TestAgent/1.0",
            Duration::from_secs(5),
            Arc::new(Jar::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(
            "TestAgent/1.0",
            Duration::from_secs(10),
            Arc::new(Jar::default()),
        );
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_before_navigation() {
        let mut context = HttpContext::new(client());
        assert!(matches!(
            context.snapshot().await,
            Err(BrowserError::NoPage)
        ));
    }

    #[tokio::test]
    async fn test_activate_without_target() {
        let mut context = HttpContext::new(client());
        context.set_current(RenderedPage::new(
            Url::parse("https://shop.example.com/list").unwrap(),
            "<html></html>",
        ));

        let control = NextControl {
            target: None,
            disabled: false,
        };
        assert!(matches!(
            context.activate(&control).await,
            Err(BrowserError::UnfollowableControl(_))
        ));
    }

    #[test]
    fn test_http_context_is_static() {
        let context = HttpContext::new(client());
        assert!(context.is_static());
    }
}
