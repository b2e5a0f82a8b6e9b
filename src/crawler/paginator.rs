//! Pagination decisions and page advancement
//!
//! The paginator decides from a page's navigation state whether another page
//! exists, and performs the advance. Every failure maps to an exhausted
//! category, never to an error: each call either moves to the next page or
//! ends pagination, which guarantees termination per page.

use crate::browser::BrowsingContext;
use crate::extract::{NavigationState, NextControl, RecordExtractor};
use crate::state::ExhaustReason;
use std::time::Duration;

/// Outcome of advancing past one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    /// The next page has been activated and has settled
    NextPage,

    /// No further pages are reachable
    Exhausted(ExhaustReason),
}

/// Resolves the "next" control and advances through listing pages
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    wait_timeout: Duration,
    poll_interval: Duration,
    settle_delay: Duration,
}

impl Paginator {
    /// Creates a paginator
    ///
    /// # Arguments
    ///
    /// * `wait_timeout` - Bounded wait for the "next" control to appear
    /// * `poll_interval` - Re-check interval while waiting on a live page
    /// * `settle_delay` - Delay after activating the control
    pub fn new(wait_timeout: Duration, poll_interval: Duration, settle_delay: Duration) -> Self {
        Self {
            wait_timeout,
            poll_interval,
            settle_delay,
        }
    }

    /// Decides whether the current page can be advanced
    ///
    /// If the extracted navigation state shows no control and the context's
    /// page can still change, the page is re-checked every poll interval until
    /// the control appears or the bounded wait runs out.
    ///
    /// # Returns
    ///
    /// * `Ok(NextControl)` - An enabled control to activate
    /// * `Err(ExhaustReason)` - Pagination is over for this category
    pub async fn resolve<B, E>(
        &self,
        context: &mut B,
        extractor: &E,
        navigation: &NavigationState,
    ) -> Result<NextControl, ExhaustReason>
    where
        B: BrowsingContext,
        E: RecordExtractor,
    {
        let control = match &navigation.next {
            Some(control) => control.clone(),
            None if context.is_static() => return Err(ExhaustReason::NoNextControl),
            None => self.wait_for_control(context, extractor).await?,
        };

        if control.disabled {
            return Err(ExhaustReason::NextDisabled);
        }

        Ok(control)
    }

    /// Activates `control`, then waits for the page to settle
    pub async fn advance<B: BrowsingContext>(&self, context: &mut B, control: &NextControl) -> PageTurn {
        if let Err(e) = context.activate(control).await {
            tracing::warn!("Failed to activate 'next' control: {}", e);
            return PageTurn::Exhausted(ExhaustReason::NavigationFailed(e.to_string()));
        }

        context.settle(self.settle_delay).await;
        PageTurn::NextPage
    }

    async fn wait_for_control<B, E>(&self, context: &mut B, extractor: &E) -> Result<NextControl, ExhaustReason>
    where
        B: BrowsingContext,
        E: RecordExtractor,
    {
        let poll = async {
            loop {
                tokio::time::sleep(self.poll_interval).await;
                let page = match context.snapshot().await {
                    Ok(page) => page,
                    Err(e) => return Err(ExhaustReason::NavigationFailed(e.to_string())),
                };
                if let Some(control) = extractor.navigation(&page).next {
                    return Ok(control);
                }
            }
        };

        match tokio::time::timeout(self.wait_timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(ExhaustReason::LocateTimeout),
        }
    }
}
