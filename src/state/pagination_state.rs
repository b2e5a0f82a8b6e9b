/// Pagination state definitions for one category crawl
///
/// A category walks `Loading → HasItems → AdvanceRequested`, then either
/// returns to `Loading` through `NextPage` or ends in `Exhausted`.
use std::fmt;

/// Represents where a category crawl is within the current listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationState {
    // ===== Active States =====
    /// A listing page is being opened or is settling
    Loading,

    /// The page has been extracted and its items evaluated
    HasItems,

    /// The pagination control is being resolved
    AdvanceRequested,

    /// The next page has been activated and is settling
    NextPage,

    // ===== Terminal State =====
    /// No further pages are reachable for the category
    Exhausted,
}

impl PaginationState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns true if the transition `self -> next` is part of the state machine
    ///
    /// Any active state may fall through to `Exhausted`, since a page-level
    /// defect can stop the crawl at any step.
    pub fn can_transition_to(&self, next: PaginationState) -> bool {
        match (self, next) {
            (Self::Exhausted, _) => false,
            (_, Self::Exhausted) => true,
            (Self::Loading, Self::HasItems) => true,
            (Self::HasItems, Self::AdvanceRequested) => true,
            (Self::AdvanceRequested, Self::NextPage) => true,
            (Self::NextPage, Self::Loading) => true,
            _ => false,
        }
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::HasItems => "has_items",
            Self::AdvanceRequested => "advance_requested",
            Self::NextPage => "next_page",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why pagination stopped for a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhaustReason {
    /// The page has no "next" control
    NoNextControl,

    /// The "next" control is present but disabled
    NextDisabled,

    /// The "next" control did not appear within the bounded wait
    LocateTimeout,

    /// Activating the control or loading the next page failed
    NavigationFailed(String),
}

impl fmt::Display for ExhaustReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextControl => write!(f, "no 'next' control"),
            Self::NextDisabled => write!(f, "'next' control is disabled"),
            Self::LocateTimeout => write!(f, "timed out locating 'next' control"),
            Self::NavigationFailed(reason) => write!(f, "navigation failed: {}", reason),
        }
    }
}
