//! State module for tracking category crawl progress
//!
//! # Components
//!
//! - `PaginationState`: Where a category crawl is within its current listing page
//! - `ExhaustReason`: Why pagination stopped for a category
//! - `CrawlProgress`: Accepted count, page index, and pagination state of one category

mod pagination_state;
mod progress;

// Re-export main types
pub use pagination_state::{ExhaustReason, PaginationState};
pub use progress::CrawlProgress;
