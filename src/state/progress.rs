use crate::state::PaginationState;
use crate::HarvestError;

/// Progress of one category crawl
///
/// Owned by the category crawler for the lifetime of a single category and
/// dropped when that category ends. `accepted_count` never exceeds `cap`.
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    /// Display name of the category being crawled
    pub category_name: String,

    /// Records accepted so far
    accepted_count: usize,

    /// 1-based index of the page currently being processed (0 before the first)
    page_index: usize,

    /// Maximum number of records that may be accepted
    cap: usize,

    state: PaginationState,
}

impl CrawlProgress {
    /// Creates progress for a category that has not loaded a page yet
    pub fn new(category_name: impl Into<String>, cap: usize) -> Self {
        Self {
            category_name: category_name.into(),
            accepted_count: 0,
            page_index: 0,
            cap,
            state: PaginationState::Loading,
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Returns true once the category may not accept any more records
    pub fn cap_reached(&self) -> bool {
        self.accepted_count >= self.cap
    }

    /// Marks the start of a new listing page
    pub fn begin_page(&mut self) {
        self.page_index += 1;
    }

    /// Counts one accepted record
    ///
    /// Returns false, without counting, if the cap has already been reached.
    pub fn record_accepted(&mut self) -> bool {
        if self.cap_reached() {
            return false;
        }
        self.accepted_count += 1;
        true
    }

    /// Moves the pagination state machine forward
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition is valid and has been applied
    /// * `Err(HarvestError::InvalidTransition)` - The transition is not part of the state machine
    pub fn transition(&mut self, next: PaginationState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!(
            "{}: page {} {} -> {}",
            self.category_name,
            self.page_index,
            self.state,
            next
        );
        self.state = next;
        Ok(())
    }

    /// Moves to `Exhausted` unless the crawl is already there
    pub fn exhaust(&mut self) {
        if !self.state.is_terminal() {
            self.state = PaginationState::Exhausted;
        }
    }
}
