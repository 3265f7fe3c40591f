use std::sync::Arc;
use tracing::{debug, warn};
use crate::access::pagination::{PageCursor, PageQuery};
use crate::access::tours::{Tour, TourQueries};
use crate::errors::StateError;

/// Page size used by `first_page`
pub const DEFAULT_FIRST_PAGE_SIZE: usize = 10;
/// Max number of tours returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// highest char of the Private Use Area, sorts after any practical name suffix
const PREFIX_SENTINEL: char = '\u{f8ff}';

///
/// Pagination state of a single listing session
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSessionState {
    /// Position of the last tour received, the next page starts after it
    pub last_visible: Option<PageCursor>,
    /// Becomes `false` once a page came back not full. No more requests are made after that.
    pub has_more_data: bool,
    /// Last page that returned anything, or `1` once a new session is fetched. `0` before the first fetch
    pub current_page: usize,
}

impl Default for CursorSessionState {
    fn default() -> Self {
        CursorSessionState {
            last_visible: None,
            has_more_data: true,
            current_page: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub first_page_size: usize,
    pub search_limit: usize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        ListingOptions {
            first_page_size: DEFAULT_FIRST_PAGE_SIZE,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FirstPage,
    Page(usize),
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A previous page wasn't full
    Exhausted,
    /// Pages are numbered from 1
    InvalidPage,
}

///
/// Receives notifications about the listing. Errors are not returned to the caller of `TourListCursor`,
/// so it's the only way to see them.
pub trait FetchObserver: Send + Sync {
    fn page_fetched(&self, _page: usize, _fetched: usize, _state: &CursorSessionState) {}
    fn page_skipped(&self, _page: usize, _reason: SkipReason) {}
    fn search_completed(&self, _query: &str, _found: usize) {}
    fn query_failed(&self, _operation: Operation, _error: &StateError) {}
}

/// Writes all notifications into `tracing`
#[derive(Debug, Clone, Default)]
pub struct LogObserver {}

impl FetchObserver for LogObserver {
    fn page_fetched(&self, page: usize, fetched: usize, state: &CursorSessionState) {
        debug!(page, fetched, has_more_data = state.has_more_data, current_page = state.current_page, "tours page fetched");
    }

    fn page_skipped(&self, page: usize, reason: SkipReason) {
        debug!(page, ?reason, "tours page skipped");
    }

    fn search_completed(&self, query: &str, found: usize) {
        debug!(query, found, "tours search completed");
    }

    fn query_failed(&self, operation: Operation, error: &StateError) {
        warn!(?operation, %error, "tours query failed");
    }
}

///
/// Turns page numbers requested by a screen into forward cursor queries to the store.
///
/// The cursor only moves forward: a page is always read after the last one fetched, whatever
/// page number is requested. Requesting page `1` starts a new session.
/// Store errors are reported to the observer and result in an empty page, leaving the session as it was.
pub struct TourListCursor<S> {
    store: S,
    options: ListingOptions,
    state: CursorSessionState,
    observer: Arc<dyn FetchObserver>,
}

impl<S> TourListCursor<S> where S: TourQueries {

    pub fn new(store: S) -> Self {
        TourListCursor {
            store,
            options: ListingOptions::default(),
            state: CursorSessionState::default(),
            observer: Arc::new(LogObserver::default()),
        }
    }

    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &CursorSessionState {
        &self.state
    }

    fn reset(&mut self) {
        self.state = CursorSessionState::default();
    }

    fn is_full(fetched: usize, limit: usize) -> bool {
        fetched > 0 && fetched == limit
    }

    ///
    /// Start a new session and read the first page of the default size
    pub async fn first_page(&mut self) -> Vec<Tour> {
        self.reset();
        let limit = self.options.first_page_size;
        let query = PageQuery { limit, cursor: None };
        match self.store.list_by_name(query).await {
            Ok(page) => {
                let fetched = page.values.len();
                self.state.last_visible = page.cursor;
                self.state.has_more_data = TourListCursor::<S>::is_full(fetched, limit);
                self.state.current_page = 1;
                self.observer.page_fetched(1, fetched, &self.state);
                page.values
            }
            Err(e) => {
                self.observer.query_failed(Operation::FirstPage, &e);
                vec![]
            }
        }
    }

    ///
    /// Read the next `page_size` tours after the last fetched one. Page `1` resets the session first.
    /// Returns only the tours of that page, or an empty list if the listing is exhausted or failed.
    pub async fn page(&mut self, page_number: usize, page_size: usize) -> Vec<Tour> {
        if page_number == 0 {
            self.observer.page_skipped(page_number, SkipReason::InvalidPage);
            return vec![]
        }
        let restart = page_number == 1;
        if restart {
            self.reset();
        } else if !self.state.has_more_data {
            self.observer.page_skipped(page_number, SkipReason::Exhausted);
            return vec![]
        }

        let query = PageQuery {
            limit: page_size,
            cursor: self.state.last_visible.clone(),
        };
        match self.store.list_by_name(query).await {
            Ok(page) => {
                let fetched = page.values.len();
                self.state.last_visible = page.cursor;
                self.state.has_more_data = TourListCursor::<S>::is_full(fetched, page_size);
                // a new session is on page 1 even if it's empty, same as `first_page`
                if restart || fetched > 0 {
                    self.state.current_page = page_number;
                }
                self.observer.page_fetched(page_number, fetched, &self.state);
                page.values
            }
            Err(e) => {
                self.observer.query_failed(Operation::Page(page_number), &e);
                vec![]
            }
        }
    }

    ///
    /// Find tours which name starts with `query_text`. Independent of the pagination session.
    pub async fn search(&self, query_text: &str) -> Vec<Tour> {
        let upper = format!("{}{}", query_text, PREFIX_SENTINEL);
        match self.store.range_by_name(query_text, upper.as_str(), self.options.search_limit).await {
            Ok(tours) => {
                self.observer.search_completed(query_text, tours.len());
                tours
            }
            Err(e) => {
                self.observer.query_failed(Operation::Search, &e);
                vec![]
            }
        }
    }
}
