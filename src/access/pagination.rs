/// Opaque position in an ordered scan, pointing to the last record of a fetched page.
/// Only the store that issued it knows how to resume from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub(crate) key: String,
}

impl PageCursor {
    pub(crate) fn new<S: Into<String>>(key: S) -> Self {
        PageCursor { key: key.into() }
    }
}

#[derive(Debug, Clone)]
/// Pagination options
pub struct PageQuery {
    /// Limit of the page size
    pub limit: usize,
    /// Resume after this position, or start from the beginning if `None`
    pub cursor: Option<PageCursor>,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            limit: 10,
            cursor: None,
        }
    }
}

#[derive(Debug, Clone)]
/// Result of the query
pub struct PageResult<T> {
    /// Found items
    pub values: Vec<T>,
    /// Position of the last item in `values`, or None if nothing was found.
    /// Note that it doesn't tell if there is anything after it.
    pub cursor: Option<PageCursor>,
}
