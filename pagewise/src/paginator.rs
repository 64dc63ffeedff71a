//! Request-to-response orchestration
//!
//! [`Paginator`] owns the paging defaults and runs the full flow for a list
//! endpoint: normalize the request, narrow the query, and turn the fetched
//! rows into a [`ListResponse`].
//!
//! # Example
//!
//! ```rust
//! use pagewise::config::PagingDefaults;
//! use pagewise::paginator::Paginator;
//! use pagewise::paging::{PageRequest, SqlTail};
//!
//! let paginator = Paginator::new(PagingDefaults::default());
//! let request = paginator.resolve(PageRequest::from_query_str("page=2&page_size=10"));
//!
//! let mut tail = SqlTail::new();
//! paginator.prepare(&mut tail, &request);
//! assert_eq!(tail.to_sql(), "ORDER BY modified_at desc LIMIT 10 OFFSET 10");
//!
//! let rows: Vec<u32> = (11..=20).collect();
//! let response = paginator.offset_page(&request, rows, Some(35));
//! assert_eq!(response.info.total_page, 4);
//! assert!(response.info.more_records);
//! ```

use std::sync::Arc;

use crate::config::{Config, PagingDefaults};
use crate::paging::{
    apply, assemble, next_cursor, CursorPageRequest, CursorRow, ListResponse, PageInfo,
    PageRequest, PageWindow, QueryBuilder,
};

/// Paging engine bound to one set of defaults
///
/// Cheap to clone and safe to share across request handlers.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    defaults: Arc<PagingDefaults>,
}

impl Paginator {
    /// Create a paginator with the given defaults
    #[must_use]
    pub fn new(defaults: PagingDefaults) -> Self {
        Self {
            defaults: Arc::new(defaults),
        }
    }

    /// Create a paginator from loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paging.clone())
    }

    /// Defaults this paginator applies
    #[must_use]
    pub fn defaults(&self) -> &PagingDefaults {
        &self.defaults
    }

    /// Normalize an offset request
    #[must_use]
    pub fn resolve(&self, request: PageRequest) -> PageRequest {
        request.normalized(&self.defaults)
    }

    /// Normalize a cursor request
    #[must_use]
    pub fn resolve_cursor(&self, request: CursorPageRequest) -> CursorPageRequest {
        request.normalized(&self.defaults)
    }

    /// Window for an offset request
    #[must_use]
    pub fn offset_window(&self, request: &PageRequest) -> PageWindow {
        request.window(&self.defaults)
    }

    /// Window for a cursor request, over-fetching by one row
    #[must_use]
    pub fn cursor_window(&self, request: &CursorPageRequest) -> PageWindow {
        request.window(&self.defaults)
    }

    /// Narrow a query to the page an offset request asks for
    pub fn prepare<Q: QueryBuilder + ?Sized>(&self, query: &mut Q, request: &PageRequest) {
        apply(query, Some(&self.offset_window(request)));
    }

    /// Narrow a query to the page a cursor request asks for
    pub fn prepare_cursor<Q: QueryBuilder + ?Sized>(
        &self,
        query: &mut Q,
        request: &CursorPageRequest,
    ) {
        apply(query, Some(&self.cursor_window(request)));
    }

    /// Metadata for a fetched offset page
    #[must_use]
    pub fn offset_info(&self, request: &PageRequest, row_count: usize, total_count: Option<u64>) -> PageInfo {
        assemble(
            to_u64(row_count),
            total_count,
            Some(request.page_number()),
            request.items_per_page(),
            request.sort_spec(&self.defaults),
            String::new(),
        )
    }

    /// Metadata for a fetched cursor page
    ///
    /// `rows` is everything the over-fetching query returned.
    #[must_use]
    pub fn cursor_info<R: CursorRow>(
        &self,
        request: &CursorPageRequest,
        rows: &[R],
        total_count: Option<u64>,
    ) -> PageInfo {
        let page_size = request.items_per_page();
        let cursor = next_cursor(rows, page_size, request.cursor_field(&self.defaults));
        assemble(
            to_u64(rows.len()),
            total_count,
            None,
            page_size,
            request.sort_spec(&self.defaults),
            cursor,
        )
    }

    /// Wrap an offset page in the list envelope
    pub fn offset_page<T>(
        &self,
        request: &PageRequest,
        rows: Vec<T>,
        total_count: Option<u64>,
    ) -> ListResponse<T> {
        let info = self.offset_info(request, rows.len(), total_count);
        ListResponse::new(rows, info)
    }

    /// Wrap a cursor page in the list envelope
    ///
    /// The over-fetched row, if any, is dropped from the returned data after
    /// the metadata is computed.
    pub fn cursor_page<T: CursorRow>(
        &self,
        request: &CursorPageRequest,
        mut rows: Vec<T>,
        total_count: Option<u64>,
    ) -> ListResponse<T> {
        let info = self.cursor_info(request, &rows, total_count);
        rows.truncate(usize::try_from(info.page_size).unwrap_or(usize::MAX));
        tracing::debug!(
            count = info.count,
            more_records = info.more_records,
            next_cursor = %info.next_cursor,
            "cursor page assembled"
        );
        ListResponse::new(rows, info)
    }
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
