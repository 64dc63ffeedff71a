//! # pagewise
//!
//! Pagination and cursor resolution for list endpoints.
//!
//! Clients ask for pages with partial, sometimes invalid parameters. pagewise
//! turns them into one deterministic parameter set for the storage layer and
//! one computed metadata block for the client, in either of two modes:
//!
//! - **Offset**: numbered pages, `LIMIT`/`OFFSET`
//! - **Cursor**: keyset pages continuing after the last row already seen
//!
//! ## Features
//!
//! - **Default resolution**: missing or invalid page, size and sort values are
//!   defaulted from configuration, never rejected
//! - **Sort clauses**: `"<field> <direction>"` with reserved keywords quoted
//! - **Cursor extraction**: one [`CursorRow`](paging::CursorRow) impl per row
//!   type, or dynamic JSON rows
//! - **Query adapter**: a [`QueryBuilder`](paging::QueryBuilder) seam plus a
//!   ready SQL suffix renderer
//! - **Page metadata**: counts, total pages, more-records flag, next cursor
//! - **Configuration**: TOML files, XDG paths and `PAGEWISE_` environment
//!   variables via figment
//! - **HTTP** (default feature `http`): list responses convert into axum
//!   responses
//!
//! ## Example
//!
//! ```rust
//! use pagewise::prelude::*;
//!
//! #[derive(Debug)]
//! struct Article {
//!     id: i64,
//!     title: String,
//! }
//!
//! pagewise::cursor_row!(Article { id, title });
//!
//! let paginator = Paginator::new(PagingDefaults {
//!     cursor_field: "id".to_string(),
//!     ..PagingDefaults::default()
//! });
//!
//! let request = paginator.resolve_cursor(CursorPageRequest::from_query_str("page_size=2&cursor=10"));
//!
//! let mut tail = SqlTail::new();
//! paginator.prepare_cursor(&mut tail, &request);
//! assert_eq!(tail.to_sql(), "WHERE id < $1 ORDER BY id desc LIMIT 3");
//!
//! let rows = vec![
//!     Article { id: 9, title: "nine".into() },
//!     Article { id: 8, title: "eight".into() },
//!     Article { id: 7, title: "seven".into() },
//! ];
//! let response = paginator.cursor_page(&request, rows, None);
//!
//! assert_eq!(response.data.len(), 2);
//! assert!(response.info.more_records);
//! assert_eq!(response.info.next_cursor, "8");
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod paginator;
pub mod paging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PagingDefaults, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;
    pub use crate::paginator::Paginator;
    pub use crate::paging::{
        apply, assemble, build_sort_clause, is_blank, next_cursor, CursorPageRequest,
        CursorPredicate, CursorRow, CursorValue, ListResponse, PageInfo, PageRequest, PageWindow,
        QueryBuilder, ResponseMeta, Seek, SortDirection, SortSpec, SqlTail, ToCursorValue,
    };
}
