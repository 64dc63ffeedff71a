//! Pagination and cursor resolution
//!
//! List endpoints page through records in one of two modes:
//!
//! - **Offset**: the client names a page number, the storage layer skips
//!   `(page - 1) * page_size` rows. See [`PageRequest`].
//! - **Cursor** (keyset): the client hands back the token from the previous
//!   page and the storage layer continues after it. See [`CursorPageRequest`].
//!
//! Both flow through the same stages: normalize the raw request against
//! [`PagingDefaults`](crate::config::PagingDefaults), turn it into a
//! [`PageWindow`] for the [`QueryBuilder`], read the [`next_cursor`] from the
//! fetched rows and [`assemble`] the [`PageInfo`] for the client.
//! [`Paginator`](crate::paginator::Paginator) bundles those stages.
//!
//! Nothing in this module returns an error. Invalid input is defaulted and
//! extraction problems yield an empty cursor.

mod adapter;
mod cursor;
mod info;
mod request;
mod response;
mod sort;

pub use adapter::{apply, CursorPredicate, PageWindow, QueryBuilder, Seek, SqlTail};
pub use cursor::{next_cursor, CursorRow, CursorValue, ToCursorValue};
pub use info::{assemble, total_pages, PageInfo};
pub use request::{is_blank, CursorPageRequest, PageRequest};
pub use response::{ListResponse, ResponseMeta};
pub use sort::{build_sort_clause, quote_field, SortDirection, SortSpec, RESERVED_SORT_FIELDS};
