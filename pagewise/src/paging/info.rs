//! Page metadata returned alongside list results

use serde::{Deserialize, Serialize};

use super::sort::SortSpec;

/// Metadata describing one fetched page
///
/// Serialized flat: the sort specification contributes `sort_by` and
/// `order_by` next to the counters. `total_count` is left out when unknown and
/// `page` is left out in cursor mode.
///
/// # Example
///
/// ```rust
/// use pagewise::paging::{assemble, SortDirection, SortSpec};
///
/// let sort = SortSpec::new("modified_at", SortDirection::Desc);
/// let info = assemble(4, Some(10), Some(1), 4, sort, String::new());
///
/// assert_eq!(info.count, 4);
/// assert_eq!(info.total_page, 3);
/// assert!(info.more_records);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Rows in the returned page
    pub count: u64,
    /// Rows across all pages, when the caller counted them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    /// Number of pages, 0 when the total is unknown
    pub total_page: u64,
    /// Whether another page follows this one
    pub more_records: bool,
    /// Token for the next page; empty in offset mode or when none could be read
    #[serde(default)]
    pub next_cursor: String,
    /// Echoed page number (offset mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Echoed page size
    pub page_size: u64,
    /// Echoed sort field and direction
    #[serde(flatten)]
    pub sort: SortSpec,
}

/// Ceiling division of `total` by `page_size`
///
/// A zero page size yields 0 pages.
///
/// # Example
///
/// ```rust
/// use pagewise::paging::total_pages;
///
/// assert_eq!(total_pages(10, 4), 3);
/// assert_eq!(total_pages(8, 4), 2);
/// assert_eq!(total_pages(0, 4), 0);
/// assert_eq!(total_pages(10, 0), 0);
/// ```
#[must_use]
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        tracing::warn!(total, "page size is zero, reporting zero pages");
        return 0;
    }
    total.div_ceil(page_size)
}

/// Build the metadata for a fetched page
///
/// - `row_count` is the number of rows the fetch returned, including a row
///   over-fetched in cursor mode
/// - `page` is `Some` in offset mode and `None` in cursor mode
/// - `next_cursor` is passed through unchanged
#[must_use]
pub fn assemble(
    row_count: u64,
    total_count: Option<u64>,
    page: Option<u64>,
    page_size: u64,
    sort: SortSpec,
    next_cursor: String,
) -> PageInfo {
    let past_page = row_count > page_size;
    let more_in_total = match (page, total_count) {
        (Some(page), Some(total)) => total > page.saturating_mul(page_size),
        _ => false,
    };

    PageInfo {
        count: row_count.min(page_size),
        total_count,
        total_page: total_count.map_or(0, |total| total_pages(total, page_size)),
        more_records: past_page || more_in_total,
        next_cursor,
        page,
        page_size,
        sort,
    }
}
