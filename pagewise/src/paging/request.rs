//! Paging request types and the default resolver
//!
//! Requests arrive with every field optional and possibly invalid. Each
//! request type carries a `normalize` method that rewrites it in place into
//! its canonical form using an explicit [`PagingDefaults`] value. Normalizing
//! is idempotent and never fails.
//!
//! The two modes deliberately differ in how they treat an oversized page
//! size: offset mode keeps any positive value, cursor mode clamps it to the
//! configured default.
//!
//! # Example
//!
//! ```rust
//! use pagewise::config::PagingDefaults;
//! use pagewise::paging::{CursorPageRequest, PageRequest};
//!
//! let defaults = PagingDefaults::default();
//!
//! let page = PageRequest::from_query_str("page=3&page_size=4&order_by=asc")
//!     .normalized(&defaults);
//! assert_eq!(page.offset(), 8);
//! assert_eq!(page.sort_clause(&defaults), "modified_at asc");
//!
//! let cursor = CursorPageRequest::new()
//!     .with_page_size(5_000)
//!     .normalized(&defaults);
//! assert_eq!(cursor.items_per_page(), 100);
//! ```

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::PagingDefaults;

use super::adapter::{CursorPredicate, PageWindow, Seek};
use super::sort::{build_sort_clause, SortDirection, SortSpec};

/// Check whether an optional string is missing or whitespace only
///
/// # Example
///
/// ```rust
/// use pagewise::paging::is_blank;
///
/// assert!(is_blank(None));
/// assert!(is_blank(Some("")));
/// assert!(is_blank(Some("  ")));
/// assert!(!is_blank(Some("id")));
/// ```
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn resolve_direction(raw: Option<&str>, defaults: &PagingDefaults) -> SortDirection {
    match raw {
        Some(value) if !value.trim().is_empty() => SortDirection::parse_lenient(value),
        _ => defaults.order,
    }
}

fn positive(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0).max(1)
}

/// Raw key/value pairs bound from a query string
///
/// Integers that fail to parse bind as `0`, which the resolver then replaces
/// with its default.
#[derive(Debug, Default)]
struct WireParams {
    page: i64,
    page_size: i64,
    cursor: String,
    sort_by: Option<String>,
    order_by: Option<String>,
}

impl WireParams {
    fn bind<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "page" => params.page = parse_int("page", value),
                "page_size" => params.page_size = parse_int("page_size", value),
                "cursor" => params.cursor = value.to_string(),
                "sort_by" => params.sort_by = Some(value.to_string()),
                "order_by" => params.order_by = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::bind(url::form_urlencoded::parse(query.as_bytes()))
    }
}

fn parse_int(key: &str, value: &str) -> i64 {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::debug!(key, value, "malformed paging parameter, falling back to default");
        0
    })
}

/// Deserialize a paging integer the way query-string binding does
///
/// Strings are trimmed and parsed; anything that is not an integer becomes
/// `0`, so framework extractors never reject a request over `page=abc`.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientInt;

    impl<'de> Visitor<'de> for LenientInt {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an integer or a string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            Ok(i64::try_from(value).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            tracing::debug!(value, "non-integer paging parameter, falling back to default");
            Ok(0)
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            Ok(parse_int("integer", value))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<i64, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<i64, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(0)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<i64, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(0)
        }
    }

    deserializer.deserialize_any(LenientInt)
}

/// Numbered-page (offset) request
///
/// # Example
///
/// ```rust
/// use pagewise::config::PagingDefaults;
/// use pagewise::paging::PageRequest;
///
/// let defaults = PagingDefaults::default();
/// let mut request = PageRequest::new().with_page(0).with_page_size(-3);
/// request.normalize(&defaults);
///
/// assert_eq!(request.page, 1);
/// assert_eq!(request.page_size, 100);
/// assert_eq!(request.sort_by.as_deref(), Some("modified_at"));
/// assert_eq!(request.order_by.as_deref(), Some("desc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, 1-based once normalized
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: i64,

    /// Rows per page
    #[serde(default, deserialize_with = "lenient_int")]
    pub page_size: i64,

    /// Present on the wire, ignored in offset mode
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cursor: String,

    /// Field to sort on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Sort direction, `asc` or `desc` once normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl PageRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a request from decoded query-string pairs
    ///
    /// Recognized keys are `page`, `page_size`, `cursor`, `sort_by` and
    /// `order_by`. Unknown keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        WireParams::bind(pairs).into()
    }

    /// Bind a request from a raw, percent-encoded query string
    ///
    /// A leading `?` is accepted.
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        WireParams::parse(query).into()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the sort field
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Rewrite this request into its canonical form
    ///
    /// - a non-positive `page_size` becomes the default; large values are kept
    /// - a non-positive `page` becomes 1
    /// - a blank `sort_by` becomes the default sort field
    /// - a blank `order_by` becomes the default order, any other value that is
    ///   not exactly `asc` or `desc` becomes `desc`
    pub fn normalize(&mut self, defaults: &PagingDefaults) {
        if self.page_size <= 0 {
            self.page_size = i64::from(defaults.page_size);
        }
        if self.page <= 0 {
            self.page = 1;
        }
        if is_blank(self.sort_by.as_deref()) {
            self.sort_by = Some(defaults.sort_field.clone());
        }
        let direction = resolve_direction(self.order_by.as_deref(), defaults);
        self.order_by = Some(direction.as_str().to_string());
    }

    /// Consume and return the canonical form of this request
    #[must_use]
    pub fn normalized(mut self, defaults: &PagingDefaults) -> Self {
        self.normalize(defaults);
        self
    }

    /// Replace the default sort with a service-specific one
    ///
    /// Lets a service choose its own ordering when the client did not ask for
    /// one. Call it before [`normalize`](Self::normalize):
    ///
    /// - an empty `sort_by` leaves the request untouched
    /// - a sort field that is blank or equal to the default is replaced
    /// - `order_by` is adopted only if it is non-blank and the request has
    ///   no direction yet
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagewise::config::PagingDefaults;
    /// use pagewise::paging::PageRequest;
    ///
    /// let defaults = PagingDefaults::default();
    ///
    /// let mut request = PageRequest::new();
    /// request.override_default_sort("title", Some("asc"), &defaults);
    /// assert_eq!(request.sort_by.as_deref(), Some("title"));
    /// assert_eq!(request.order_by.as_deref(), Some("asc"));
    ///
    /// let mut chosen = PageRequest::new().with_sort_by("email");
    /// chosen.override_default_sort("title", None, &defaults);
    /// assert_eq!(chosen.sort_by.as_deref(), Some("email"));
    /// ```
    pub fn override_default_sort(
        &mut self,
        sort_by: &str,
        order_by: Option<&str>,
        defaults: &PagingDefaults,
    ) {
        if sort_by.is_empty() {
            return;
        }
        if is_blank(self.sort_by.as_deref()) {
            self.sort_by = Some(defaults.sort_field.clone());
        }
        if self.sort_by.as_deref() == Some(defaults.sort_field.as_str()) {
            self.sort_by = Some(sort_by.to_string());
        }
        if !is_blank(order_by) && is_blank(self.order_by.as_deref()) {
            self.order_by = order_by.map(str::to_string);
        }
    }

    /// Get the 1-indexed page number
    ///
    /// Values below 1 are read as 1.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        positive(self.page)
    }

    /// Get the number of rows per page
    ///
    /// Meaningful once the request is normalized; a non-positive raw value is
    /// read as 1.
    #[must_use]
    pub fn items_per_page(&self) -> u64 {
        positive(self.page_size)
    }

    /// Number of rows to skip: `(page - 1) * page_size`
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page_number() - 1).saturating_mul(self.items_per_page())
    }

    /// Resolved sort direction
    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        SortDirection::parse_lenient(self.order_by.as_deref().unwrap_or_default())
    }

    /// Resolved sort field and direction
    #[must_use]
    pub fn sort_spec(&self, defaults: &PagingDefaults) -> SortSpec {
        let field = match self.sort_by.as_deref() {
            Some(field) if !field.trim().is_empty() => field,
            _ => defaults.sort_field.as_str(),
        };
        SortSpec::new(field, resolve_direction(self.order_by.as_deref(), defaults))
    }

    /// Ordering clause handed to the storage layer
    #[must_use]
    pub fn sort_clause(&self, defaults: &PagingDefaults) -> String {
        build_sort_clause(
            self.sort_by.as_deref(),
            Some(resolve_direction(self.order_by.as_deref(), defaults).as_str()),
            &defaults.sort_field,
        )
    }

    /// Limit, offset and ordering for one fetch
    #[must_use]
    pub fn window(&self, defaults: &PagingDefaults) -> PageWindow {
        PageWindow::new(
            self.items_per_page(),
            Some(Seek::Offset(self.offset())),
            self.sort_clause(defaults),
        )
    }
}

impl From<WireParams> for PageRequest {
    fn from(params: WireParams) -> Self {
        Self {
            page: params.page,
            page_size: params.page_size,
            cursor: params.cursor,
            sort_by: params.sort_by,
            order_by: params.order_by,
        }
    }
}

/// Cursor (keyset) request
///
/// `cursor_field` is not bound from the wire; the handler chooses it.
///
/// # Example
///
/// ```rust
/// use pagewise::config::PagingDefaults;
/// use pagewise::paging::CursorPageRequest;
///
/// let defaults = PagingDefaults::default();
/// let request = CursorPageRequest::new()
///     .with_cursor_field("id")
///     .with_cursor("42")
///     .with_order_by("asc")
///     .normalized(&defaults);
///
/// let predicate = request.predicate(&defaults).unwrap();
/// assert_eq!(predicate.to_string(), "id > ?");
/// assert_eq!(request.fetch_limit(), 101);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPageRequest {
    /// Rows per page
    #[serde(default, deserialize_with = "lenient_int")]
    pub page_size: i64,

    /// Logical field used for both keyset comparison and cursor extraction
    #[serde(skip)]
    pub cursor_field: String,

    /// Opaque continuation token; empty on the first page
    #[serde(default)]
    pub cursor: String,

    /// Field to sort on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Sort direction, `asc` or `desc` once normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl CursorPageRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a request from decoded query-string pairs
    ///
    /// `page` is recognized but has no meaning in cursor mode.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        WireParams::bind(pairs).into()
    }

    /// Bind a request from a raw, percent-encoded query string
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        WireParams::parse(query).into()
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the cursor field
    #[must_use]
    pub fn with_cursor_field(mut self, field: impl Into<String>) -> Self {
        self.cursor_field = field.into();
        self
    }

    /// Set the continuation token
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// Set the sort field
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Rewrite this request into its canonical form
    ///
    /// Unlike offset mode, a page size above the default is clamped down to
    /// the default. A blank `sort_by` becomes the resolved cursor field, so
    /// the keyset predicate and the ordering agree.
    pub fn normalize(&mut self, defaults: &PagingDefaults) {
        let max = i64::from(defaults.page_size);
        if self.page_size <= 0 || self.page_size > max {
            self.page_size = max;
        }
        if self.cursor_field.trim().is_empty() {
            self.cursor_field = defaults.cursor_field.clone();
        }
        if is_blank(self.sort_by.as_deref()) {
            self.sort_by = Some(self.cursor_field.clone());
        }
        let direction = resolve_direction(self.order_by.as_deref(), defaults);
        self.order_by = Some(direction.as_str().to_string());
    }

    /// Consume and return the canonical form of this request
    #[must_use]
    pub fn normalized(mut self, defaults: &PagingDefaults) -> Self {
        self.normalize(defaults);
        self
    }

    /// Get the number of rows per page
    #[must_use]
    pub fn items_per_page(&self) -> u64 {
        positive(self.page_size)
    }

    /// Rows to request from storage: one more than the page size, so the
    /// extra row reveals whether another page exists
    #[must_use]
    pub fn fetch_limit(&self) -> u64 {
        self.items_per_page().saturating_add(1)
    }

    /// Whether a continuation token was supplied
    #[must_use]
    pub fn has_cursor(&self) -> bool {
        !self.cursor.is_empty()
    }

    /// Resolved sort direction
    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        SortDirection::parse_lenient(self.order_by.as_deref().unwrap_or_default())
    }

    /// Resolved sort field and direction
    #[must_use]
    pub fn sort_spec(&self, defaults: &PagingDefaults) -> SortSpec {
        let field = match self.sort_by.as_deref() {
            Some(field) if !field.trim().is_empty() => field,
            _ => self.cursor_field(defaults),
        };
        SortSpec::new(field, resolve_direction(self.order_by.as_deref(), defaults))
    }

    /// Ordering clause handed to the storage layer
    #[must_use]
    pub fn sort_clause(&self, defaults: &PagingDefaults) -> String {
        build_sort_clause(
            self.sort_by.as_deref(),
            Some(resolve_direction(self.order_by.as_deref(), defaults).as_str()),
            self.cursor_field(defaults),
        )
    }

    /// Logical cursor field, falling back to the default when unset
    #[must_use]
    pub fn cursor_field<'a>(&'a self, defaults: &'a PagingDefaults) -> &'a str {
        if self.cursor_field.trim().is_empty() {
            &defaults.cursor_field
        } else {
            &self.cursor_field
        }
    }

    /// Keyset predicate that continues after the supplied cursor
    ///
    /// Returns `None` on the first page.
    #[must_use]
    pub fn predicate(&self, defaults: &PagingDefaults) -> Option<CursorPredicate> {
        if !self.has_cursor() {
            return None;
        }
        Some(CursorPredicate::new(
            self.cursor_field(defaults),
            resolve_direction(self.order_by.as_deref(), defaults),
            self.cursor.clone(),
        ))
    }

    /// Over-fetching limit, keyset predicate and ordering for one fetch
    ///
    /// Keyset paging only visits every row once when rows are ordered by the
    /// cursor field. An explicit `sort_by` on another field is honoured but
    /// logged as a warning.
    #[must_use]
    pub fn window(&self, defaults: &PagingDefaults) -> PageWindow {
        let cursor_field = self.cursor_field(defaults);
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            if sort_by != cursor_field {
                tracing::warn!(
                    cursor_field,
                    sort_by,
                    "cursor page sorted on a different field than the cursor, rows may be skipped or repeated"
                );
            }
        }
        PageWindow::new(
            self.fetch_limit(),
            self.predicate(defaults).map(Seek::After),
            self.sort_clause(defaults),
        )
    }
}

impl From<WireParams> for CursorPageRequest {
    fn from(params: WireParams) -> Self {
        Self {
            page_size: params.page_size,
            cursor_field: String::new(),
            cursor: params.cursor,
            sort_by: params.sort_by,
            order_by: params.order_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PagingDefaults {
        PagingDefaults::default()
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t")));
        assert!(!is_blank(Some("not empty")));
    }

    #[test]
    fn test_page_request_default_values() {
        let request = PageRequest::new().normalized(&defaults());
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 100);
        assert_eq!(request.sort_by.as_deref(), Some("modified_at"));
        assert_eq!(request.order_by.as_deref(), Some("desc"));
    }

    #[test]
    fn test_page_request_page_and_size_defaulting() {
        let cases = [
            ((-1, -1), (1, 100)),
            ((0, -1), (1, 100)),
            ((3, -1), (3, 100)),
            ((-1, 0), (1, 100)),
            ((0, 0), (1, 100)),
            ((3, 0), (3, 100)),
            ((-1, 4), (1, 4)),
            ((0, 4), (1, 4)),
            ((3, 4), (3, 4)),
        ];
        for ((page, size), (want_page, want_size)) in cases {
            let request = PageRequest::new()
                .with_page(page)
                .with_page_size(size)
                .normalized(&defaults());
            assert_eq!(request.page, want_page, "page for ({page}, {size})");
            assert_eq!(request.page_size, want_size, "size for ({page}, {size})");
        }
    }

    #[test]
    fn test_page_request_does_not_cap_large_page_size() {
        let request = PageRequest::new().with_page_size(1_000).normalized(&defaults());
        assert_eq!(request.page_size, 1_000);
        assert_eq!(request.items_per_page(), 1_000);
    }

    #[test]
    fn test_cursor_request_caps_large_page_size() {
        let request = CursorPageRequest::new()
            .with_page_size(101)
            .normalized(&defaults());
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_cursor_request_non_positive_page_size() {
        for size in [0, -5, i64::MIN] {
            let request = CursorPageRequest::new()
                .with_page_size(size)
                .normalized(&defaults());
            assert_eq!(request.page_size, 100, "size {size}");
        }
    }

    #[test]
    fn test_cursor_request_keeps_valid_page_size() {
        let request = CursorPageRequest::new()
            .with_page_size(10)
            .normalized(&defaults());
        assert_eq!(request.page_size, 10);
        assert_eq!(request.fetch_limit(), 11);
    }

    #[test]
    fn test_cursor_request_default_values() {
        let request = CursorPageRequest::new().normalized(&defaults());
        assert_eq!(request.cursor_field, "modified_at");
        assert_eq!(request.page_size, 100);
        assert_eq!(request.sort_by.as_deref(), Some("modified_at"));
        assert_eq!(request.order_by.as_deref(), Some("desc"));
    }

    #[test]
    fn test_cursor_request_keeps_cursor_field_and_sort() {
        let request = CursorPageRequest::new()
            .with_cursor_field("custom_field")
            .with_sort_by("custom_sort")
            .normalized(&defaults());
        assert_eq!(request.cursor_field, "custom_field");
        assert_eq!(request.sort_by.as_deref(), Some("custom_sort"));
    }

    #[test]
    fn test_order_by_resolution() {
        let cases = [
            (None, "desc"),
            (Some(""), "desc"),
            (Some("  "), "desc"),
            (Some("asc"), "asc"),
            (Some("desc"), "desc"),
            (Some("unknown"), "desc"),
            (Some("ASC"), "desc"),
        ];
        for (raw, want) in cases {
            let mut offset = PageRequest::new();
            offset.order_by = raw.map(str::to_string);
            offset.normalize(&defaults());
            assert_eq!(offset.order_by.as_deref(), Some(want), "offset {raw:?}");

            let mut cursor = CursorPageRequest::new();
            cursor.order_by = raw.map(str::to_string);
            cursor.normalize(&defaults());
            assert_eq!(cursor.order_by.as_deref(), Some(want), "cursor {raw:?}");
        }
    }

    #[test]
    fn test_blank_order_uses_configured_default() {
        let defaults = PagingDefaults {
            order: SortDirection::Asc,
            ..PagingDefaults::default()
        };
        let request = PageRequest::new().normalized(&defaults);
        assert_eq!(request.order_by.as_deref(), Some("asc"));

        let invalid = PageRequest::new().with_order_by("sideways").normalized(&defaults);
        assert_eq!(invalid.order_by.as_deref(), Some("desc"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = [
            PageRequest::new(),
            PageRequest::new().with_page(-2).with_page_size(0),
            PageRequest::new().with_page(7).with_page_size(5_000),
            PageRequest::new().with_sort_by("order").with_order_by("nope"),
            PageRequest::new().with_sort_by(" ").with_order_by("asc"),
        ];
        for request in raw {
            let once = request.normalized(&defaults());
            let twice = once.clone().normalized(&defaults());
            assert_eq!(once, twice);
        }

        let cursor = CursorPageRequest::new()
            .with_page_size(500)
            .with_cursor("abc")
            .normalized(&defaults());
        assert_eq!(cursor.clone().normalized(&defaults()), cursor);
    }

    #[test]
    fn test_reserved_sort_field_is_not_rewritten() {
        let request = PageRequest::new().with_sort_by("order").normalized(&defaults());
        assert_eq!(request.sort_by.as_deref(), Some("order"));
        assert_eq!(request.sort_clause(&defaults()), "\"order\" desc");
    }

    #[test]
    fn test_offset_calculation() {
        let request = PageRequest::new()
            .with_page(3)
            .with_page_size(4)
            .normalized(&defaults());
        assert_eq!(request.offset(), 8);

        let first = PageRequest::new().with_page_size(4).normalized(&defaults());
        assert_eq!(first.offset(), 0);

        let defaulted_size = PageRequest::new()
            .with_page(3)
            .with_page_size(-1)
            .normalized(&defaults());
        assert_eq!(defaulted_size.offset(), 200);
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let request = PageRequest::new()
            .with_page(i64::MAX)
            .with_page_size(i64::MAX)
            .normalized(&defaults());
        assert_eq!(request.offset(), u64::MAX);
    }

    #[test]
    fn test_sort_clause_defaults() {
        let combos: [(Option<&str>, Option<&str>, &str); 6] = [
            (None, Some("random"), "modified_at desc"),
            (None, Some("asc"), "modified_at asc"),
            (Some(""), Some("asc"), "modified_at asc"),
            (Some("normal"), Some("asc"), "normal asc"),
            (Some(""), Some(""), "modified_at desc"),
            (Some("normal"), None, "normal desc"),
        ];
        for (sort_by, order_by, want) in combos {
            let mut request = PageRequest::new();
            request.sort_by = sort_by.map(str::to_string);
            request.order_by = order_by.map(str::to_string);
            request.normalize(&defaults());
            assert_eq!(request.sort_clause(&defaults()), want);
        }
    }

    #[test]
    fn test_sort_spec() {
        let request = PageRequest::new()
            .with_sort_by("email")
            .with_order_by("asc")
            .normalized(&defaults());
        let spec = request.sort_spec(&defaults());
        assert_eq!(spec.field, "email");
        assert_eq!(spec.direction, SortDirection::Asc);
        assert_eq!(request.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn test_override_default_sort() {
        struct Case {
            name: &'static str,
            initial_sort: Option<&'static str>,
            initial_order: Option<&'static str>,
            sort_by: &'static str,
            order_by: Option<&'static str>,
            want_sort: Option<&'static str>,
            want_order: Option<&'static str>,
        }

        let cases = [
            Case {
                name: "default then overridden with the default",
                initial_sort: None,
                initial_order: None,
                sort_by: "modified_at",
                order_by: Some("asc"),
                want_sort: Some("modified_at"),
                want_order: Some("asc"),
            },
            Case {
                name: "keeps an explicit non-default sort",
                initial_sort: Some("email"),
                initial_order: None,
                sort_by: "modified_at",
                order_by: Some("desc"),
                want_sort: Some("email"),
                want_order: Some("desc"),
            },
            Case {
                name: "replaces the default sort",
                initial_sort: None,
                initial_order: Some("asc"),
                sort_by: "name",
                order_by: None,
                want_sort: Some("name"),
                want_order: Some("asc"),
            },
            Case {
                name: "empty sort_by is a no-op",
                initial_sort: None,
                initial_order: None,
                sort_by: "",
                order_by: Some("desc"),
                want_sort: None,
                want_order: None,
            },
            Case {
                name: "does not override an existing order",
                initial_sort: Some("modified_at"),
                initial_order: Some("asc"),
                sort_by: "updated_at",
                order_by: Some("desc"),
                want_sort: Some("updated_at"),
                want_order: Some("asc"),
            },
            Case {
                name: "blank order_by is ignored",
                initial_sort: Some("modified_at"),
                initial_order: None,
                sort_by: "email",
                order_by: Some(" "),
                want_sort: Some("email"),
                want_order: None,
            },
        ];

        for case in cases {
            let mut request = PageRequest {
                sort_by: case.initial_sort.map(str::to_string),
                order_by: case.initial_order.map(str::to_string),
                ..PageRequest::default()
            };
            request.override_default_sort(case.sort_by, case.order_by, &defaults());
            assert_eq!(request.sort_by.as_deref(), case.want_sort, "{}", case.name);
            assert_eq!(request.order_by.as_deref(), case.want_order, "{}", case.name);
        }
    }

    #[test]
    fn test_from_query_str() {
        let request = PageRequest::from_query_str("?page=2&page_size=25&sort_by=name&order_by=asc&x=1");
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, 25);
        assert_eq!(request.sort_by.as_deref(), Some("name"));
        assert_eq!(request.order_by.as_deref(), Some("asc"));
    }

    #[test]
    fn test_from_query_str_malformed_values_default() {
        let request = PageRequest::from_query_str("page=abc&page_size=1.5").normalized(&defaults());
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_from_query_str_decodes_cursor() {
        let request = CursorPageRequest::from_query_str("cursor=2024-01-01%2010%3A00&page_size=5");
        assert_eq!(request.cursor, "2024-01-01 10:00");
        assert_eq!(request.page_size, 5);
        assert!(request.cursor_field.is_empty());
    }

    #[test]
    fn test_from_query_pairs() {
        let request = PageRequest::from_query_pairs([("page", "4"), ("page_size", " 10 ")]);
        assert_eq!(request.page, 4);
        assert_eq!(request.page_size, 10);
    }

    #[test]
    fn test_page_request_serde() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page": 2, "page_size": 10, "sort_by": "id"}"#).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.cursor, "");
        assert!(request.order_by.is_none());
    }

    #[test]
    fn test_extractor_binding_tolerates_malformed_integers() {
        let request: PageRequest = serde_urlencoded::from_str("page=abc&page_size=").unwrap();
        assert_eq!((request.page, request.page_size), (0, 0));
        let request = request.normalized(&defaults());
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 100);

        let cursor: CursorPageRequest =
            serde_urlencoded::from_str("page_size=lots&cursor=7").unwrap();
        let cursor = cursor.normalized(&defaults());
        assert_eq!(cursor.page_size, 100);
        assert_eq!(cursor.cursor, "7");

        let spaced: PageRequest = serde_urlencoded::from_str("page=%203%20&page_size=4").unwrap();
        assert_eq!((spaced.page, spaced.page_size), (3, 4));
    }

    #[test]
    fn test_json_binding_tolerates_malformed_integers() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page": "abc", "page_size": 2.5, "sort_by": "id"}"#).unwrap();
        assert_eq!((request.page, request.page_size), (0, 0));

        let nulls: PageRequest = serde_json::from_str(r#"{"page": null, "page_size": "12"}"#).unwrap();
        assert_eq!((nulls.page, nulls.page_size), (0, 12));

        let cursor: CursorPageRequest =
            serde_json::from_str(r#"{"page_size": [1], "cursor": "abc"}"#).unwrap();
        assert_eq!(cursor.normalized(&defaults()).page_size, 100);
    }

    #[test]
    fn test_cursor_sort_defaults_to_cursor_field() {
        let request = CursorPageRequest::new()
            .with_cursor_field("id")
            .with_cursor("10")
            .normalized(&defaults());
        assert_eq!(request.sort_by.as_deref(), Some("id"));
        assert_eq!(request.sort_spec(&defaults()).field, "id");

        let window = request.window(&defaults());
        assert_eq!(window.order, "id desc");
        assert!(matches!(window.seek, Some(Seek::After(ref p)) if p.field == "id"));

        let configured = PagingDefaults {
            cursor_field: "order".to_string(),
            ..PagingDefaults::default()
        };
        let reserved = CursorPageRequest::new().normalized(&configured);
        assert_eq!(reserved.sort_clause(&configured), "\"order\" desc");
    }

    #[test]
    fn test_cursor_request_ignores_wire_cursor_field() {
        let request: CursorPageRequest =
            serde_json::from_str(r#"{"page_size": 10, "cursor": "abc"}"#).unwrap();
        assert!(request.cursor_field.is_empty());
        assert_eq!(request.cursor, "abc");
    }

    #[test]
    fn test_cursor_predicate_direction() {
        let desc = CursorPageRequest::new()
            .with_cursor_field("id")
            .with_cursor("10")
            .normalized(&defaults());
        let predicate = desc.predicate(&defaults()).unwrap();
        assert_eq!(predicate.field, "id");
        assert_eq!(predicate.direction, SortDirection::Desc);
        assert_eq!(predicate.value, "10");

        let first_page = CursorPageRequest::new().normalized(&defaults());
        assert!(first_page.predicate(&defaults()).is_none());
    }

    #[test]
    fn test_offset_window() {
        let request = PageRequest::new()
            .with_page(2)
            .with_page_size(10)
            .with_sort_by("name")
            .normalized(&defaults());
        let window = request.window(&defaults());
        assert_eq!(window.limit, 10);
        assert_eq!(window.seek, Some(Seek::Offset(10)));
        assert_eq!(window.order, "name desc");
    }

    #[test]
    fn test_cursor_window() {
        let request = CursorPageRequest::new()
            .with_page_size(20)
            .with_cursor("99")
            .with_cursor_field("id")
            .with_sort_by("id")
            .with_order_by("asc")
            .normalized(&defaults());
        let window = request.window(&defaults());
        assert_eq!(window.limit, 21);
        assert!(matches!(window.seek, Some(Seek::After(ref p)) if p.value == "99"));
        assert_eq!(window.order, "id asc");
    }
}
