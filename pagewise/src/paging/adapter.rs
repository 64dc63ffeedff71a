//! Storage-facing query adapter
//!
//! The engine never runs queries. It resolves a [`PageWindow`] and hands it to
//! whatever query builder the storage layer uses, through the [`QueryBuilder`]
//! trait. [`SqlTail`] is a ready-made builder that renders the SQL suffix of a
//! list query.
//!
//! # Example
//!
//! ```rust
//! use pagewise::paging::{apply, PageWindow, Seek, SqlTail};
//!
//! let window = PageWindow::new(20, Some(Seek::Offset(40)), "name asc".to_string());
//! let mut tail = SqlTail::new();
//! apply(&mut tail, Some(&window));
//!
//! assert_eq!(tail.to_sql(), "ORDER BY name asc LIMIT 20 OFFSET 40");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sort::{quote_field, SortDirection};

/// Keyset condition that selects rows strictly after a cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPredicate {
    /// Field compared against the cursor
    pub field: String,
    /// Direction of the ordering being continued
    pub direction: SortDirection,
    /// Cursor token, bound as a parameter
    pub value: String,
}

impl CursorPredicate {
    /// Create a predicate
    pub fn new(field: impl Into<String>, direction: SortDirection, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction,
            value: value.into(),
        }
    }

    /// `<` for descending order, `>` for ascending
    #[must_use]
    pub fn operator(&self) -> &'static str {
        self.direction.seek_operator()
    }
}

/// Renders the condition with a `?` placeholder for the value
impl fmt::Display for CursorPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ?", quote_field(&self.field), self.operator())
    }
}

/// How a fetch skips past earlier rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seek {
    /// Skip a fixed number of rows
    Offset(u64),
    /// Continue after a cursor
    After(CursorPredicate),
}

/// Resolved limit, seek and ordering for a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Maximum rows to fetch
    pub limit: u64,
    /// Rows to skip, or the keyset to continue after
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek: Option<Seek>,
    /// Ordering clause
    pub order: String,
}

impl PageWindow {
    /// Create a window
    #[must_use]
    pub fn new(limit: u64, seek: Option<Seek>, order: String) -> Self {
        Self { limit, seek, order }
    }

    /// Row offset, when this is an offset window
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match self.seek {
            Some(Seek::Offset(n)) => Some(n),
            _ => None,
        }
    }

    /// Keyset predicate, when this is a cursor window past the first page
    #[must_use]
    pub fn predicate(&self) -> Option<&CursorPredicate> {
        match &self.seek {
            Some(Seek::After(predicate)) => Some(predicate),
            _ => None,
        }
    }
}

/// A query under construction that can be narrowed to a page
pub trait QueryBuilder {
    /// Restrict rows to those after a cursor
    fn seek(&mut self, predicate: &CursorPredicate);

    /// Set the ordering clause
    fn order(&mut self, clause: &str);

    /// Cap the number of rows
    fn limit(&mut self, limit: u64);

    /// Skip rows
    fn offset(&mut self, offset: u64);
}

/// Apply a page window to a query
///
/// Calls `seek`, `order`, `limit` and `offset` in that order, skipping the
/// parts the window does not carry. `None` leaves the query untouched.
pub fn apply<Q: QueryBuilder + ?Sized>(query: &mut Q, window: Option<&PageWindow>) {
    let Some(window) = window else {
        return;
    };

    if let Some(predicate) = window.predicate() {
        query.seek(predicate);
    }
    query.order(&window.order);
    query.limit(window.limit);
    if let Some(offset) = window.offset() {
        query.offset(offset);
    }
}

/// SQL suffix builder with positional `$n` binds
///
/// Renders `WHERE .. ORDER BY .. LIMIT .. OFFSET ..`, leaving out the parts
/// that were never set. Cursor tokens are collected as bind values rather
/// than inlined.
///
/// # Example
///
/// ```rust
/// use pagewise::paging::{CursorPredicate, QueryBuilder, SortDirection, SqlTail};
///
/// let mut tail = SqlTail::starting_at(2);
/// tail.seek(&CursorPredicate::new("id", SortDirection::Desc, "99"));
/// tail.order("id desc");
/// tail.limit(11);
///
/// assert_eq!(tail.to_sql(), "WHERE id < $2 ORDER BY id desc LIMIT 11");
/// assert_eq!(tail.binds(), ["99"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTail {
    next_bind: usize,
    conditions: Vec<String>,
    binds: Vec<String>,
    order: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for SqlTail {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SqlTail {
    /// Create a builder whose first bind is `$1`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose first bind is `$first_bind`, for queries that
    /// already bind earlier parameters
    #[must_use]
    pub fn starting_at(first_bind: usize) -> Self {
        Self {
            next_bind: first_bind.max(1),
            conditions: Vec::new(),
            binds: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    /// Bind values in placeholder order
    #[must_use]
    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    /// Render the SQL suffix
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl QueryBuilder for SqlTail {
    fn seek(&mut self, predicate: &CursorPredicate) {
        self.conditions.push(format!(
            "{} {} ${}",
            quote_field(&predicate.field),
            predicate.operator(),
            self.next_bind
        ));
        self.binds.push(predicate.value.clone());
        self.next_bind += 1;
    }

    fn order(&mut self, clause: &str) {
        if !clause.trim().is_empty() {
            self.order = Some(clause.to_string());
        }
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }
}

impl fmt::Display for SqlTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if !self.conditions.is_empty() {
            parts.push(format!("WHERE {}", self.conditions.join(" AND ")));
        }
        if let Some(order) = &self.order {
            parts.push(format!("ORDER BY {order}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("OFFSET {offset}"));
        }
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl QueryBuilder for Recorder {
        fn seek(&mut self, predicate: &CursorPredicate) {
            self.calls.push(format!("seek {predicate}"));
        }

        fn order(&mut self, clause: &str) {
            self.calls.push(format!("order {clause}"));
        }

        fn limit(&mut self, limit: u64) {
            self.calls.push(format!("limit {limit}"));
        }

        fn offset(&mut self, offset: u64) {
            self.calls.push(format!("offset {offset}"));
        }
    }

    #[test]
    fn test_apply_none_is_noop() {
        let mut recorder = Recorder::default();
        apply(&mut recorder, None);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_apply_offset_window() {
        let window = PageWindow::new(4, Some(Seek::Offset(8)), "modified_at desc".into());
        let mut recorder = Recorder::default();
        apply(&mut recorder, Some(&window));
        assert_eq!(
            recorder.calls,
            ["order modified_at desc", "limit 4", "offset 8"]
        );
    }

    #[test]
    fn test_apply_cursor_window_calls_seek_first() {
        let predicate = CursorPredicate::new("id", SortDirection::Asc, "10");
        let window = PageWindow::new(11, Some(Seek::After(predicate)), "id asc".into());
        let mut recorder = Recorder::default();
        apply(&mut recorder, Some(&window));
        assert_eq!(recorder.calls, ["seek id > ?", "order id asc", "limit 11"]);
    }

    #[test]
    fn test_apply_first_cursor_page_has_no_seek() {
        let window = PageWindow::new(101, None, "modified_at desc".into());
        let mut recorder = Recorder::default();
        apply(&mut recorder, Some(&window));
        assert_eq!(recorder.calls, ["order modified_at desc", "limit 101"]);
    }

    #[test]
    fn test_predicate_display_quotes_reserved_field() {
        let predicate = CursorPredicate::new("order", SortDirection::Desc, "3");
        assert_eq!(predicate.to_string(), "\"order\" < ?");
    }

    #[test]
    fn test_sql_tail_empty() {
        assert_eq!(SqlTail::new().to_sql(), "");
    }

    #[test]
    fn test_sql_tail_offset() {
        let window = PageWindow::new(25, Some(Seek::Offset(50)), "\"order\" asc".into());
        let mut tail = SqlTail::new();
        apply(&mut tail, Some(&window));
        assert_eq!(tail.to_sql(), "ORDER BY \"order\" asc LIMIT 25 OFFSET 50");
        assert!(tail.binds().is_empty());
    }

    #[test]
    fn test_sql_tail_cursor() {
        let predicate = CursorPredicate::new("modified_at", SortDirection::Desc, "2024-01-01");
        let window = PageWindow::new(3, Some(Seek::After(predicate)), "modified_at desc".into());
        let mut tail = SqlTail::new();
        apply(&mut tail, Some(&window));
        assert_eq!(
            tail.to_sql(),
            "WHERE modified_at < $1 ORDER BY modified_at desc LIMIT 3"
        );
        assert_eq!(tail.binds(), ["2024-01-01"]);
    }

    #[test]
    fn test_sql_tail_bind_numbering() {
        let mut tail = SqlTail::starting_at(0);
        tail.seek(&CursorPredicate::new("a", SortDirection::Asc, "1"));
        tail.seek(&CursorPredicate::new("b", SortDirection::Asc, "2"));
        assert_eq!(tail.to_sql(), "WHERE a > $1 AND b > $2");
    }

    #[test]
    fn test_window_serializes_seek() {
        let window = PageWindow::new(10, Some(Seek::Offset(20)), "id desc".into());
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"limit": 10, "seek": {"offset": 20}, "order": "id desc"})
        );

        let first_page = PageWindow::new(11, None, "id desc".into());
        let json = serde_json::to_value(&first_page).unwrap();
        assert!(json.get("seek").is_none());
    }
}
