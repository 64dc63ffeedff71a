//! Sort direction, sort specification and the sort clause builder
//!
//! The clause produced here is handed verbatim to the storage layer's ordering
//! operation, so the field name must already be constrained to a known set of
//! columns by the caller.
//!
//! # Example
//!
//! ```rust
//! use pagewise::paging::{build_sort_clause, SortDirection};
//!
//! assert_eq!(build_sort_clause(Some("name"), Some("asc"), "modified_at"), "name asc");
//! assert_eq!(build_sort_clause(None, Some("ASC"), "modified_at"), "modified_at desc");
//! assert_eq!(build_sort_clause(Some("order"), Some("asc"), "id"), "\"order\" asc");
//! assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Desc);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::request::is_blank;

/// Field names that collide with keywords of the target query language
pub const RESERVED_SORT_FIELDS: &[&str] = &["order"];

/// Sort direction for list queries
///
/// # Example
///
/// ```rust
/// use pagewise::paging::SortDirection;
///
/// assert_eq!(format!("{}", SortDirection::Asc), "asc");
/// assert_eq!(format!("{}", SortDirection::Desc), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (A-Z, 0-9, oldest first)
    Asc,
    /// Descending (Z-A, 9-0, newest first)
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SortDirection {
    /// Parse a wire value, collapsing anything other than exactly `asc` to
    /// [`SortDirection::Desc`]
    ///
    /// Matching is case-sensitive: `ASC` resolves to descending.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    /// Lower-case wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Comparison operator a keyset predicate uses to move past a cursor
    /// in this direction
    #[must_use]
    pub const fn seek_operator(&self) -> &'static str {
        match self {
            Self::Asc => ">",
            Self::Desc => "<",
        }
    }
}

/// A fully resolved sort field and direction
///
/// Serialized with the wire names `sort_by` and `order_by`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column or logical field to sort on
    #[serde(rename = "sort_by")]
    pub field: String,
    /// Sort direction
    #[serde(rename = "order_by")]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort specification
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Render this specification as an ordering clause
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagewise::paging::{SortDirection, SortSpec};
    ///
    /// let spec = SortSpec::new("created_at", SortDirection::Asc);
    /// assert_eq!(spec.to_clause("modified_at"), "created_at asc");
    /// ```
    #[must_use]
    pub fn to_clause(&self, default_field: &str) -> String {
        build_sort_clause(
            Some(&self.field),
            Some(self.direction.as_str()),
            default_field,
        )
    }
}

/// Quote a field name when it collides with a reserved keyword
///
/// Any other name is returned unchanged.
#[must_use]
pub fn quote_field(field: &str) -> String {
    if RESERVED_SORT_FIELDS.contains(&field) {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}

/// Combine a sort field and direction into `"<field> <direction>"`
///
/// A blank field falls back to `default_field`; a direction other than
/// exactly `asc` becomes `desc`.
#[must_use]
pub fn build_sort_clause(field: Option<&str>, direction: Option<&str>, default_field: &str) -> String {
    let field = if is_blank(field) {
        default_field
    } else {
        field.unwrap_or(default_field)
    };
    let direction = SortDirection::parse_lenient(direction.unwrap_or_default());

    format!("{} {}", quote_field(field), direction)
}
