//! Cursor token extraction
//!
//! A cursor token is the value of the cursor field on the last row of a page,
//! rendered as a string. Rows expose their fields through [`CursorRow`], which
//! is implemented once per row type, usually with the [`cursor_row!`] macro.
//!
//! Extraction never fails. Every problem (no rows, short page, unknown field,
//! missing value, unsupported type) degrades to an empty token, which clients
//! read as "no further page".
//!
//! [`cursor_row!`]: crate::cursor_row
//!
//! # Example
//!
//! ```rust
//! use pagewise::cursor_row;
//! use pagewise::paging::next_cursor;
//!
//! struct Invoice {
//!     id: i64,
//!     number: String,
//! }
//!
//! cursor_row!(Invoice { id, number });
//!
//! let rows = vec![
//!     Invoice { id: 1, number: "A-1".into() },
//!     Invoice { id: 99, number: "A-99".into() },
//! ];
//! assert_eq!(next_cursor(&rows, 2, "id"), "99");
//! assert_eq!(next_cursor(&rows, 2, "number"), "A-99");
//! assert_eq!(next_cursor(&rows, 5, "id"), "");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use convert_case::{Case, Casing};
use serde_json::{Map, Value};

/// A field value read from a row, ready to become a cursor token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorValue {
    /// Signed integer
    Integer(i64),
    /// Unsigned integer too large for `i64`, or any `u64`/`usize`
    Unsigned(u64),
    /// String value, used verbatim
    Text(String),
    /// Optional value that is absent
    Null,
    /// Value of a type that cannot become a token
    Unsupported,
}

impl CursorValue {
    /// Render as a token
    ///
    /// Integers render in base 10, text verbatim. `Null` and `Unsupported`
    /// yield `None`.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        match self {
            Self::Integer(n) => Some(n.to_string()),
            Self::Unsigned(n) => Some(n.to_string()),
            Self::Text(s) => Some(s),
            Self::Null | Self::Unsupported => None,
        }
    }
}

/// Conversion of a typed field value into a [`CursorValue`]
///
/// `Option<T>` maps `None` to [`CursorValue::Null`].
pub trait ToCursorValue {
    /// Read this value as a cursor value
    fn to_cursor_value(&self) -> CursorValue;
}

// Integer types that widen losslessly into `i64`
macro_rules! small_int_cursor_value {
    ($($ty:ty),*) => {
        $(
            impl ToCursorValue for $ty {
                fn to_cursor_value(&self) -> CursorValue {
                    CursorValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

small_int_cursor_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToCursorValue for isize {
    fn to_cursor_value(&self) -> CursorValue {
        i64::try_from(*self).map_or(CursorValue::Unsupported, CursorValue::Integer)
    }
}

impl ToCursorValue for u64 {
    fn to_cursor_value(&self) -> CursorValue {
        CursorValue::Unsigned(*self)
    }
}

impl ToCursorValue for usize {
    fn to_cursor_value(&self) -> CursorValue {
        u64::try_from(*self).map_or(CursorValue::Unsupported, CursorValue::Unsigned)
    }
}

impl ToCursorValue for str {
    fn to_cursor_value(&self) -> CursorValue {
        CursorValue::Text(self.to_string())
    }
}

impl ToCursorValue for String {
    fn to_cursor_value(&self) -> CursorValue {
        CursorValue::Text(self.clone())
    }
}

impl ToCursorValue for Cow<'_, str> {
    fn to_cursor_value(&self) -> CursorValue {
        CursorValue::Text(self.to_string())
    }
}

macro_rules! unsupported_cursor_value {
    ($($ty:ty),*) => {
        $(
            impl ToCursorValue for $ty {
                fn to_cursor_value(&self) -> CursorValue {
                    CursorValue::Unsupported
                }
            }
        )*
    };
}

unsupported_cursor_value!(f32, f64, bool, char);

impl<T: ToCursorValue> ToCursorValue for Option<T> {
    fn to_cursor_value(&self) -> CursorValue {
        self.as_ref()
            .map_or(CursorValue::Null, ToCursorValue::to_cursor_value)
    }
}

impl<T: ToCursorValue + ?Sized> ToCursorValue for &T {
    fn to_cursor_value(&self) -> CursorValue {
        (**self).to_cursor_value()
    }
}

impl<T: ToCursorValue + ?Sized> ToCursorValue for Box<T> {
    fn to_cursor_value(&self) -> CursorValue {
        (**self).to_cursor_value()
    }
}

impl<T: ToCursorValue + ?Sized> ToCursorValue for Arc<T> {
    fn to_cursor_value(&self) -> CursorValue {
        (**self).to_cursor_value()
    }
}

impl ToCursorValue for Value {
    fn to_cursor_value(&self) -> CursorValue {
        match self {
            Value::Null => CursorValue::Null,
            Value::String(s) => CursorValue::Text(s.clone()),
            Value::Number(n) => n
                .as_i64()
                .map(CursorValue::Integer)
                .or_else(|| n.as_u64().map(CursorValue::Unsigned))
                .unwrap_or(CursorValue::Unsupported),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => CursorValue::Unsupported,
        }
    }
}

/// Field access for rows that can produce a cursor token
///
/// `field` is the logical snake_case field name. Returning `None` means the
/// row has no such field.
pub trait CursorRow {
    /// Read the named field
    fn cursor_value(&self, field: &str) -> Option<CursorValue>;
}

impl<R: CursorRow + ?Sized> CursorRow for &R {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        (**self).cursor_value(field)
    }
}

impl<R: CursorRow + ?Sized> CursorRow for Box<R> {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        (**self).cursor_value(field)
    }
}

impl<R: CursorRow + ?Sized> CursorRow for Arc<R> {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        (**self).cursor_value(field)
    }
}

impl<R: CursorRow> CursorRow for Option<R> {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        match self {
            Some(row) => row.cursor_value(field),
            None => Some(CursorValue::Null),
        }
    }
}

/// Dynamic rows are looked up by the field name as given, then in
/// PascalCase, then in camelCase
impl CursorRow for Map<String, Value> {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        if let Some(value) = self.get(field) {
            return Some(value.to_cursor_value());
        }
        [field.to_case(Case::Pascal), field.to_case(Case::Camel)]
            .iter()
            .find_map(|key| self.get(key))
            .map(ToCursorValue::to_cursor_value)
    }
}

impl CursorRow for Value {
    fn cursor_value(&self, field: &str) -> Option<CursorValue> {
        match self {
            Value::Object(map) => map.cursor_value(field),
            Value::Null => Some(CursorValue::Null),
            _ => None,
        }
    }
}

/// Implement [`CursorRow`](crate::paging::CursorRow) for a struct from a list
/// of its fields
///
/// Each listed field must implement
/// [`ToCursorValue`](crate::paging::ToCursorValue). The logical name of a
/// field is its Rust identifier; `field as "name"` exposes it under another
/// name.
///
/// # Example
///
/// ```rust
/// use pagewise::cursor_row;
/// use pagewise::paging::{CursorRow, CursorValue};
///
/// struct User {
///     id: u32,
///     email: String,
///     deleted_at: Option<i64>,
///     ts: i64,
/// }
///
/// cursor_row!(User { id, email, deleted_at, ts as "modified_at" });
///
/// let user = User { id: 7, email: "a@b.c".into(), deleted_at: None, ts: 5 };
/// assert_eq!(user.cursor_value("id"), Some(CursorValue::Integer(7)));
/// assert_eq!(user.cursor_value("deleted_at"), Some(CursorValue::Null));
/// assert_eq!(user.cursor_value("modified_at"), Some(CursorValue::Integer(5)));
/// assert_eq!(user.cursor_value("password"), None);
/// ```
#[macro_export]
macro_rules! cursor_row {
    (@name $field:ident) => {
        ::core::stringify!($field)
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    ($ty:ty { $($field:ident $(as $name:literal)?),+ $(,)? }) => {
        impl $crate::paging::CursorRow for $ty {
            fn cursor_value(
                &self,
                field: &str,
            ) -> ::core::option::Option<$crate::paging::CursorValue> {
                $(
                    if field == $crate::cursor_row!(@name $field $($name)?) {
                        return ::core::option::Option::Some(
                            $crate::paging::ToCursorValue::to_cursor_value(&self.$field),
                        );
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}

/// Read the cursor token from the last row of a page
///
/// The row at index `page_size - 1` is used, not the last fetched row, so an
/// over-fetched extra row never becomes the cursor. Returns an empty string
/// whenever no token can be produced.
pub fn next_cursor<R: CursorRow>(rows: &[R], page_size: u64, field: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let Some(index) = page_size
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
    else {
        tracing::debug!(page_size, "page size is zero, no cursor");
        return String::new();
    };

    let Some(row) = rows.get(index) else {
        tracing::debug!(index, rows = rows.len(), "short page, no cursor");
        return String::new();
    };

    match row.cursor_value(field) {
        Some(value) => value.into_token().unwrap_or_else(|| {
            tracing::debug!(field, "cursor field has no usable value");
            String::new()
        }),
        None => {
            tracing::debug!(field, "cursor field not found on row");
            String::new()
        }
    }
}
