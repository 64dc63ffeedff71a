//! List response envelope
//!
//! Every list endpoint answers with the same shape:
//!
//! ```json
//! {
//!   "meta": { "success": true, "message": "OK", "status_code": 200 },
//!   "data": [ ... ],
//!   "info": { "count": 2, "total_page": 1, ... }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use pagewise::paging::{assemble, ListResponse, SortDirection, SortSpec};
//!
//! let info = assemble(2, Some(2), Some(1), 20, SortSpec::new("id", SortDirection::Asc), String::new());
//! let response = ListResponse::new(vec!["a", "b"], info).with_message("users listed");
//!
//! assert!(response.meta.success);
//! assert_eq!(response.meta.status_code, 200);
//! assert_eq!(response.data.len(), 2);
//! ```

#[cfg(feature = "http")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::info::PageInfo;

/// Outcome block at the top of every response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Whether the call succeeded
    pub success: bool,
    /// Human readable outcome
    pub message: String,
    /// HTTP status code mirrored into the body
    ///
    /// With the `http` feature this also becomes the response status. Values
    /// outside `100..=999`, such as application codes like `20001`, are kept
    /// in the body but the response is sent with `200 OK`.
    pub status_code: u16,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            status_code: 200,
        }
    }
}

impl ResponseMeta {
    /// Set the message
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagewise::paging::ResponseMeta;
    ///
    /// let meta = ResponseMeta::default().with_message("done");
    /// assert_eq!(meta.message, "done");
    /// ```
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// A page of items with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Outcome block
    pub meta: ResponseMeta,
    /// Items in this page
    pub data: Vec<T>,
    /// Page metadata
    pub info: PageInfo,
}

impl<T> ListResponse<T> {
    /// Create a successful list response
    pub fn new(data: Vec<T>, info: PageInfo) -> Self {
        Self {
            meta: ResponseMeta::default(),
            data,
            info,
        }
    }

    /// Replace the outcome message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.meta = self.meta.with_message(message);
        self
    }

    /// Map each item in the list to a new type
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagewise::paging::{assemble, ListResponse, SortDirection, SortSpec};
    ///
    /// let info = assemble(3, None, None, 3, SortSpec::new("id", SortDirection::Desc), "3".into());
    /// let response = ListResponse::new(vec![1, 2, 3], info);
    /// let mapped = response.map(|n| n.to_string());
    /// assert_eq!(mapped.data, vec!["1", "2", "3"]);
    /// ```
    pub fn map<U, F>(self, f: F) -> ListResponse<U>
    where
        F: FnMut(T) -> U,
    {
        ListResponse {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

#[cfg(feature = "http")]
impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.meta.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
