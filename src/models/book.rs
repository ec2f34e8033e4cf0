//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Create/replace book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
}

/// Example-style book filter: each populated field becomes an equality
/// condition, combined with AND.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Query parameters for GET /books
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "super::page::empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "super::page::empty_as_none")]
    pub size: Option<i64>,
}

impl BookQuery {
    /// Splits into filter and page request, dropping empty-string criteria
    /// (a blank query parameter is no filter).
    pub fn into_parts(self) -> (BookFilter, super::page::PageRequest) {
        let filter = BookFilter {
            title: self.title.filter(|s| !s.is_empty()),
            author: self.author.filter(|s| !s.is_empty()),
            isbn: self.isbn.filter(|s| !s.is_empty()),
        };
        (filter, super::page::PageRequest::from_params(self.page, self.size))
    }
}
