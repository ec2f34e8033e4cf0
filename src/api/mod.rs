//! API handlers for Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::page::PageRequest;

/// Spring-compatible page envelope: content, total count of the full
/// matching set, and the page metadata that produced this slice.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub content: Vec<T>,
    /// Total number of matching records, not just this page
    pub total_elements: i64,
    /// Page metadata
    pub pageable: PageMetadata,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Zero-based page number
    pub page_number: i64,
    /// Requested page size
    pub page_size: i64,
}

impl<T> PageResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(content: Vec<T>, total_elements: i64, page: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            pageable: PageMetadata {
                page_number: page.page,
                page_size: page.size,
            },
        }
    }
}
