//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::query::Page;

/// Reserved query parameters of list and search endpoints.
///
/// Any other key is an equality filter on one of the resource's filterable
/// fields; the literal `null` matches missing values.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (1-indexed). Values below 1 become 1.
    pub page: Option<i64>,
    /// Items per page. Missing or non-positive values use the default, larger
    /// ones are clamped to the maximum. Alias: `size` (send one, not both).
    pub page_size: Option<i64>,
    /// Case-insensitive search text. Alias: `q` (send one, not both).
    pub query: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponse<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Matching items across all pages.
    pub total: u64,
    /// Current page number.
    pub page: i64,
    /// Page size actually applied.
    pub size: i64,
    /// Pages needed to cover `total` at this size.
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            data: page.items,
            total: page.total,
            page: page.page,
            size: page.page_size,
            total_pages,
        }
    }
}
