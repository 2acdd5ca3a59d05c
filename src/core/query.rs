//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

use crate::domain::TransactionType;

/// Query parameters for listing customers
///
/// # Example
/// ```text
/// GET /customers?q=budi
/// GET /customers?q=3273&page=2&limit=10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CustomerQuery {
    /// Search term matched against full name (case-insensitive) and NIK
    pub q: Option<String>,

    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Query parameters for listing transactions
///
/// # Example
/// ```text
/// GET /transactions?type=Deposit
/// GET /transactions?customer_id=...&page=1&limit=50
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TransactionQuery {
    /// Only keep transactions of this type
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,

    /// Only keep transactions owned by this customer
    pub customer_id: Option<uuid::Uuid>,

    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

/// Page number and size, clamped to sane bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100), // Maximum 100 per page, minimum 1
        }
    }

    /// Slice an already filtered and sorted list into a paginated response
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let total = items.len();
        let start = self.page.saturating_sub(1).saturating_mul(self.limit);
        let data = items.into_iter().skip(start).take(self.limit).collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta::new(self.page, self.limit, total),
        }
    }
}

impl CustomerQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }

    /// Search term, `None` when absent or blank
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

impl TransactionQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = page.saturating_sub(1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
