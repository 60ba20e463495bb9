use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present on list endpoints only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            pagination: None,
        }
    }

    /// Remote-supplied failure text, `error` first then `message`.
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|m| !m.is_empty())
    }

    /// `Ok(data)` for a successful envelope, `Remote` error otherwise.
    pub fn into_result(self, fallback: &str) -> ClientResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            let message = self.failure_message().unwrap_or(fallback).to_string();
            Err(ClientError::Remote(message))
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn into_page(self, fallback: &str) -> ClientResult<Page<T>> {
        let pagination = self.pagination.clone();
        let items = self.into_result(fallback)?.unwrap_or_default();
        let pagination = pagination.unwrap_or_else(|| Pagination::new(1, items.len() as u32, items.len() as u64));
        Ok(Page { items, pagination })
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPagination {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    limit: u32,
    #[serde(default)]
    total: u64,
}

/// Pagination block; `total_pages` is always derived from `total` and `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };

        Self {
            page: page.max(1),
            limit,
            total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20, 0)
    }
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Pagination::new(raw.page, raw.limit, raw.total)
    }
}
