use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public API listings accept up to this many rows per page.
pub const API_MAX_PAGE_SIZE: i64 = 100;
pub const API_DEFAULT_PAGE_SIZE: i64 = 20;
/// Admin panel listings are capped lower.
pub const ADMIN_MAX_PAGE_SIZE: i64 = 50;
pub const ADMIN_DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page must be 1 or greater, got {0}")]
    Page(i64),
    #[error("page_size must be between 1 and {max}, got {got}")]
    PageSize { got: i64, max: i64 },
}

/// A validated (page, page_size) pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64, max_page_size: i64) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::Page(page));
        }
        if !(1..=max_page_size).contains(&page_size) {
            return Err(PageRequestError::PageSize {
                got: page_size,
                max: max_page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Saturates for absurd page numbers; such a page is simply past the end.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Pagination metadata, a pure function of (page, page_size, total_items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMeta {
    pub fn compute(request: PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + request.page_size - 1) / request.page_size
        };

        Self {
            page: request.page,
            page_size: request.page_size,
            total_items: total_items.max(0),
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub search_query: Option<String>,
    pub active_tags: Vec<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self {
            items,
            total_items: meta.total_items,
            page: meta.page,
            page_size: meta.page_size,
            total_pages: meta.total_pages,
            has_next: meta.has_next,
            has_previous: meta.has_previous,
            search_query: None,
            active_tags: Vec::new(),
        }
    }

    pub fn with_search(mut self, search_query: Option<String>) -> Self {
        self.search_query = search_query;
        self
    }

    pub fn with_tags(mut self, active_tags: Vec<String>) -> Self {
        self.active_tags = active_tags;
        self
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            search_query: self.search_query,
            active_tags: self.active_tags,
        }
    }
}

/// Blank search terms count as "no search".
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
