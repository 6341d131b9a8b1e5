use serde_derive::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::pagination::{
    ADMIN_DEFAULT_PAGE_SIZE, ADMIN_MAX_PAGE_SIZE, API_DEFAULT_PAGE_SIZE, API_MAX_PAGE_SIZE,
    PageRequest, PageRequestError,
};

#[inline(always)]
fn default_page() -> i64 {
    1
}

#[inline(always)]
fn default_api_page_size() -> i64 {
    API_DEFAULT_PAGE_SIZE
}

#[inline(always)]
fn default_admin_page_size() -> i64 {
    ADMIN_DEFAULT_PAGE_SIZE
}

/// `GET /api/v1/posts`. `tags` may repeat; a post matches if it has any of them.
#[derive(Deserialize, ToSchema, IntoParams, Debug)]
pub struct PostsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_api_page_size")]
    pub page_size: i64,
    pub search: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: Option<Uuid>,
}

impl PostsQuery {
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page, self.page_size, API_MAX_PAGE_SIZE)
    }
}

/// Plain paging for public listings (tags, a post's comments).
#[derive(Deserialize, ToSchema, IntoParams, Debug)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_api_page_size")]
    pub page_size: i64,
}

impl PageQuery {
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page, self.page_size, API_MAX_PAGE_SIZE)
    }
}

/// Admin users and tags.
#[derive(Deserialize, ToSchema, IntoParams, Debug)]
pub struct AdminSearchQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_admin_page_size")]
    pub page_size: i64,
    pub search: Option<String>,
}

impl AdminSearchQuery {
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page, self.page_size, ADMIN_MAX_PAGE_SIZE)
    }
}

#[derive(Deserialize, ToSchema, IntoParams, Debug)]
pub struct AdminPostsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_admin_page_size")]
    pub page_size: i64,
    pub search: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: Option<Uuid>,
}

impl AdminPostsQuery {
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page, self.page_size, ADMIN_MAX_PAGE_SIZE)
    }
}

#[derive(Deserialize, ToSchema, IntoParams, Debug)]
pub struct AdminCommentsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_admin_page_size")]
    pub page_size: i64,
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
}

impl AdminCommentsQuery {
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page, self.page_size, ADMIN_MAX_PAGE_SIZE)
    }
}
