//! Storage port for the blog. Services open a transaction with
//! [`BlogStore::begin`] and run primitive row operations on the returned
//! [`BlogTx`]; nothing is visible to other transactions until `commit`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    blog::{
        comment::{Comment, NewComment},
        post::{NewPost, Post, PostChangeset},
        tag::{Tag, TagWithCount},
    },
    pagination::PageRequest,
    user::{User, UserChangeset, UserInsertable},
};

pub mod diesel_store;
#[cfg(test)]
pub mod memory_store;

pub use diesel_store::PgBlogStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[error("storage connection failed: {message}")]
    Connection { message: String },
    #[error("storage query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn unique_violation(constraint: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row window derived from a validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: i64,
    pub limit: i64,
}

impl From<PageRequest> for PageWindow {
    fn from(request: PageRequest) -> Self {
        Self {
            offset: request.offset(),
            limit: request.limit(),
        }
    }
}

/// Filters for post listings. `tags` must already be normalized; a post
/// qualifies when it carries any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentQuery {
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn BlogTx>>;
}

/// One open transaction. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait BlogTx: Send {
    // users
    async fn insert_user(&mut self, user: &UserInsertable<'_>) -> StoreResult<User>;
    async fn find_user(&mut self, user_id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_name(&mut self, user_name: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&mut self, user_email: &str) -> StoreResult<Option<User>>;
    async fn update_user(
        &mut self,
        user_id: Uuid,
        changes: &UserChangeset,
    ) -> StoreResult<Option<User>>;
    async fn delete_user(&mut self, user_id: Uuid) -> StoreResult<bool>;
    async fn users_by_ids(&mut self, user_ids: &[Uuid]) -> StoreResult<Vec<User>>;
    async fn list_users(&mut self, query: &UserQuery, window: PageWindow)
    -> StoreResult<Vec<User>>;
    async fn count_users(&mut self, query: &UserQuery) -> StoreResult<i64>;

    // posts
    async fn insert_post(&mut self, post: &NewPost<'_>) -> StoreResult<Post>;
    async fn find_post(&mut self, post_id: Uuid) -> StoreResult<Option<Post>>;
    async fn update_post(
        &mut self,
        post_id: Uuid,
        changes: &PostChangeset,
    ) -> StoreResult<Option<Post>>;
    async fn delete_post(&mut self, post_id: Uuid) -> StoreResult<bool>;
    /// Detaches every post owned by `user_id`; returns how many were touched.
    async fn clear_post_owner(&mut self, user_id: Uuid) -> StoreResult<usize>;
    async fn list_posts(&mut self, query: &PostQuery, window: PageWindow)
    -> StoreResult<Vec<Post>>;
    async fn count_posts(&mut self, query: &PostQuery) -> StoreResult<i64>;

    // post <-> tag links
    async fn link_tag(&mut self, post_id: Uuid, tag_id: i32) -> StoreResult<()>;
    async fn clear_post_tags(&mut self, post_id: Uuid) -> StoreResult<usize>;
    async fn clear_tag_links(&mut self, tag_id: i32) -> StoreResult<usize>;
    /// `(post_id, tag)` pairs, ordered by tag name.
    async fn tags_for_posts(&mut self, post_ids: &[Uuid]) -> StoreResult<Vec<(Uuid, Tag)>>;

    // tags
    async fn find_tag(&mut self, tag_id: i32) -> StoreResult<Option<Tag>>;
    async fn find_tag_by_name(&mut self, tag_name: &str) -> StoreResult<Option<Tag>>;
    /// Fails with [`StoreError::UniqueViolation`] when the name is taken.
    async fn insert_tag(&mut self, tag_name: &str) -> StoreResult<Tag>;
    async fn rename_tag(&mut self, tag_id: i32, tag_name: &str) -> StoreResult<Option<Tag>>;
    async fn delete_tag(&mut self, tag_id: i32) -> StoreResult<bool>;
    async fn list_tags(&mut self, window: PageWindow) -> StoreResult<Vec<Tag>>;
    async fn list_tags_with_counts(
        &mut self,
        query: &TagQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<TagWithCount>>;
    async fn count_tags(&mut self, query: &TagQuery) -> StoreResult<i64>;

    // comments
    async fn insert_comment(&mut self, comment: &NewComment<'_>) -> StoreResult<Comment>;
    async fn find_comment(&mut self, comment_id: Uuid) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&mut self, comment_id: Uuid) -> StoreResult<bool>;
    async fn delete_post_comments(&mut self, post_id: Uuid) -> StoreResult<usize>;
    async fn delete_user_comments(&mut self, user_id: Uuid) -> StoreResult<usize>;
    async fn list_comments(
        &mut self,
        query: &CommentQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<Comment>>;
    async fn count_comments(&mut self, query: &CommentQuery) -> StoreResult<i64>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
