//! In-memory [`BlogStore`] used by the service tests.
//!
//! Each transaction holds the store lock and works on a private copy of the
//! rows; `commit` swaps the copy in, anything else throws it away.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::domain::{
    blog::{
        comment::{Comment, NewComment},
        post::{NewPost, Post, PostChangeset},
        tag::{Tag, TagWithCount},
    },
    user::{User, UserChangeset, UserInsertable},
};

use super::{
    BlogStore, BlogTx, CommentQuery, PageWindow, PostQuery, StoreError, StoreResult, TagQuery,
    UserQuery,
};

#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub tags: Vec<Tag>,
    pub post_tags: Vec<(Uuid, i32)>,
    next_tag_id: i32,
}

impl MemoryState {
    pub fn tag_named(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.tag_name == name)
    }

    pub fn tags_of(&self, post_id: Uuid) -> Vec<String> {
        let mut names: Vec<String> = self
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| self.tags.iter().find(|tag| tag.tag_id == *t))
            .map(|t| t.tag_name.clone())
            .collect();
        names.sort();
        names
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<tokio::sync::Mutex<MemoryState>>,
    faults: Arc<Mutex<HashSet<&'static str>>>,
    stale_tag_lookups: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later call of `operation` fails with a query error.
    pub fn fail_on(&self, operation: &'static str) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(operation);
        }
    }

    /// The next `count` name lookups miss, as if another writer inserted the
    /// tag between our read and our insert.
    pub fn simulate_stale_tag_lookup(&self, count: usize) {
        self.stale_tag_lookups.store(count, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn seed_user(&self, user_name: &str, is_admin: bool) -> User {
        let user = User {
            user_id: Uuid::now_v7(),
            user_name: user_name.to_owned(),
            user_email: format!("{user_name}@example.com"),
            user_password_hash: String::new(),
            user_full_name: None,
            user_bio: None,
            user_profile_picture_url: None,
            user_website_url: None,
            user_linkedin_url: None,
            user_github_url: None,
            user_is_active: true,
            user_is_admin: is_admin,
            user_created_at: Utc::now(),
        };
        self.state.lock().await.users.push(user.clone());
        user
    }

    pub async fn seed_post(
        &self,
        owner: Option<Uuid>,
        title: &str,
        created_at: DateTime<Utc>,
        tag_names: &[&str],
    ) -> Post {
        let post = Post {
            post_id: Uuid::now_v7(),
            user_id: owner,
            post_title: title.to_owned(),
            post_content: format!("content of {title}"),
            post_featured_image_url: None,
            post_created_at: created_at,
        };
        let mut state = self.state.lock().await;
        state.posts.push(post.clone());
        for name in tag_names {
            let existing = state.tag_named(name).map(|tag| tag.tag_id);
            let tag_id = match existing {
                Some(tag_id) => tag_id,
                None => {
                    state.next_tag_id += 1;
                    let tag = Tag {
                        tag_id: state.next_tag_id,
                        tag_name: (*name).to_owned(),
                    };
                    state.tags.push(tag);
                    state.next_tag_id
                }
            };
            state.post_tags.push((post.post_id, tag_id));
        }
        post
    }

    pub async fn seed_tag(&self, name: &str) -> Tag {
        let mut state = self.state.lock().await;
        state.next_tag_id += 1;
        let tag = Tag {
            tag_id: state.next_tag_id,
            tag_name: name.to_owned(),
        };
        state.tags.push(tag.clone());
        tag
    }

    pub async fn seed_comment(&self, post_id: Uuid, user_id: Uuid, text: &str) -> Comment {
        let comment = Comment {
            comment_id: Uuid::now_v7(),
            post_id,
            user_id,
            comment_content: text.to_owned(),
            comment_created_at: Utc::now(),
        };
        self.state.lock().await.comments.push(comment.clone());
        comment
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn BlogTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            working,
            faults: self.faults.clone(),
            stale_tag_lookups: self.stale_tag_lookups.clone(),
        }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    faults: Arc<Mutex<HashSet<&'static str>>>,
    stale_tag_lookups: Arc<AtomicUsize>,
}

impl MemoryTx {
    fn check(&self, operation: &'static str) -> StoreResult<()> {
        let failing = self
            .faults
            .lock()
            .map(|faults| faults.contains(operation))
            .unwrap_or(false);
        if failing {
            Err(StoreError::query(format!("injected failure in {operation}")))
        } else {
            Ok(())
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn window<T>(rows: Vec<T>, window: PageWindow) -> Vec<T> {
    rows.into_iter()
        .skip(window.offset.max(0) as usize)
        .take(window.limit.max(0) as usize)
        .collect()
}

impl MemoryState {
    fn matching_users(&self, query: &UserQuery) -> Vec<User> {
        let mut rows: Vec<User> = self
            .users
            .iter()
            .filter(|u| match &query.search {
                Some(term) => contains_ci(&u.user_name, term) || contains_ci(&u.user_email, term),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.user_created_at, a.user_id).cmp(&(b.user_created_at, b.user_id))
        });
        rows
    }

    fn matching_posts(&self, query: &PostQuery) -> Vec<Post> {
        let tagged: Option<HashSet<Uuid>> = if query.tags.is_empty() {
            None
        } else {
            let tag_ids: HashSet<i32> = self
                .tags
                .iter()
                .filter(|t| query.tags.contains(&t.tag_name))
                .map(|t| t.tag_id)
                .collect();
            Some(
                self.post_tags
                    .iter()
                    .filter(|(_, tag_id)| tag_ids.contains(tag_id))
                    .map(|(post_id, _)| *post_id)
                    .collect(),
            )
        };

        let mut rows: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| match &query.search {
                Some(term) => contains_ci(&p.post_title, term) || contains_ci(&p.post_content, term),
                None => true,
            })
            .filter(|p| query.owner_id.is_none() || p.user_id == query.owner_id)
            .filter(|p| tagged.as_ref().is_none_or(|ids| ids.contains(&p.post_id)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (b.post_created_at, b.post_id).cmp(&(a.post_created_at, a.post_id))
        });
        rows
    }

    fn matching_comments(&self, query: &CommentQuery) -> Vec<Comment> {
        let mut rows: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| {
                query
                    .search
                    .as_ref()
                    .is_none_or(|term| contains_ci(&c.comment_content, term))
            })
            .filter(|c| query.owner_id.is_none_or(|id| c.user_id == id))
            .filter(|c| query.post_id.is_none_or(|id| c.post_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (b.comment_created_at, b.comment_id).cmp(&(a.comment_created_at, a.comment_id))
        });
        rows
    }

    fn matching_tags(&self, query: &TagQuery) -> Vec<Tag> {
        let mut rows: Vec<Tag> = self
            .tags
            .iter()
            .filter(|t| {
                query
                    .search
                    .as_ref()
                    .is_none_or(|term| contains_ci(&t.tag_name, term))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.tag_name, a.tag_id).cmp(&(&b.tag_name, b.tag_id)));
        rows
    }
}

#[async_trait]
impl BlogTx for MemoryTx {
    async fn insert_user(&mut self, user: &UserInsertable<'_>) -> StoreResult<User> {
        self.check("insert_user")?;
        if self.working.users.iter().any(|u| u.user_name == user.user_name) {
            return Err(StoreError::unique_violation("users_user_name_key"));
        }
        if self.working.users.iter().any(|u| u.user_email == user.user_email) {
            return Err(StoreError::unique_violation("users_user_email_key"));
        }
        let row = User {
            user_id: user.user_id,
            user_name: user.user_name.to_owned(),
            user_email: user.user_email.to_owned(),
            user_password_hash: user.user_password_hash.to_owned(),
            user_full_name: user.user_full_name.map(str::to_owned),
            user_bio: user.user_bio.map(str::to_owned),
            user_profile_picture_url: None,
            user_website_url: None,
            user_linkedin_url: None,
            user_github_url: None,
            user_is_active: user.user_is_active,
            user_is_admin: user.user_is_admin,
            user_created_at: user.user_created_at,
        };
        self.working.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&mut self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.check("find_user")?;
        Ok(self.working.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_user_by_name(&mut self, user_name: &str) -> StoreResult<Option<User>> {
        self.check("find_user_by_name")?;
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn find_user_by_email(&mut self, user_email: &str) -> StoreResult<Option<User>> {
        self.check("find_user_by_email")?;
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.user_email == user_email)
            .cloned())
    }

    async fn update_user(
        &mut self,
        user_id: Uuid,
        changes: &UserChangeset,
    ) -> StoreResult<Option<User>> {
        self.check("update_user")?;
        Ok(self
            .working
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .map(|user| {
                changes.apply_to(user);
                user.clone()
            }))
    }

    async fn delete_user(&mut self, user_id: Uuid) -> StoreResult<bool> {
        self.check("delete_user")?;
        if self.working.posts.iter().any(|p| p.user_id == Some(user_id))
            || self.working.comments.iter().any(|c| c.user_id == user_id)
        {
            return Err(StoreError::query("foreign key violation on users"));
        }
        let before = self.working.users.len();
        self.working.users.retain(|u| u.user_id != user_id);
        Ok(self.working.users.len() < before)
    }

    async fn users_by_ids(&mut self, user_ids: &[Uuid]) -> StoreResult<Vec<User>> {
        self.check("users_by_ids")?;
        Ok(self
            .working
            .users
            .iter()
            .filter(|u| user_ids.contains(&u.user_id))
            .cloned()
            .collect())
    }

    async fn list_users(
        &mut self,
        query: &UserQuery,
        page: PageWindow,
    ) -> StoreResult<Vec<User>> {
        self.check("list_users")?;
        Ok(window(self.working.matching_users(query), page))
    }

    async fn count_users(&mut self, query: &UserQuery) -> StoreResult<i64> {
        self.check("count_users")?;
        Ok(self.working.matching_users(query).len() as i64)
    }

    async fn insert_post(&mut self, post: &NewPost<'_>) -> StoreResult<Post> {
        self.check("insert_post")?;
        let row = Post {
            post_id: post.post_id,
            user_id: post.user_id,
            post_title: post.post_title.to_owned(),
            post_content: post.post_content.to_owned(),
            post_featured_image_url: post.post_featured_image_url.map(str::to_owned),
            post_created_at: post.post_created_at,
        };
        self.working.posts.push(row.clone());
        Ok(row)
    }

    async fn find_post(&mut self, post_id: Uuid) -> StoreResult<Option<Post>> {
        self.check("find_post")?;
        Ok(self.working.posts.iter().find(|p| p.post_id == post_id).cloned())
    }

    async fn update_post(
        &mut self,
        post_id: Uuid,
        changes: &PostChangeset,
    ) -> StoreResult<Option<Post>> {
        self.check("update_post")?;
        Ok(self
            .working
            .posts
            .iter_mut()
            .find(|p| p.post_id == post_id)
            .map(|post| {
                changes.apply_to(post);
                post.clone()
            }))
    }

    async fn delete_post(&mut self, post_id: Uuid) -> StoreResult<bool> {
        self.check("delete_post")?;
        if self.working.comments.iter().any(|c| c.post_id == post_id)
            || self.working.post_tags.iter().any(|(p, _)| *p == post_id)
        {
            return Err(StoreError::query("foreign key violation on posts"));
        }
        let before = self.working.posts.len();
        self.working.posts.retain(|p| p.post_id != post_id);
        Ok(self.working.posts.len() < before)
    }

    async fn clear_post_owner(&mut self, user_id: Uuid) -> StoreResult<usize> {
        self.check("clear_post_owner")?;
        let mut touched = 0;
        for post in self.working.posts.iter_mut() {
            if post.user_id == Some(user_id) {
                post.user_id = None;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn list_posts(
        &mut self,
        query: &PostQuery,
        page: PageWindow,
    ) -> StoreResult<Vec<Post>> {
        self.check("list_posts")?;
        Ok(window(self.working.matching_posts(query), page))
    }

    async fn count_posts(&mut self, query: &PostQuery) -> StoreResult<i64> {
        self.check("count_posts")?;
        Ok(self.working.matching_posts(query).len() as i64)
    }

    async fn link_tag(&mut self, post_id: Uuid, tag_id: i32) -> StoreResult<()> {
        self.check("link_tag")?;
        if !self.working.post_tags.contains(&(post_id, tag_id)) {
            self.working.post_tags.push((post_id, tag_id));
        }
        Ok(())
    }

    async fn clear_post_tags(&mut self, post_id: Uuid) -> StoreResult<usize> {
        self.check("clear_post_tags")?;
        let before = self.working.post_tags.len();
        self.working.post_tags.retain(|(p, _)| *p != post_id);
        Ok(before - self.working.post_tags.len())
    }

    async fn clear_tag_links(&mut self, tag_id: i32) -> StoreResult<usize> {
        self.check("clear_tag_links")?;
        let before = self.working.post_tags.len();
        self.working.post_tags.retain(|(_, t)| *t != tag_id);
        Ok(before - self.working.post_tags.len())
    }

    async fn tags_for_posts(&mut self, post_ids: &[Uuid]) -> StoreResult<Vec<(Uuid, Tag)>> {
        self.check("tags_for_posts")?;
        let mut pairs: Vec<(Uuid, Tag)> = self
            .working
            .post_tags
            .iter()
            .filter(|(p, _)| post_ids.contains(p))
            .filter_map(|(p, t)| {
                self.working
                    .tags
                    .iter()
                    .find(|tag| tag.tag_id == *t)
                    .map(|tag| (*p, tag.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.1.tag_name.cmp(&b.1.tag_name));
        Ok(pairs)
    }

    async fn find_tag(&mut self, tag_id: i32) -> StoreResult<Option<Tag>> {
        self.check("find_tag")?;
        Ok(self.working.tags.iter().find(|t| t.tag_id == tag_id).cloned())
    }

    async fn find_tag_by_name(&mut self, tag_name: &str) -> StoreResult<Option<Tag>> {
        self.check("find_tag_by_name")?;
        let stale = self
            .stale_tag_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        Ok(self.working.tag_named(tag_name).cloned())
    }

    async fn insert_tag(&mut self, tag_name: &str) -> StoreResult<Tag> {
        self.check("insert_tag")?;
        if self.working.tag_named(tag_name).is_some() {
            return Err(StoreError::unique_violation("tags_tag_name_key"));
        }
        self.working.next_tag_id += 1;
        let tag = Tag {
            tag_id: self.working.next_tag_id,
            tag_name: tag_name.to_owned(),
        };
        self.working.tags.push(tag.clone());
        Ok(tag)
    }

    async fn rename_tag(&mut self, tag_id: i32, tag_name: &str) -> StoreResult<Option<Tag>> {
        self.check("rename_tag")?;
        if self
            .working
            .tags
            .iter()
            .any(|t| t.tag_name == tag_name && t.tag_id != tag_id)
        {
            return Err(StoreError::unique_violation("tags_tag_name_key"));
        }
        Ok(self
            .working
            .tags
            .iter_mut()
            .find(|t| t.tag_id == tag_id)
            .map(|tag| {
                tag.tag_name = tag_name.to_owned();
                tag.clone()
            }))
    }

    async fn delete_tag(&mut self, tag_id: i32) -> StoreResult<bool> {
        self.check("delete_tag")?;
        if self.working.post_tags.iter().any(|(_, t)| *t == tag_id) {
            return Err(StoreError::query("foreign key violation on tags"));
        }
        let before = self.working.tags.len();
        self.working.tags.retain(|t| t.tag_id != tag_id);
        Ok(self.working.tags.len() < before)
    }

    async fn list_tags(&mut self, page: PageWindow) -> StoreResult<Vec<Tag>> {
        self.check("list_tags")?;
        Ok(window(self.working.matching_tags(&TagQuery::default()), page))
    }

    async fn list_tags_with_counts(
        &mut self,
        query: &TagQuery,
        page: PageWindow,
    ) -> StoreResult<Vec<TagWithCount>> {
        self.check("list_tags_with_counts")?;
        let rows = self
            .working
            .matching_tags(query)
            .into_iter()
            .map(|tag| TagWithCount {
                post_count: self
                    .working
                    .post_tags
                    .iter()
                    .filter(|(_, t)| *t == tag.tag_id)
                    .count() as i64,
                tag_id: tag.tag_id,
                tag_name: tag.tag_name,
            })
            .collect();
        Ok(window(rows, page))
    }

    async fn count_tags(&mut self, query: &TagQuery) -> StoreResult<i64> {
        self.check("count_tags")?;
        Ok(self.working.matching_tags(query).len() as i64)
    }

    async fn insert_comment(&mut self, comment: &NewComment<'_>) -> StoreResult<Comment> {
        self.check("insert_comment")?;
        let row = Comment {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            comment_content: comment.comment_content.to_owned(),
            comment_created_at: comment.comment_created_at,
        };
        self.working.comments.push(row.clone());
        Ok(row)
    }

    async fn find_comment(&mut self, comment_id: Uuid) -> StoreResult<Option<Comment>> {
        self.check("find_comment")?;
        Ok(self
            .working
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
            .cloned())
    }

    async fn delete_comment(&mut self, comment_id: Uuid) -> StoreResult<bool> {
        self.check("delete_comment")?;
        let before = self.working.comments.len();
        self.working.comments.retain(|c| c.comment_id != comment_id);
        Ok(self.working.comments.len() < before)
    }

    async fn delete_post_comments(&mut self, post_id: Uuid) -> StoreResult<usize> {
        self.check("delete_post_comments")?;
        let before = self.working.comments.len();
        self.working.comments.retain(|c| c.post_id != post_id);
        Ok(before - self.working.comments.len())
    }

    async fn delete_user_comments(&mut self, user_id: Uuid) -> StoreResult<usize> {
        self.check("delete_user_comments")?;
        let before = self.working.comments.len();
        self.working.comments.retain(|c| c.user_id != user_id);
        Ok(before - self.working.comments.len())
    }

    async fn list_comments(
        &mut self,
        query: &CommentQuery,
        page: PageWindow,
    ) -> StoreResult<Vec<Comment>> {
        self.check("list_comments")?;
        Ok(window(self.working.matching_comments(query), page))
    }

    async fn count_comments(&mut self, query: &CommentQuery) -> StoreResult<i64> {
        self.check("count_comments")?;
        Ok(self.working.matching_comments(query).len() as i64)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.check("commit")?;
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
