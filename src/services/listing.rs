//! Filtered, counted and paginated listings for posts, comments, tags and users.
//!
//! Every listing runs its count and its page fetch inside one transaction
//! with the same filter, then derives the page metadata with
//! [`PageMeta::compute`].

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    domain::{
        blog::{
            comment::{Comment, CommentDetails},
            post::{Post, PostDetails},
            tag::{Tag, TagWithCount, normalize_tag_list},
        },
        pagination::{Page, PageMeta, PageRequest, normalize_search},
        user::{UserProfile, UserSummary},
    },
    repository::{BlogStore, BlogTx, CommentQuery, PageWindow, PostQuery, TagQuery, UserQuery},
};

use super::{
    error::{ServiceError, ServiceResult},
    tx::finish,
};

#[derive(Debug, Clone)]
pub struct PostListing {
    pub page: PageRequest,
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub owner_id: Option<Uuid>,
}

impl PostListing {
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            search: None,
            tags: Vec::new(),
            owner_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentListing {
    pub page: PageRequest,
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
}

impl CommentListing {
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            search: None,
            owner_id: None,
            post_id: None,
        }
    }
}

pub async fn list_posts(
    store: &dyn BlogStore,
    listing: PostListing,
) -> ServiceResult<Page<PostDetails>> {
    let query = PostQuery {
        search: normalize_search(listing.search.as_deref()),
        tags: normalize_tag_list(&listing.tags),
        owner_id: listing.owner_id,
    };

    let mut tx = store.begin().await?;
    let result = posts_page(tx.as_mut(), &query, listing.page).await;
    let (items, total) = finish(tx, result).await?;

    Ok(Page::new(items, PageMeta::compute(listing.page, total))
        .with_search(query.search)
        .with_tags(query.tags))
}

async fn posts_page(
    tx: &mut dyn BlogTx,
    query: &PostQuery,
    page: PageRequest,
) -> ServiceResult<(Vec<PostDetails>, i64)> {
    let total = tx.count_posts(query).await?;
    let posts = tx.list_posts(query, PageWindow::from(page)).await?;
    let details = attach_post_details(tx, posts).await?;
    Ok((details, total))
}

/// Joins author badges and tag lists onto a batch of posts.
pub(crate) async fn attach_post_details(
    tx: &mut dyn BlogTx,
    posts: Vec<Post>,
) -> ServiceResult<Vec<PostDetails>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let mut owner_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.user_id).collect();
    owner_ids.sort();
    owner_ids.dedup();
    let authors = author_map(tx, &owner_ids).await?;

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.post_id).collect();
    let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in tx.tags_for_posts(&post_ids).await? {
        tags_by_post.entry(post_id).or_default().push(tag);
    }

    Ok(posts
        .into_iter()
        .map(|post| PostDetails {
            author: post.user_id.and_then(|id| authors.get(&id).cloned()),
            tags: tags_by_post.remove(&post.post_id).unwrap_or_default(),
            post,
        })
        .collect())
}

async fn author_map(
    tx: &mut dyn BlogTx,
    user_ids: &[Uuid],
) -> ServiceResult<HashMap<Uuid, UserSummary>> {
    Ok(tx
        .users_by_ids(user_ids)
        .await?
        .into_iter()
        .map(|u| (u.user_id, u.summary()))
        .collect())
}

pub(crate) async fn attach_comment_authors(
    tx: &mut dyn BlogTx,
    comments: Vec<Comment>,
) -> ServiceResult<Vec<CommentDetails>> {
    let mut user_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
    user_ids.sort();
    user_ids.dedup();
    let authors = author_map(tx, &user_ids).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentDetails {
            author: authors.get(&comment.user_id).cloned(),
            comment,
        })
        .collect())
}

pub async fn list_comments(
    store: &dyn BlogStore,
    listing: CommentListing,
) -> ServiceResult<Page<CommentDetails>> {
    let query = CommentQuery {
        search: normalize_search(listing.search.as_deref()),
        owner_id: listing.owner_id,
        post_id: listing.post_id,
    };

    let mut tx = store.begin().await?;
    let result = comments_page(tx.as_mut(), &query, listing.page).await;
    let (items, total) = finish(tx, result).await?;

    Ok(Page::new(items, PageMeta::compute(listing.page, total)).with_search(query.search))
}

pub(crate) async fn comments_page(
    tx: &mut dyn BlogTx,
    query: &CommentQuery,
    page: PageRequest,
) -> ServiceResult<(Vec<CommentDetails>, i64)> {
    let total = tx.count_comments(query).await?;
    let comments = tx.list_comments(query, PageWindow::from(page)).await?;
    let details = attach_comment_authors(tx, comments).await?;
    Ok((details, total))
}

/// Tags ordered by name with the number of posts carrying each, zero included.
pub async fn list_tags_with_counts(
    store: &dyn BlogStore,
    page: PageRequest,
    search: Option<String>,
) -> ServiceResult<Page<TagWithCount>> {
    let query = TagQuery {
        search: normalize_search(search.as_deref()),
    };

    let mut tx = store.begin().await?;
    let result = async {
        let total = tx.count_tags(&query).await?;
        let rows = tx
            .list_tags_with_counts(&query, PageWindow::from(page))
            .await?;
        Ok::<_, ServiceError>((rows, total))
    }
    .await;
    let (items, total) = finish(tx, result).await?;

    Ok(Page::new(items, PageMeta::compute(page, total)).with_search(query.search))
}

pub async fn list_users(
    store: &dyn BlogStore,
    page: PageRequest,
    search: Option<String>,
) -> ServiceResult<Page<UserProfile>> {
    let query = UserQuery {
        search: normalize_search(search.as_deref()),
    };

    let mut tx = store.begin().await?;
    let result = async {
        let total = tx.count_users(&query).await?;
        let rows = tx.list_users(&query, PageWindow::from(page)).await?;
        Ok::<_, ServiceError>((rows, total))
    }
    .await;
    let (users, total) = finish(tx, result).await?;

    Ok(
        Page::new(users, PageMeta::compute(page, total))
            .with_search(query.search)
            .map(|u| u.profile()),
    )
}
