use tracing::info;
use uuid::Uuid;

use crate::{
    domain::blog::{
        post::{
            AdminPostPatch, NewPost, Post, PostChangeset, PostDetails, PostInput, PostPatch,
            PostWithComments,
        },
        tag::{TAG_NAME_MAX_CHARS, normalize_tag_list, tag_name_fits},
    },
    repository::{BlogStore, BlogTx, CommentQuery, PageWindow, StoreError},
    util::string::validations::{URL_MAX_CHARS, may_reference_image, within_chars},
};

use super::{
    error::{ServiceError, ServiceResult},
    listing::{attach_comment_authors, attach_post_details},
    tag_service::resolve_normalized,
    tx::finish,
};

const TITLE_MAX_CHARS: usize = 255;

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation("Post title cannot be empty"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ServiceError::validation(format!(
            "Post title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> ServiceResult<()> {
    if content.trim().is_empty() {
        return Err(ServiceError::validation("Post content cannot be empty"));
    }
    Ok(())
}

fn validate_image_url(url: Option<&str>) -> ServiceResult<()> {
    if !within_chars(url, URL_MAX_CHARS) {
        return Err(ServiceError::validation(format!(
            "Featured image URL must be at most {URL_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

/// Upload paths only ever arrive through the featured-image endpoint.
fn ensure_image_reference(new: Option<&str>, current: Option<&str>) -> ServiceResult<()> {
    if may_reference_image(new, current) {
        Ok(())
    } else {
        Err(ServiceError::validation(
            "Featured images under uploads/ can only be set by uploading",
        ))
    }
}

fn validate_tags(raw_tags: &[String]) -> ServiceResult<()> {
    if normalize_tag_list(raw_tags).iter().all(|t| tag_name_fits(t)) {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "Tag names must be at most {TAG_NAME_MAX_CHARS} characters"
        )))
    }
}

fn validate_patch(patch: &PostPatch) -> ServiceResult<()> {
    if let Some(title) = &patch.post_title {
        validate_title(title)?;
    }
    if let Some(content) = &patch.post_content {
        validate_content(content)?;
    }
    if let Some(url) = &patch.post_featured_image_url {
        validate_image_url(url.as_deref())?;
    }
    Ok(())
}

/// Resolves each normalized tag and links it once.
async fn attach_tags(tx: &mut dyn BlogTx, post_id: Uuid, raw_tags: &[String]) -> ServiceResult<()> {
    for name in normalize_tag_list(raw_tags) {
        let tag = resolve_normalized(tx, &name).await?;
        tx.link_tag(post_id, tag.tag_id).await?;
    }
    Ok(())
}

async fn details_of(tx: &mut dyn BlogTx, post: Post) -> ServiceResult<PostDetails> {
    attach_post_details(tx, vec![post])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Storage(StoreError::query("post details came back empty")))
}

async fn load_post(tx: &mut dyn BlogTx, post_id: Uuid) -> ServiceResult<Post> {
    tx.find_post(post_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("post", post_id))
}

fn ensure_owner(post: &Post, caller_id: Uuid) -> ServiceResult<()> {
    if post.user_id == Some(caller_id) {
        Ok(())
    } else {
        Err(ServiceError::permission(
            "Only the author may modify this post",
        ))
    }
}

pub async fn create_post(
    store: &dyn BlogStore,
    owner_id: Uuid,
    input: PostInput,
) -> ServiceResult<PostDetails> {
    validate_title(&input.post_title)?;
    validate_content(&input.post_content)?;
    validate_image_url(input.post_featured_image_url.as_deref())?;
    ensure_image_reference(input.post_featured_image_url.as_deref(), None)?;
    validate_tags(&input.post_tags)?;

    let mut tx = store.begin().await?;
    let result = async {
        let post = tx
            .insert_post(&NewPost::new(
                owner_id,
                input.post_title.trim(),
                &input.post_content,
                input.post_featured_image_url.as_deref(),
            ))
            .await?;
        attach_tags(tx.as_mut(), post.post_id, &input.post_tags).await?;
        details_of(tx.as_mut(), post).await
    }
    .await;
    let details = finish(tx, result).await?;

    info!(post_id = %details.post.post_id, owner_id = %owner_id, "Post created");
    Ok(details)
}

pub async fn get_post(store: &dyn BlogStore, post_id: Uuid) -> ServiceResult<PostWithComments> {
    let mut tx = store.begin().await?;
    let result = async {
        let post = load_post(tx.as_mut(), post_id).await?;
        let details = details_of(tx.as_mut(), post).await?;
        let query = CommentQuery {
            post_id: Some(post_id),
            ..Default::default()
        };
        let comments = tx
            .list_comments(
                &query,
                PageWindow {
                    offset: 0,
                    limit: i64::MAX,
                },
            )
            .await?;
        let comments = attach_comment_authors(tx.as_mut(), comments).await?;
        Ok::<_, ServiceError>(PostWithComments { details, comments })
    }
    .await;
    finish(tx, result).await
}

/// Client-supplied edits. The featured-image endpoint bypasses the upload
/// path check through [`apply_patch`].
async fn apply_client_patch(
    tx: &mut dyn BlogTx,
    current: &Post,
    patch: PostPatch,
) -> ServiceResult<Post> {
    if let Some(url) = &patch.post_featured_image_url {
        ensure_image_reference(url.as_deref(), current.post_featured_image_url.as_deref())?;
    }
    apply_patch(tx, current.post_id, patch).await
}

async fn apply_patch(
    tx: &mut dyn BlogTx,
    post_id: Uuid,
    patch: PostPatch,
) -> ServiceResult<Post> {
    let mut changes = PostChangeset::from(patch);
    changes.post_title = changes.post_title.map(|t| t.trim().to_owned());
    tx.update_post(post_id, &changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("post", post_id))
}

/// Owner-only edit. Administrators use [`admin_update_post`].
pub async fn update_post_as_owner(
    store: &dyn BlogStore,
    caller_id: Uuid,
    post_id: Uuid,
    patch: PostPatch,
) -> ServiceResult<PostDetails> {
    validate_patch(&patch)?;

    let mut tx = store.begin().await?;
    let result = async {
        let post = load_post(tx.as_mut(), post_id).await?;
        ensure_owner(&post, caller_id)?;
        let post = apply_client_patch(tx.as_mut(), &post, patch).await?;
        details_of(tx.as_mut(), post).await
    }
    .await;
    let details = finish(tx, result).await?;

    info!(post_id = %post_id, "Post updated");
    Ok(details)
}

/// Admin edit. A supplied tag list replaces the current tags; `None` keeps them.
pub async fn admin_update_post(
    store: &dyn BlogStore,
    post_id: Uuid,
    patch: AdminPostPatch,
) -> ServiceResult<PostDetails> {
    validate_patch(&patch.patch)?;
    if let Some(tags) = &patch.post_tags {
        validate_tags(tags)?;
    }

    let mut tx = store.begin().await?;
    let result = async {
        let current = load_post(tx.as_mut(), post_id).await?;
        let post = apply_client_patch(tx.as_mut(), &current, patch.patch).await?;
        if let Some(tags) = &patch.post_tags {
            tx.clear_post_tags(post_id).await?;
            attach_tags(tx.as_mut(), post_id, tags).await?;
        }
        details_of(tx.as_mut(), post).await
    }
    .await;
    let details = finish(tx, result).await?;

    info!(post_id = %post_id, "Post updated by admin");
    Ok(details)
}

/// Swaps the featured image path and returns the previous one.
pub async fn replace_featured_image(
    store: &dyn BlogStore,
    post_id: Uuid,
    image_url: Option<String>,
) -> ServiceResult<(PostDetails, Option<String>)> {
    let mut tx = store.begin().await?;
    let result = async {
        let previous = load_post(tx.as_mut(), post_id)
            .await?
            .post_featured_image_url;
        let patch = PostPatch {
            post_featured_image_url: Some(image_url),
            ..Default::default()
        };
        let post = apply_patch(tx.as_mut(), post_id, patch).await?;
        let details = details_of(tx.as_mut(), post).await?;
        Ok::<_, ServiceError>((details, previous))
    }
    .await;
    finish(tx, result).await
}

/// Comments, then tag links, then the post row.
async fn delete_cascade(tx: &mut dyn BlogTx, post_id: Uuid) -> ServiceResult<()> {
    let comments_deleted = tx.delete_post_comments(post_id).await?;
    let links_deleted = tx.clear_post_tags(post_id).await?;
    if !tx.delete_post(post_id).await? {
        return Err(ServiceError::not_found("post", post_id));
    }
    info!(deleted_post_id = %post_id, comments_deleted, links_deleted, "Post deleted");
    Ok(())
}

pub async fn delete_post_as_owner(
    store: &dyn BlogStore,
    caller_id: Uuid,
    post_id: Uuid,
) -> ServiceResult<Post> {
    let mut tx = store.begin().await?;
    let result = async {
        let post = load_post(tx.as_mut(), post_id).await?;
        ensure_owner(&post, caller_id)?;
        delete_cascade(tx.as_mut(), post_id).await?;
        Ok::<_, ServiceError>(post)
    }
    .await;
    finish(tx, result).await
}

/// Returns the removed row so the caller can clean up its featured image.
pub async fn admin_delete_post(store: &dyn BlogStore, post_id: Uuid) -> ServiceResult<Post> {
    let mut tx = store.begin().await?;
    let result = async {
        let post = load_post(tx.as_mut(), post_id).await?;
        delete_cascade(tx.as_mut(), post_id).await?;
        Ok::<_, ServiceError>(post)
    }
    .await;
    finish(tx, result).await
}
