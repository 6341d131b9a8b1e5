use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        blog::comment::{COMMENT_MAX_CHARS, Comment, CommentDetails, NewComment},
        pagination::{Page, PageMeta, PageRequest},
    },
    repository::{BlogStore, BlogTx, CommentQuery, StoreError},
};

use super::{
    error::{ServiceError, ServiceResult},
    listing::{attach_comment_authors, comments_page},
    tx::finish,
};

fn validate_content(content: &str) -> ServiceResult<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("Comment cannot be empty"));
    }
    if trimmed.chars().count() > COMMENT_MAX_CHARS {
        return Err(ServiceError::validation(format!(
            "Comment must be at most {COMMENT_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

pub async fn create_comment(
    store: &dyn BlogStore,
    author_id: Uuid,
    post_id: Uuid,
    content: &str,
) -> ServiceResult<CommentDetails> {
    let content = validate_content(content)?;

    let mut tx = store.begin().await?;
    let result = async {
        if tx.find_post(post_id).await?.is_none() {
            return Err(ServiceError::not_found("post", post_id));
        }
        let comment = tx
            .insert_comment(&NewComment::new(post_id, author_id, content))
            .await?;
        attach_comment_authors(tx.as_mut(), vec![comment])
            .await?
            .pop()
            .ok_or_else(|| {
                ServiceError::Storage(StoreError::query("comment details came back empty"))
            })
    }
    .await;
    let details = finish(tx, result).await?;

    info!(comment_id = %details.comment.comment_id, post_id = %post_id, "Comment created");
    Ok(details)
}

/// Comments under one post, newest first.
pub async fn list_post_comments(
    store: &dyn BlogStore,
    post_id: Uuid,
    page: PageRequest,
) -> ServiceResult<Page<CommentDetails>> {
    let query = CommentQuery {
        post_id: Some(post_id),
        ..Default::default()
    };

    let mut tx = store.begin().await?;
    let result = async {
        if tx.find_post(post_id).await?.is_none() {
            return Err(ServiceError::not_found("post", post_id));
        }
        comments_page(tx.as_mut(), &query, page).await
    }
    .await;
    let (items, total) = finish(tx, result).await?;

    Ok(Page::new(items, PageMeta::compute(page, total)))
}

async fn load_comment(tx: &mut dyn BlogTx, comment_id: Uuid) -> ServiceResult<Comment> {
    tx.find_comment(comment_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("comment", comment_id))
}

async fn remove(tx: &mut dyn BlogTx, comment: &Comment) -> ServiceResult<()> {
    if !tx.delete_comment(comment.comment_id).await? {
        return Err(ServiceError::not_found("comment", comment.comment_id));
    }
    info!(comment_id = %comment.comment_id, post_id = %comment.post_id, "Comment deleted");
    Ok(())
}

pub async fn delete_comment_as_owner(
    store: &dyn BlogStore,
    caller_id: Uuid,
    comment_id: Uuid,
) -> ServiceResult<Comment> {
    let mut tx = store.begin().await?;
    let result = async {
        let comment = load_comment(tx.as_mut(), comment_id).await?;
        if comment.user_id != caller_id {
            return Err(ServiceError::permission(
                "Only the author may delete this comment",
            ));
        }
        remove(tx.as_mut(), &comment).await?;
        Ok(comment)
    }
    .await;
    finish(tx, result).await
}

pub async fn admin_delete_comment(store: &dyn BlogStore, comment_id: Uuid) -> ServiceResult<Comment> {
    let mut tx = store.begin().await?;
    let result = async {
        let comment = load_comment(tx.as_mut(), comment_id).await?;
        remove(tx.as_mut(), &comment).await?;
        Ok::<_, ServiceError>(comment)
    }
    .await;
    finish(tx, result).await
}
