use tracing::{debug, info};

use crate::{
    domain::{
        blog::tag::{TAG_NAME_MAX_CHARS, Tag, normalize_tag_name, tag_name_fits},
        pagination::PageRequest,
    },
    repository::{BlogStore, BlogTx, PageWindow, StoreError},
};

use super::{
    error::{ServiceError, ServiceResult},
    tx::finish,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(Tag),
    /// The normalized name already matched; nothing was written.
    Unchanged(Tag),
}

impl RenameOutcome {
    pub fn tag(&self) -> &Tag {
        match self {
            RenameOutcome::Renamed(tag) | RenameOutcome::Unchanged(tag) => tag,
        }
    }
}

fn require_name(raw: &str) -> ServiceResult<String> {
    let name =
        normalize_tag_name(raw).ok_or_else(|| ServiceError::validation("Tag name cannot be empty"))?;
    if !tag_name_fits(&name) {
        return Err(ServiceError::validation(format!(
            "Tag name must be at most {TAG_NAME_MAX_CHARS} characters"
        )));
    }
    Ok(name)
}

/// Looks up a tag by its normalized name, creating it if absent.
pub async fn resolve_in(tx: &mut dyn BlogTx, raw: &str) -> ServiceResult<Tag> {
    let name = require_name(raw)?;
    resolve_normalized(tx, &name).await
}

/// Same as [`resolve_in`] for a name that is already normalized.
pub(crate) async fn resolve_normalized(tx: &mut dyn BlogTx, name: &str) -> ServiceResult<Tag> {
    if let Some(tag) = tx.find_tag_by_name(name).await? {
        return Ok(tag);
    }

    match tx.insert_tag(name).await {
        Ok(tag) => {
            info!(tag_id = tag.tag_id, tag_name = %tag.tag_name, "Tag created");
            Ok(tag)
        }
        Err(e) if e.is_unique_violation() => {
            // Someone else created it between our lookup and our insert.
            debug!(tag_name = %name, "Tag insert lost a race; re-reading");
            tx.find_tag_by_name(name).await?.ok_or_else(|| {
                ServiceError::Storage(StoreError::query(format!(
                    "tag '{name}' reported as duplicate but could not be read back"
                )))
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Idempotent create: returns the existing row when the name is taken.
pub async fn create_tag(store: &dyn BlogStore, raw: &str) -> ServiceResult<Tag> {
    let name = require_name(raw)?;
    let mut tx = store.begin().await?;
    let result = resolve_normalized(tx.as_mut(), &name).await;
    finish(tx, result).await
}

pub async fn rename_tag(
    store: &dyn BlogStore,
    tag_id: i32,
    raw: &str,
) -> ServiceResult<RenameOutcome> {
    let mut tx = store.begin().await?;
    let result = rename_in(tx.as_mut(), tag_id, raw).await;
    finish(tx, result).await
}

async fn rename_in(tx: &mut dyn BlogTx, tag_id: i32, raw: &str) -> ServiceResult<RenameOutcome> {
    let current = tx
        .find_tag(tag_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("tag", tag_id))?;
    let name = require_name(raw)?;

    if name == current.tag_name {
        return Ok(RenameOutcome::Unchanged(current));
    }

    if let Some(existing) = tx.find_tag_by_name(&name).await? {
        return Err(ServiceError::conflict(
            "tag",
            format!("{} (tag {})", existing.tag_name, existing.tag_id),
        ));
    }

    match tx.rename_tag(tag_id, &name).await {
        Ok(Some(tag)) => {
            info!(tag_id, from = %current.tag_name, to = %tag.tag_name, "Tag renamed");
            Ok(RenameOutcome::Renamed(tag))
        }
        Ok(None) => Err(ServiceError::not_found("tag", tag_id)),
        Err(e) if e.is_unique_violation() => Err(ServiceError::conflict("tag", name)),
        Err(e) => Err(e.into()),
    }
}

/// Removes the tag's post links first, then the tag itself.
pub async fn delete_tag(store: &dyn BlogStore, tag_id: i32) -> ServiceResult<Tag> {
    let mut tx = store.begin().await?;
    let result = delete_in(tx.as_mut(), tag_id).await;
    finish(tx, result).await
}

async fn delete_in(tx: &mut dyn BlogTx, tag_id: i32) -> ServiceResult<Tag> {
    let tag = tx
        .find_tag(tag_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("tag", tag_id))?;
    let unlinked = tx.clear_tag_links(tag_id).await?;
    tx.delete_tag(tag_id).await?;
    info!(tag_id, tag_name = %tag.tag_name, unlinked, "Tag deleted");
    Ok(tag)
}

/// Plain alphabetical tag list.
pub async fn list_tags(store: &dyn BlogStore, page: PageRequest) -> ServiceResult<Vec<Tag>> {
    let mut tx = store.begin().await?;
    let result = tx
        .list_tags(PageWindow::from(page))
        .await
        .map_err(ServiceError::from);
    finish(tx, result).await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repository::memory_store::MemoryStore;

    #[tokio::test]
    async fn differently_cased_names_resolve_to_one_row() {
        let store = MemoryStore::new();

        let a = create_tag(&store, "Go").await.unwrap();
        let b = create_tag(&store, " go ").await.unwrap();
        let c = create_tag(&store, "GO").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.tag_name, "go");
        assert_eq!(store.snapshot().await.tags.len(), 1);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let store = MemoryStore::new();

        for raw in ["", "   ", "\t\n"] {
            let err = create_tag(&store, raw).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{raw:?} -> {err:?}");
        }
        assert!(store.snapshot().await.tags.is_empty());
    }

    #[tokio::test]
    async fn overlong_names_are_rejected_on_create_and_rename() {
        let store = MemoryStore::new();
        let tag = store.seed_tag("rust").await;
        let long = "x".repeat(TAG_NAME_MAX_CHARS + 1);

        assert!(create_tag(&store, &"y".repeat(TAG_NAME_MAX_CHARS)).await.is_ok());
        assert!(matches!(
            create_tag(&store, &long).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            rename_tag(&store, tag.tag_id, &long).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(store.snapshot().await.tags.len(), 2);
    }

    #[tokio::test]
    async fn losing_the_insert_race_returns_the_winner() {
        let store = MemoryStore::new();
        let winner = store.seed_tag("rust").await;
        store.simulate_stale_tag_lookup(1);

        let resolved = create_tag(&store, "Rust").await.unwrap();

        assert_eq!(resolved, winner);
        assert_eq!(store.snapshot().await.tags.len(), 1);
    }

    #[tokio::test]
    async fn rename_to_same_normalized_name_is_a_no_op() {
        let store = MemoryStore::new();
        let tag = store.seed_tag("rust").await;

        let outcome = rename_tag(&store, tag.tag_id, "  RUST ").await.unwrap();

        assert_eq!(outcome, RenameOutcome::Unchanged(tag));
    }

    #[tokio::test]
    async fn rename_onto_an_existing_name_conflicts() {
        let store = MemoryStore::new();
        let rust = store.seed_tag("rust").await;
        store.seed_tag("go").await;

        let err = rename_tag(&store, rust.tag_id, "Go").await.unwrap_err();

        match err {
            ServiceError::Conflict { field, value } => {
                assert_eq!(field, "tag");
                assert!(value.contains("go"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(store.snapshot().await.tag_named("rust").is_some());
    }

    #[tokio::test]
    async fn rename_normalizes_and_updates_in_place() {
        let store = MemoryStore::new();
        let tag = store.seed_tag("rust").await;

        let outcome = rename_tag(&store, tag.tag_id, " Rustlang ").await.unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::Renamed(Tag {
                tag_id: tag.tag_id,
                tag_name: "rustlang".into()
            })
        );
    }

    #[tokio::test]
    async fn rename_rejects_blank_and_missing() {
        let store = MemoryStore::new();
        let tag = store.seed_tag("rust").await;

        assert!(matches!(
            rename_tag(&store, tag.tag_id, "  ").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            rename_tag(&store, 999, "go").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_unlinks_posts_before_removing_the_tag() {
        let store = MemoryStore::new();
        let post = store.seed_post(None, "p", Utc::now(), &["rust", "go"]).await;
        let rust = store.snapshot().await.tag_named("rust").cloned().unwrap();

        let deleted = delete_tag(&store, rust.tag_id).await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(deleted.tag_name, "rust");
        assert!(state.tag_named("rust").is_none());
        assert_eq!(state.tags_of(post.post_id), vec!["go".to_string()]);
        assert_eq!(state.posts.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_links() {
        let store = MemoryStore::new();
        let post = store.seed_post(None, "p", Utc::now(), &["rust"]).await;
        let rust = store.snapshot().await.tag_named("rust").cloned().unwrap();
        store.fail_on("delete_tag");

        assert!(delete_tag(&store, rust.tag_id).await.is_err());

        let state = store.snapshot().await;
        assert_eq!(state.tags_of(post.post_id), vec!["rust".to_string()]);
    }
}
