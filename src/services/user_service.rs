use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::user::{
        AdminUserPatch, NewUserInput, ProfilePatch, User, UserChangeset, UserInsertable,
        UserProfile,
    },
    repository::{BlogStore, BlogTx, StoreError},
    util::{
        crypto::{hash_pw::hash_pw, verify_pw::verify_pw},
        string::validations::{
            BIO_MAX_CHARS, EMAIL_MAX_CHARS, FULL_NAME_MAX_CHARS, PASSWORD_MIN_CHARS,
            URL_MAX_CHARS, USER_NAME_MAX_CHARS, may_reference_image, validate_email,
            validate_password_form, validate_username, within_chars,
        },
    },
};

use super::{
    error::{ServiceError, ServiceResult},
    tx::finish,
};

const BAD_LOGIN: &str = "Incorrect username or password";

fn validate_new_user(input: &NewUserInput) -> ServiceResult<()> {
    if !validate_username(&input.user_name) {
        return Err(ServiceError::validation(format!(
            "Username must be 1 to {USER_NAME_MAX_CHARS} characters without surrounding spaces"
        )));
    }
    if !validate_email(&input.user_email) {
        return Err(ServiceError::validation(format!(
            "Email must be a valid address of at most {EMAIL_MAX_CHARS} characters"
        )));
    }
    if !validate_password_form(&input.password) {
        return Err(ServiceError::validation(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    validate_profile_text(input.user_full_name.as_deref(), input.user_bio.as_deref())
}

fn validate_profile_text(full_name: Option<&str>, bio: Option<&str>) -> ServiceResult<()> {
    if !within_chars(full_name, FULL_NAME_MAX_CHARS) {
        return Err(ServiceError::validation(format!(
            "Full name must be at most {FULL_NAME_MAX_CHARS} characters"
        )));
    }
    if !within_chars(bio, BIO_MAX_CHARS) {
        return Err(ServiceError::validation(format!(
            "Bio must be at most {BIO_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn patched(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

fn validate_patch(patch: &ProfilePatch) -> ServiceResult<()> {
    validate_profile_text(patched(&patch.user_full_name), patched(&patch.user_bio))?;

    let links = [
        ("Profile picture", &patch.user_profile_picture_url),
        ("Website", &patch.user_website_url),
        ("LinkedIn", &patch.user_linkedin_url),
        ("GitHub", &patch.user_github_url),
    ];
    for (label, value) in links {
        if !within_chars(patched(value), URL_MAX_CHARS) {
            return Err(ServiceError::validation(format!(
                "{label} URL must be at most {URL_MAX_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// Maps a uniqueness failure on `users` to the field it guards.
fn map_user_conflict(e: StoreError, input: &NewUserInput) -> ServiceError {
    match &e {
        StoreError::UniqueViolation { constraint } if constraint.contains("user_name") => {
            ServiceError::conflict("username", input.user_name.clone())
        }
        StoreError::UniqueViolation { constraint } if constraint.contains("user_email") => {
            ServiceError::conflict("email", input.user_email.clone())
        }
        _ => e.into(),
    }
}

async fn create_user(
    store: &dyn BlogStore,
    input: NewUserInput,
    is_admin: bool,
) -> ServiceResult<User> {
    validate_new_user(&input)?;

    let mut tx = store.begin().await?;
    let result = async {
        if tx.find_user_by_name(&input.user_name).await?.is_some() {
            return Err(ServiceError::conflict("username", input.user_name.clone()));
        }
        if tx.find_user_by_email(&input.user_email).await?.is_some() {
            return Err(ServiceError::conflict("email", input.user_email.clone()));
        }

        let hash = hash_pw(input.password.clone())
            .await
            .map_err(|e| ServiceError::Credential(e.to_string()))?;

        tx.insert_user(&UserInsertable::new(
            &input.user_name,
            &input.user_email,
            &hash,
            input.user_full_name.as_deref(),
            input.user_bio.as_deref(),
            is_admin,
        ))
        .await
        .map_err(|e| map_user_conflict(e, &input))
    }
    .await;
    let user = finish(tx, result).await?;

    info!(user_id = %user.user_id, user_name = %user.user_name, is_admin, "User created");
    Ok(user)
}

/// Self-service sign-up: an active, non-admin account.
pub async fn register(store: &dyn BlogStore, input: NewUserInput) -> ServiceResult<User> {
    create_user(store, input, false).await
}

/// Operator provisioning of an active admin account.
pub async fn provision_admin(store: &dyn BlogStore, input: NewUserInput) -> ServiceResult<User> {
    create_user(store, input, true).await
}

pub async fn authenticate(
    store: &dyn BlogStore,
    user_name: &str,
    password: &str,
) -> ServiceResult<User> {
    let Some(user) = find_by_username(store, user_name).await? else {
        return Err(ServiceError::unauthenticated(BAD_LOGIN));
    };

    match verify_pw(password, &user.user_password_hash).await {
        Ok(true) => Ok(user),
        Ok(false) => Err(ServiceError::unauthenticated(BAD_LOGIN)),
        Err(e) => {
            warn!(user_id = %user.user_id, error = %e, "Password verification failed");
            Err(ServiceError::Credential(e.to_string()))
        }
    }
}

pub async fn find_by_username(
    store: &dyn BlogStore,
    user_name: &str,
) -> ServiceResult<Option<User>> {
    let mut tx = store.begin().await?;
    let result = tx
        .find_user_by_name(user_name)
        .await
        .map_err(ServiceError::from);
    finish(tx, result).await
}

async fn load_user(tx: &mut dyn BlogTx, user_id: Uuid) -> ServiceResult<User> {
    tx.find_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", user_id))
}

pub async fn get_user(store: &dyn BlogStore, user_id: Uuid) -> ServiceResult<User> {
    let mut tx = store.begin().await?;
    let result = load_user(tx.as_mut(), user_id).await;
    finish(tx, result).await
}

async fn apply_changes(
    store: &dyn BlogStore,
    user_id: Uuid,
    changes: UserChangeset,
) -> ServiceResult<User> {
    let mut tx = store.begin().await?;
    let result = async {
        let current = load_user(tx.as_mut(), user_id).await?;
        if let Some(picture) = &changes.user_profile_picture_url
            && !may_reference_image(
                picture.as_deref(),
                current.user_profile_picture_url.as_deref(),
            )
        {
            return Err(ServiceError::validation(
                "Profile pictures under uploads/ can only be set by uploading",
            ));
        }
        tx.update_user(user_id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }
    .await;
    finish(tx, result).await
}

pub async fn update_profile(
    store: &dyn BlogStore,
    user_id: Uuid,
    patch: ProfilePatch,
) -> ServiceResult<UserProfile> {
    validate_patch(&patch)?;
    let user = apply_changes(store, user_id, UserChangeset::from(patch)).await?;
    info!(user_id = %user_id, "Profile updated");
    Ok(user.profile())
}

pub async fn admin_update_user(
    store: &dyn BlogStore,
    editor_id: Uuid,
    user_id: Uuid,
    patch: AdminUserPatch,
) -> ServiceResult<UserProfile> {
    validate_patch(&patch.profile)?;
    let patch = patch.apply_self_lockout_guard(editor_id, user_id);
    let user = apply_changes(store, user_id, UserChangeset::from(patch)).await?;
    info!(
        user_id = %user_id,
        editor_id = %editor_id,
        is_active = user.user_is_active,
        is_admin = user.user_is_admin,
        "User updated by admin"
    );
    Ok(user.profile())
}

/// Swaps the stored profile picture path and returns the previous one.
pub async fn replace_profile_picture(
    store: &dyn BlogStore,
    user_id: Uuid,
    picture_url: Option<String>,
) -> ServiceResult<(UserProfile, Option<String>)> {
    let mut tx = store.begin().await?;
    let result = async {
        let previous = load_user(tx.as_mut(), user_id)
            .await?
            .user_profile_picture_url;
        let changes = UserChangeset {
            user_profile_picture_url: Some(picture_url),
            ..Default::default()
        };
        let user = tx
            .update_user(user_id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;
        Ok::<_, ServiceError>((user.profile(), previous))
    }
    .await;
    finish(tx, result).await
}

/// Detaches the user's posts, drops their comments, then the account row,
/// all in one transaction. Returns the removed user.
pub async fn admin_delete_user(
    store: &dyn BlogStore,
    editor_id: Uuid,
    user_id: Uuid,
) -> ServiceResult<User> {
    if editor_id == user_id {
        return Err(ServiceError::permission(
            "Administrators cannot delete their own account",
        ));
    }

    let mut tx = store.begin().await?;
    let result = async {
        let user = load_user(tx.as_mut(), user_id).await?;
        let posts_detached = tx.clear_post_owner(user_id).await?;
        let comments_deleted = tx.delete_user_comments(user_id).await?;
        if !tx.delete_user(user_id).await? {
            return Err(ServiceError::not_found("user", user_id));
        }
        info!(
            deleted_user_id = %user_id,
            posts_detached,
            comments_deleted,
            "User deleted"
        );
        Ok(user)
    }
    .await;
    finish(tx, result).await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repository::memory_store::MemoryStore;

    fn input(name: &str, email: &str) -> NewUserInput {
        NewUserInput {
            user_name: name.into(),
            user_email: email.into(),
            password: "hunter22hunter".into(),
            user_full_name: Some("Ana Lima".into()),
            user_bio: None,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let store = MemoryStore::new();

        let user = register(&store, input("ana", "ana@example.com")).await.unwrap();
        assert!(user.user_is_active);
        assert!(!user.user_is_admin);
        assert_ne!(user.user_password_hash, "hunter22hunter");

        let found = authenticate(&store, "ana", "hunter22hunter").await.unwrap();
        assert_eq!(found.user_id, user.user_id);

        let err = authenticate(&store, "ana", "wrong-password").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(ref m) if m == BAD_LOGIN));
    }

    #[tokio::test]
    async fn unknown_user_cannot_authenticate() {
        let store = MemoryStore::new();
        let err = authenticate(&store, "ghost", "whatever1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn taken_username_and_email_conflict() {
        let store = MemoryStore::new();
        store.seed_user("ana", false).await;

        let by_name = register(&store, input("ana", "other@example.com"))
            .await
            .unwrap_err();
        let by_email = register(&store, input("bob", "ana@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(by_name, ServiceError::Conflict { field: "username", .. }));
        assert!(matches!(by_email, ServiceError::Conflict { field: "email", .. }));
        assert_eq!(store.snapshot().await.users.len(), 1);
    }

    #[test]
    fn unique_violation_maps_to_the_guarded_field() {
        let input = input("ana", "ana@example.com");

        let name = map_user_conflict(StoreError::unique_violation("users_user_name_key"), &input);
        let email = map_user_conflict(StoreError::unique_violation("users_user_email_key"), &input);
        let other = map_user_conflict(StoreError::query("boom"), &input);

        assert!(matches!(name, ServiceError::Conflict { field: "username", .. }));
        assert!(matches!(email, ServiceError::Conflict { field: "email", .. }));
        assert!(matches!(other, ServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn invalid_registrations_are_rejected_before_storage() {
        let store = MemoryStore::new();
        let cases = [
            NewUserInput {
                user_name: "".into(),
                ..input("x", "x@example.com")
            },
            input("ana", "not-an-email"),
            NewUserInput {
                password: "short".into(),
                ..input("ana", "ana@example.com")
            },
            NewUserInput {
                user_full_name: Some("n".repeat(101)),
                ..input("ana", "ana@example.com")
            },
            NewUserInput {
                user_bio: Some("b".repeat(301)),
                ..input("ana", "ana@example.com")
            },
        ];

        for case in cases {
            let err = register(&store, case).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{err:?}");
        }
        assert!(store.snapshot().await.users.is_empty());
    }

    #[tokio::test]
    async fn profile_patch_sets_and_clears() {
        let store = MemoryStore::new();
        let ana = store.seed_user("ana", false).await;

        let profile = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_bio: Some(Some("writes about rust".into())),
                user_github_url: Some(Some("https://github.com/ana".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(profile.user_bio.as_deref(), Some("writes about rust"));

        let profile = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_bio: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(profile.user_bio, None);
        assert_eq!(
            profile.user_github_url.as_deref(),
            Some("https://github.com/ana")
        );
    }

    #[tokio::test]
    async fn overlong_links_are_rejected_before_storage() {
        let store = MemoryStore::new();
        let ana = store.seed_user("ana", false).await;
        let long_url = format!("https://example.com/{}", "a".repeat(URL_MAX_CHARS));

        let err = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_website_url: Some(Some(long_url)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("Website")));
        assert_eq!(store.snapshot().await.users[0].user_website_url, None);
    }

    #[tokio::test]
    async fn overlong_email_is_a_validation_error() {
        let store = MemoryStore::new();
        let email = format!("ana@{}com", "b.".repeat(127));

        let err = register(&store, input("ana", &email)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn profile_cannot_claim_someone_elses_upload() {
        let store = MemoryStore::new();
        let ana = store.seed_user("ana", false).await;
        let bob = store.seed_user("bob", false).await;
        replace_profile_picture(&store, bob.user_id, Some("uploads/images/bob_0a1b2c3d.png".into()))
            .await
            .unwrap();

        let err = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_profile_picture_url: Some(Some("uploads/images/bob_0a1b2c3d.png".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let admin = store.seed_user("root", true).await;
        let err = admin_update_user(
            &store,
            admin.user_id,
            ana.user_id,
            AdminUserPatch {
                profile: ProfilePatch {
                    user_profile_picture_url: Some(Some("uploads/images/bob_0a1b2c3d.png".into())),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let state = store.snapshot().await;
        let ana_row = state.users.iter().find(|u| u.user_id == ana.user_id).unwrap();
        assert_eq!(ana_row.user_profile_picture_url, None);
    }

    #[tokio::test]
    async fn own_upload_and_external_urls_are_accepted() {
        let store = MemoryStore::new();
        let ana = store.seed_user("ana", false).await;
        replace_profile_picture(&store, ana.user_id, Some("uploads/images/ana_0a1b2c3d.png".into()))
            .await
            .unwrap();

        let profile = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_profile_picture_url: Some(Some("uploads/images/ana_0a1b2c3d.png".into())),
                user_bio: Some(Some("hi".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            profile.user_profile_picture_url.as_deref(),
            Some("uploads/images/ana_0a1b2c3d.png")
        );

        let profile = update_profile(
            &store,
            ana.user_id,
            ProfilePatch {
                user_profile_picture_url: Some(Some("https://cdn.example.com/ana.png".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            profile.user_profile_picture_url.as_deref(),
            Some("https://cdn.example.com/ana.png")
        );
    }

    #[tokio::test]
    async fn admin_cannot_lock_themselves_out() {
        let store = MemoryStore::new();
        let admin = store.seed_user("root", true).await;

        let profile = admin_update_user(
            &store,
            admin.user_id,
            admin.user_id,
            AdminUserPatch {
                user_is_active: Some(false),
                user_is_admin: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(profile.user_is_active);
        assert!(profile.user_is_admin);
    }

    #[tokio::test]
    async fn admin_can_deactivate_and_promote_others() {
        let store = MemoryStore::new();
        let admin = store.seed_user("root", true).await;
        let ana = store.seed_user("ana", false).await;

        let profile = admin_update_user(
            &store,
            admin.user_id,
            ana.user_id,
            AdminUserPatch {
                user_is_active: Some(false),
                user_is_admin: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(!profile.user_is_active);
        assert!(profile.user_is_admin);
    }

    #[tokio::test]
    async fn delete_detaches_posts_and_removes_comments() {
        let store = MemoryStore::new();
        let admin = store.seed_user("root", true).await;
        let ana = store.seed_user("ana", false).await;
        let p1 = store.seed_post(Some(ana.user_id), "one", Utc::now(), &[]).await;
        let p2 = store.seed_post(Some(ana.user_id), "two", Utc::now(), &[]).await;
        let other = store.seed_post(Some(admin.user_id), "mine", Utc::now(), &[]).await;
        for post in [&p1, &p2, &other] {
            store.seed_comment(post.post_id, ana.user_id, "hi").await;
        }
        store.seed_comment(other.post_id, admin.user_id, "keep").await;

        let deleted = admin_delete_user(&store, admin.user_id, ana.user_id)
            .await
            .unwrap();

        let state = store.snapshot().await;
        assert_eq!(deleted.user_id, ana.user_id);
        assert!(state.users.iter().all(|u| u.user_id != ana.user_id));
        assert_eq!(state.posts.len(), 3);
        assert_eq!(
            state.posts.iter().filter(|p| p.user_id.is_none()).count(),
            2
        );
        assert_eq!(state.comments.len(), 1);
        assert_eq!(state.comments[0].user_id, admin.user_id);
    }

    #[tokio::test]
    async fn failed_delete_rolls_back_every_step() {
        for failing in ["delete_user", "delete_user_comments"] {
            let store = MemoryStore::new();
            let admin = store.seed_user("root", true).await;
            let ana = store.seed_user("ana", false).await;
            let post = store.seed_post(Some(ana.user_id), "one", Utc::now(), &[]).await;
            store.seed_comment(post.post_id, ana.user_id, "hi").await;
            store.fail_on(failing);

            assert!(admin_delete_user(&store, admin.user_id, ana.user_id).await.is_err());

            let state = store.snapshot().await;
            assert_eq!(state.users.len(), 2, "{failing}");
            assert_eq!(state.posts[0].user_id, Some(ana.user_id), "{failing}");
            assert_eq!(state.comments.len(), 1, "{failing}");
        }
    }

    #[tokio::test]
    async fn admin_cannot_delete_themselves_or_missing_users() {
        let store = MemoryStore::new();
        let admin = store.seed_user("root", true).await;

        assert!(matches!(
            admin_delete_user(&store, admin.user_id, admin.user_id).await,
            Err(ServiceError::Permission(_))
        ));
        assert!(matches!(
            admin_delete_user(&store, admin.user_id, Uuid::now_v7()).await,
            Err(ServiceError::NotFound { entity: "user", .. })
        ));
    }

    #[tokio::test]
    async fn replacing_a_picture_returns_the_old_path() {
        let store = MemoryStore::new();
        let ana = store.seed_user("ana", false).await;

        let (_, previous) =
            replace_profile_picture(&store, ana.user_id, Some("uploads/images/a.png".into()))
                .await
                .unwrap();
        assert_eq!(previous, None);

        let (profile, previous) = replace_profile_picture(&store, ana.user_id, None)
            .await
            .unwrap();
        assert_eq!(previous.as_deref(), Some("uploads/images/a.png"));
        assert_eq!(profile.user_profile_picture_url, None);
    }
}
