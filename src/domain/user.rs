use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Queryable, Selectable, prelude::Insertable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::users;

#[derive(Clone, Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct User {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_password_hash: String,
    pub user_full_name: Option<String>,
    pub user_bio: Option<String>,
    pub user_profile_picture_url: Option<String>,
    pub user_website_url: Option<String>,
    pub user_linkedin_url: Option<String>,
    pub user_github_url: Option<String>,
    pub user_is_active: bool,
    pub user_is_admin: bool,
    pub user_created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            user_email: self.user_email.clone(),
            user_full_name: self.user_full_name.clone(),
            user_bio: self.user_bio.clone(),
            user_profile_picture_url: self.user_profile_picture_url.clone(),
            user_website_url: self.user_website_url.clone(),
            user_linkedin_url: self.user_linkedin_url.clone(),
            user_github_url: self.user_github_url.clone(),
            user_is_active: self.user_is_active,
            user_is_admin: self.user_is_admin,
            user_created_at: self.user_created_at,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            user_full_name: self.user_full_name.clone(),
            user_profile_picture_url: self.user_profile_picture_url.clone(),
        }
    }
}

/// Everything about a user except the password hash.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_full_name: Option<String>,
    pub user_bio: Option<String>,
    pub user_profile_picture_url: Option<String>,
    pub user_website_url: Option<String>,
    pub user_linkedin_url: Option<String>,
    pub user_github_url: Option<String>,
    pub user_is_active: bool,
    pub user_is_admin: bool,
    pub user_created_at: DateTime<Utc>,
}

/// Author badge attached to posts and comments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_full_name: Option<String>,
    pub user_profile_picture_url: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct UserInsertable<'nu> {
    pub user_id: Uuid,
    pub user_name: &'nu str,
    pub user_email: &'nu str,
    pub user_password_hash: &'nu str,
    pub user_full_name: Option<&'nu str>,
    pub user_bio: Option<&'nu str>,
    pub user_is_active: bool,
    pub user_is_admin: bool,
    pub user_created_at: DateTime<Utc>,
}

impl<'nu> UserInsertable<'nu> {
    pub fn new(
        user_name: &'nu str,
        user_email: &'nu str,
        user_password_hash: &'nu str,
        user_full_name: Option<&'nu str>,
        user_bio: Option<&'nu str>,
        user_is_admin: bool,
    ) -> Self {
        Self {
            user_id: Uuid::now_v7(),
            user_name,
            user_email,
            user_password_hash,
            user_full_name,
            user_bio,
            user_is_active: true,
            user_is_admin,
            user_created_at: Utc::now(),
        }
    }
}

/// Registration or provisioning input, before validation.
#[derive(Clone, Debug, Default)]
pub struct NewUserInput {
    pub user_name: String,
    pub user_email: String,
    pub password: String,
    pub user_full_name: Option<String>,
    pub user_bio: Option<String>,
}

/// Fields a user may change on their own account.
///
/// `None` leaves the column untouched, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub user_full_name: Option<Option<String>>,
    pub user_bio: Option<Option<String>>,
    pub user_profile_picture_url: Option<Option<String>>,
    pub user_website_url: Option<Option<String>>,
    pub user_linkedin_url: Option<Option<String>>,
    pub user_github_url: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminUserPatch {
    pub profile: ProfilePatch,
    pub user_is_active: Option<bool>,
    pub user_is_admin: Option<bool>,
}

impl AdminUserPatch {
    /// An administrator editing their own account can never switch off their
    /// own activity or admin rights; both are pinned to `true`.
    pub fn apply_self_lockout_guard(mut self, editor_id: Uuid, target_id: Uuid) -> Self {
        if editor_id == target_id {
            self.user_is_active = Some(true);
            self.user_is_admin = Some(true);
        }
        self
    }
}

#[derive(AsChangeset, Clone, Debug, Default, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub user_full_name: Option<Option<String>>,
    pub user_bio: Option<Option<String>>,
    pub user_profile_picture_url: Option<Option<String>>,
    pub user_website_url: Option<Option<String>>,
    pub user_linkedin_url: Option<Option<String>>,
    pub user_github_url: Option<Option<String>>,
    pub user_is_active: Option<bool>,
    pub user_is_admin: Option<bool>,
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        *self == UserChangeset::default()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.user_full_name {
            user.user_full_name = v.clone();
        }
        if let Some(v) = &self.user_bio {
            user.user_bio = v.clone();
        }
        if let Some(v) = &self.user_profile_picture_url {
            user.user_profile_picture_url = v.clone();
        }
        if let Some(v) = &self.user_website_url {
            user.user_website_url = v.clone();
        }
        if let Some(v) = &self.user_linkedin_url {
            user.user_linkedin_url = v.clone();
        }
        if let Some(v) = &self.user_github_url {
            user.user_github_url = v.clone();
        }
        if let Some(v) = self.user_is_active {
            user.user_is_active = v;
        }
        if let Some(v) = self.user_is_admin {
            user.user_is_admin = v;
        }
    }
}

impl From<ProfilePatch> for UserChangeset {
    fn from(patch: ProfilePatch) -> Self {
        UserChangeset {
            user_full_name: patch.user_full_name,
            user_bio: patch.user_bio,
            user_profile_picture_url: patch.user_profile_picture_url,
            user_website_url: patch.user_website_url,
            user_linkedin_url: patch.user_linkedin_url,
            user_github_url: patch.user_github_url,
            user_is_active: None,
            user_is_admin: None,
        }
    }
}

impl From<AdminUserPatch> for UserChangeset {
    fn from(patch: AdminUserPatch) -> Self {
        UserChangeset {
            user_is_active: patch.user_is_active,
            user_is_admin: patch.user_is_admin,
            ..UserChangeset::from(patch.profile)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_edit_pins_active_and_admin() {
        let id = Uuid::now_v7();
        let patch = AdminUserPatch {
            user_is_active: Some(false),
            user_is_admin: Some(false),
            ..Default::default()
        }
        .apply_self_lockout_guard(id, id);

        assert_eq!(patch.user_is_active, Some(true));
        assert_eq!(patch.user_is_admin, Some(true));
    }

    #[test]
    fn editing_someone_else_keeps_submitted_flags() {
        let patch = AdminUserPatch {
            user_is_active: Some(false),
            user_is_admin: None,
            ..Default::default()
        }
        .apply_self_lockout_guard(Uuid::now_v7(), Uuid::now_v7());

        assert_eq!(patch.user_is_active, Some(false));
        assert_eq!(patch.user_is_admin, None);
    }

    #[test]
    fn changeset_only_touches_supplied_fields() {
        let mut user = User {
            user_id: Uuid::now_v7(),
            user_name: "ana".into(),
            user_email: "ana@example.com".into(),
            user_password_hash: String::new(),
            user_full_name: Some("Ana".into()),
            user_bio: Some("hello".into()),
            user_profile_picture_url: None,
            user_website_url: Some("https://ana.dev".into()),
            user_linkedin_url: None,
            user_github_url: None,
            user_is_active: true,
            user_is_admin: false,
            user_created_at: Utc::now(),
        };

        let changes = UserChangeset::from(ProfilePatch {
            user_bio: Some(None),
            user_github_url: Some(Some("https://github.com/ana".into())),
            ..Default::default()
        });
        changes.apply_to(&mut user);

        assert_eq!(user.user_full_name.as_deref(), Some("Ana"));
        assert_eq!(user.user_bio, None);
        assert_eq!(user.user_website_url.as_deref(), Some("https://ana.dev"));
        assert_eq!(user.user_github_url.as_deref(), Some("https://github.com/ana"));
        assert!(!changes.is_empty());
        assert!(UserChangeset::default().is_empty());
    }
}
