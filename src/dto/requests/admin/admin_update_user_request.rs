use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::{
    domain::user::{AdminUserPatch, ProfilePatch},
    dto::requests::user::update_profile_request::UpdateProfileRequest,
};

#[derive(Deserialize, ToSchema, Debug)]
pub struct AdminUpdateUserRequest {
    #[serde(flatten)]
    pub profile: UpdateProfileRequest,
    pub user_is_active: Option<bool>,
    pub user_is_admin: Option<bool>,
}

impl From<AdminUpdateUserRequest> for AdminUserPatch {
    fn from(request: AdminUpdateUserRequest) -> Self {
        AdminUserPatch {
            profile: ProfilePatch::from(request.profile),
            user_is_active: request.user_is_active,
            user_is_admin: request.user_is_admin,
        }
    }
}
