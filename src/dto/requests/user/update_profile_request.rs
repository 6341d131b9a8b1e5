use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::{domain::user::ProfilePatch, dto::common::patch_field::deserialize_some};

/// Omitted keys stay as they are; `null` clears the field.
#[derive(Deserialize, ToSchema, Default, Debug)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_profile_picture_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_linkedin_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub user_github_url: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfilePatch {
            user_full_name: request.user_full_name,
            user_bio: request.user_bio,
            user_profile_picture_url: request.user_profile_picture_url,
            user_website_url: request.user_website_url,
            user_linkedin_url: request.user_linkedin_url,
            user_github_url: request.user_github_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_null_and_value_are_distinct() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"user_bio": null, "user_github_url": "https://github.com/ana"}"#)
                .unwrap();
        let patch = ProfilePatch::from(request);

        assert_eq!(patch.user_full_name, None);
        assert_eq!(patch.user_bio, Some(None));
        assert_eq!(
            patch.user_github_url,
            Some(Some("https://github.com/ana".to_string()))
        );
    }
}
