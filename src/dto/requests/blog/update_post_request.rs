use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::{domain::blog::post::PostPatch, dto::common::patch_field::deserialize_some};

#[derive(Deserialize, ToSchema, Default, Debug)]
pub struct UpdatePostRequest {
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    /// `null` removes the featured image reference.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub post_featured_image_url: Option<Option<String>>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(request: UpdatePostRequest) -> Self {
        PostPatch {
            post_title: request.post_title,
            post_content: request.post_content,
            post_featured_image_url: request.post_featured_image_url,
        }
    }
}
