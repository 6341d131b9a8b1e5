use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::{
    domain::blog::post::{AdminPostPatch, PostPatch},
    dto::requests::blog::update_post_request::UpdatePostRequest,
};

#[derive(Deserialize, ToSchema, Debug)]
pub struct AdminUpdatePostRequest {
    #[serde(flatten)]
    pub post: UpdatePostRequest,
    /// Replaces every tag on the post when present.
    pub post_tags: Option<Vec<String>>,
}

impl From<AdminUpdatePostRequest> for AdminPostPatch {
    fn from(request: AdminUpdatePostRequest) -> Self {
        AdminPostPatch {
            patch: PostPatch::from(request.post),
            post_tags: request.post_tags,
        }
    }
}
