use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::domain::blog::post::PostInput;

#[derive(Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub post_title: String,
    pub post_content: String,
    pub post_featured_image_url: Option<String>,
    #[serde(default)]
    pub post_tags: Vec<String>,
}

impl From<CreatePostRequest> for PostInput {
    fn from(request: CreatePostRequest) -> Self {
        PostInput {
            post_title: request.post_title,
            post_content: request.post_content,
            post_featured_image_url: request.post_featured_image_url,
            post_tags: request.post_tags,
        }
    }
}
