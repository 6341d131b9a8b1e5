use serde_derive::Deserialize;
use utoipa::ToSchema;

/// Body for tag creation and admin rename.
#[derive(Deserialize, ToSchema)]
pub struct TagNameRequest {
    pub tag_name: String,
}
