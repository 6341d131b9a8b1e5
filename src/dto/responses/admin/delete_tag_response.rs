use serde_derive::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct DeleteTagResponse {
    pub deleted_tag_id: i32,
    pub tag_name: String,
}
