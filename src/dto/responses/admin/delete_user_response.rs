use serde_derive::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub deleted_user_id: Uuid,
    pub user_name: String,
}
