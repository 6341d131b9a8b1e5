use serde_derive::Deserialize;
use utoipa::ToSchema;

use crate::domain::user::NewUserInput;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub user_name: String,
    pub user_email: String,
    pub password: String,
    pub user_full_name: Option<String>,
    pub user_bio: Option<String>,
}

impl From<RegisterRequest> for NewUserInput {
    fn from(request: RegisterRequest) -> Self {
        NewUserInput {
            user_name: request.user_name,
            user_email: request.user_email,
            password: request.password,
            user_full_name: request.user_full_name,
            user_bio: request.user_bio,
        }
    }
}
