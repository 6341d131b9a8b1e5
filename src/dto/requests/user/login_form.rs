use serde_derive::Deserialize;
use utoipa::ToSchema;

/// OAuth2 password-flow style form body.
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
