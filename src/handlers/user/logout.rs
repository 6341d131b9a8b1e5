use axum::response::IntoResponse;
use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::responses::response_data::http_resp_with_cookies,
    errors::code_error::HandlerResponse,
    util::{auth::bearer::expired_access_token_cookie, time::now::tokio_now},
};

#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: &'static str,
}

#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "users",
    responses(
        (status = 200, description = "Access token cookie cleared", body = LogoutResponse)
    )
)]
pub async fn logout() -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    Ok(http_resp_with_cookies(
        LogoutResponse {
            message: "Logged out",
        },
        (),
        start,
        None,
        Some(vec![expired_access_token_cookie()]),
    ))
}
