use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    domain::user::UserProfile,
    dto::{requests::user::register_request::RegisterRequest, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::user_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid registration form", body = CodeErrorResp),
        (status = 409, description = "Username or email already taken", body = CodeErrorResp)
    )
)]
pub async fn register(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RegisterRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let user = user_service::register(state.store(), request.into()).await?;

    Ok(http_resp(user.profile(), (), start))
}
