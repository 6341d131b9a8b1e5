use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    domain::user::UserProfile,
    dto::{
        requests::user::update_profile_request::UpdateProfileRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::user_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The caller's profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = CodeErrorResp),
        (status = 403, description = "Inactive user", body = CodeErrorResp)
    )
)]
pub async fn get_me(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let user = user_service::get_user(state.store(), identity.user_id).await?;

    Ok(http_resp(user.profile(), (), start))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid profile field", body = CodeErrorResp),
        (status = 401, description = "Not authenticated", body = CodeErrorResp)
    )
)]
pub async fn update_me(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<UpdateProfileRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let profile =
        user_service::update_profile(state.store(), identity.user_id, request.into()).await?;

    Ok(http_resp(profile, (), start))
}
