use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::user::UserProfile,
    dto::{
        requests::admin::admin_update_user_request::AdminUpdateUserRequest,
        responses::{action_result::ActionResult, response_data::http_resp},
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::user_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

/// Editing your own account never clears your active or admin flag.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{user_id}",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "User id")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ActionResult<UserProfile>),
        (status = 404, description = "No such user", body = CodeErrorResp)
    )
)]
pub async fn admin_update_user(
    Extension(editor): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AdminUpdateUserRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let previous_picture = match request.profile.user_profile_picture_url {
        Some(_) => {
            user_service::get_user(state.store(), user_id)
                .await?
                .user_profile_picture_url
        }
        None => None,
    };

    let profile =
        user_service::admin_update_user(state.store(), editor.user_id, user_id, request.into())
            .await?;

    if previous_picture != profile.user_profile_picture_url {
        state.files().discard(previous_picture.as_deref()).await;
    }

    let message = format!("User {} updated", profile.user_name);
    Ok(http_resp(ActionResult::success(message, profile), (), start))
}
