use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::responses::{
        action_result::ActionResult, admin::delete_user_response::DeleteUserResponse,
        response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::user_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

/// The user's posts stay up without an owner; their comments are removed.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User removed", body = ActionResult<DeleteUserResponse>),
        (status = 403, description = "Tried to delete own account", body = CodeErrorResp),
        (status = 404, description = "No such user", body = CodeErrorResp)
    )
)]
pub async fn admin_delete_user(
    Extension(editor): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let user = user_service::admin_delete_user(state.store(), editor.user_id, user_id).await?;

    state
        .files()
        .discard(user.user_profile_picture_url.as_deref())
        .await;

    let message = format!("User {} deleted", user.user_name);
    Ok(http_resp(
        ActionResult::success(
            message,
            DeleteUserResponse {
                deleted_user_id: user.user_id,
                user_name: user.user_name,
            },
        ),
        (),
        start,
    ))
}
