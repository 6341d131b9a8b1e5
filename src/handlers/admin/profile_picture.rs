use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::user::UserProfile,
    dto::responses::{action_result::ActionResult, response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::user_service,
    util::{
        extract::upload::{read_upload, upload_rejected},
        file_store::MAX_PROFILE_PICTURE_BYTES,
        time::now::tokio_now,
    },
};

/// Multipart field `file`; png, jpg, jpeg, gif or webp up to 1 MB.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/profile-picture",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "User id")),
    request_body(content_type = "multipart/form-data", description = "Image under the `file` field"),
    responses(
        (status = 200, description = "Picture stored and linked", body = ActionResult<UserProfile>),
        (status = 400, description = "Upload rejected", body = CodeErrorResp),
        (status = 404, description = "No such user", body = CodeErrorResp)
    )
)]
pub async fn upload_profile_picture(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let upload = read_upload(&mut multipart).await?;
    let stored = state
        .files()
        .save(&upload.file_name, &upload.bytes, MAX_PROFILE_PICTURE_BYTES)
        .await
        .ok_or_else(|| upload_rejected(MAX_PROFILE_PICTURE_BYTES))?;

    let (profile, previous) =
        match user_service::replace_profile_picture(state.store(), user_id, Some(stored.clone()))
            .await
        {
            Ok(replaced) => replaced,
            Err(e) => {
                state.files().delete(&stored).await;
                return Err(e.into());
            }
        };
    state.files().discard(previous.as_deref()).await;

    Ok(http_resp(
        ActionResult::success("Profile picture updated", profile),
        (),
        start,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}/profile-picture",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Picture unlinked and its file removed", body = ActionResult<UserProfile>),
        (status = 404, description = "No such user", body = CodeErrorResp)
    )
)]
pub async fn delete_profile_picture(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let (profile, previous) =
        user_service::replace_profile_picture(state.store(), user_id, None).await?;

    let result = match previous {
        Some(path) => {
            state.files().discard(Some(&path)).await;
            ActionResult::success("Profile picture removed", profile)
        }
        None => ActionResult::info("User had no profile picture", profile),
    };

    Ok(http_resp(result, (), start))
}
