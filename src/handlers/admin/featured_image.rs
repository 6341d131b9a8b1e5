use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::blog::post::PostDetails,
    dto::responses::{action_result::ActionResult, response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::{
        extract::upload::{read_upload, upload_rejected},
        file_store::MAX_FEATURED_IMAGE_BYTES,
        time::now::tokio_now,
    },
};

/// Multipart field `file`; png, jpg, jpeg, gif or webp up to 2 MB.
#[utoipa::path(
    post,
    path = "/api/admin/posts/{post_id}/featured-image",
    tag = "admin",
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body(content_type = "multipart/form-data", description = "Image under the `file` field"),
    responses(
        (status = 200, description = "Image stored and linked", body = ActionResult<PostDetails>),
        (status = 400, description = "Upload rejected", body = CodeErrorResp),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn upload_featured_image(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    mut multipart: Multipart,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let upload = read_upload(&mut multipart).await?;
    let stored = state
        .files()
        .save(&upload.file_name, &upload.bytes, MAX_FEATURED_IMAGE_BYTES)
        .await
        .ok_or_else(|| upload_rejected(MAX_FEATURED_IMAGE_BYTES))?;

    let (details, previous) =
        match post_service::replace_featured_image(state.store(), post_id, Some(stored.clone()))
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
        ActionResult::success("Featured image updated", details),
        (),
        start,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/posts/{post_id}/featured-image",
    tag = "admin",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Image unlinked and its file removed", body = ActionResult<PostDetails>),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn delete_featured_image(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let (details, previous) =
        post_service::replace_featured_image(state.store(), post_id, None).await?;

    let result = match previous {
        Some(path) => {
            state.files().discard(Some(&path)).await;
            ActionResult::success("Featured image removed", details)
        }
        None => ActionResult::info("Post had no featured image", details),
    };

    Ok(http_resp(result, (), start))
}
