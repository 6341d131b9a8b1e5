use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::responses::{
        action_result::ActionResult, blog::delete_post_response::DeletePostResponse,
        response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    delete,
    path = "/api/admin/posts/{post_id}",
    tag = "admin",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post, its comments and tag links removed", body = ActionResult<DeletePostResponse>),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn admin_delete_post(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let post = post_service::admin_delete_post(state.store(), post_id).await?;

    state
        .files()
        .discard(post.post_featured_image_url.as_deref())
        .await;

    let message = format!("Post \"{}\" deleted", post.post_title);
    Ok(http_resp(
        ActionResult::success(
            message,
            DeletePostResponse {
                deleted_post_id: post.post_id,
            },
        ),
        (),
        start,
    ))
}
