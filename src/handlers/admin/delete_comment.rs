use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::responses::{
        action_result::ActionResult, blog::delete_comment_response::DeleteCommentResponse,
        response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::comment_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    delete,
    path = "/api/admin/comments/{comment_id}",
    tag = "admin",
    params(("comment_id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment removed", body = ActionResult<DeleteCommentResponse>),
        (status = 404, description = "No such comment", body = CodeErrorResp)
    )
)]
pub async fn admin_delete_comment(
    State(state): State<Arc<ServerState>>,
    Path(comment_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let comment = comment_service::admin_delete_comment(state.store(), comment_id).await?;

    Ok(http_resp(
        ActionResult::success(
            "Comment deleted",
            DeleteCommentResponse {
                deleted_comment_id: comment.comment_id,
                post_id: comment.post_id,
            },
        ),
        (),
        start,
    ))
}
