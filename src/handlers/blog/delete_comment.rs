use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::responses::{
        blog::delete_comment_response::DeleteCommentResponse, response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::comment_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{comment_id}",
    tag = "comments",
    params(("comment_id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment removed", body = DeleteCommentResponse),
        (status = 403, description = "Caller did not write the comment", body = CodeErrorResp),
        (status = 404, description = "No such comment", body = CodeErrorResp)
    )
)]
pub async fn delete_comment(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(comment_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let comment =
        comment_service::delete_comment_as_owner(state.store(), identity.user_id, comment_id)
            .await?;

    Ok(http_resp(
        DeleteCommentResponse {
            deleted_comment_id: comment.comment_id,
            post_id: comment.post_id,
        },
        (),
        start,
    ))
}
